//! Currency with its rounding precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::CurrencyId;
use crate::value_object::ValueObject;

/// A currency and the smallest step amounts are rounded to (e.g. `0.01`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CurrencyRecord")]
pub struct Currency {
    id: CurrencyId,
    code: String,
    rounding: Decimal,
}

#[derive(Deserialize)]
struct CurrencyRecord {
    id: CurrencyId,
    code: String,
    rounding: Decimal,
}

impl TryFrom<CurrencyRecord> for Currency {
    type Error = DomainError;

    fn try_from(record: CurrencyRecord) -> Result<Self, Self::Error> {
        Currency::new(record.id, record.code, record.rounding)
    }
}

impl ValueObject for Currency {}

impl Currency {
    /// Invariant: the rounding step is strictly positive.
    pub fn new(id: CurrencyId, code: impl Into<String>, rounding: Decimal) -> DomainResult<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("currency code must not be empty"));
        }
        if rounding <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "currency {code}: rounding must be positive (got {rounding})"
            )));
        }
        Ok(Self { id, code, rounding })
    }

    pub fn id(&self) -> CurrencyId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn rounding(&self) -> Decimal {
        self.rounding
    }

    /// Round to the nearest multiple of the rounding step, halves away from zero.
    pub fn round(&self, amount: Decimal) -> Decimal {
        let steps = (amount / self.rounding)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        (steps * self.rounding).normalize()
    }

    /// Whether `amount` rounds to zero in this currency.
    pub fn is_zero(&self, amount: Decimal) -> bool {
        self.round(amount).is_zero()
    }

    /// Compare two amounts after rounding both.
    pub fn compare(&self, a: Decimal, b: Decimal) -> core::cmp::Ordering {
        self.round(a - b).cmp(&Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur() -> Currency {
        Currency::new(CurrencyId::new(), "EUR", dec!(0.01)).unwrap()
    }

    #[test]
    fn rejects_non_positive_rounding() {
        let err = Currency::new(CurrencyId::new(), "EUR", Decimal::ZERO).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("rounding must be positive") => {}
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_code() {
        assert!(Currency::new(CurrencyId::new(), "  ", dec!(0.01)).is_err());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let eur = eur();
        assert_eq!(eur.round(dec!(1.005)), dec!(1.01));
        assert_eq!(eur.round(dec!(-1.005)), dec!(-1.01));
        assert_eq!(eur.round(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn sub_precision_amounts_are_zero() {
        let eur = eur();
        assert!(eur.is_zero(dec!(0.004)));
        assert!(eur.is_zero(dec!(-0.004)));
        assert!(!eur.is_zero(dec!(0.005)));
    }

    #[test]
    fn coarse_rounding_steps() {
        let jpy = Currency::new(CurrencyId::new(), "JPY", dec!(1)).unwrap();
        assert!(jpy.is_zero(dec!(0.49)));
        assert_eq!(jpy.round(dec!(41.5)), dec!(42));
    }

    #[test]
    fn deserialization_enforces_positive_rounding() {
        let id = CurrencyId::new();
        let ok = format!(r#"{{"id":"{id}","code":"EUR","rounding":"0.01"}}"#);
        let currency: Currency = serde_json::from_str(&ok).unwrap();
        assert_eq!(currency.rounding(), dec!(0.01));

        let bad = format!(r#"{{"id":"{id}","code":"EUR","rounding":"0"}}"#);
        assert!(serde_json::from_str::<Currency>(&bad).is_err());
    }

    #[test]
    fn compare_ignores_noise_below_precision() {
        let eur = eur();
        assert_eq!(eur.compare(dec!(10.001), dec!(10)), core::cmp::Ordering::Equal);
        assert_eq!(eur.compare(dec!(10.01), dec!(10)), core::cmp::Ordering::Greater);
    }
}
