//! Tax breakdown of an expense.
//!
//! Receipts show tax-included amounts, so every tax on an expense is treated
//! as included in the price, whatever its own configuration says.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vendorbill_core::{TaxId, ValueObject};

use crate::expense::{Expense, Tax};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    pub tax_id: TaxId,
    pub name: String,
    pub amount: Decimal,
}

/// Totals of `price × quantity` split into base and taxes.
///
/// Invariant: `total_excluded + Σ taxes == total_included`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub total_excluded: Decimal,
    pub total_included: Decimal,
    pub taxes: Vec<TaxLine>,
}

impl ValueObject for TaxBreakdown {}

impl TaxBreakdown {
    pub fn tax_total(&self) -> Decimal {
        self.taxes.iter().map(|t| t.amount).sum()
    }
}

/// Compute the taxes of `price × quantity` for `expense`, rounding in the
/// expense currency.
pub fn compute_taxes(expense: &Expense, price: Decimal, quantity: Decimal) -> TaxBreakdown {
    let currency = expense.currency();
    let total_included = currency.round(price * quantity);

    let hundred = Decimal::ONE_HUNDRED;
    let rate_sum: Decimal = expense.taxes().iter().map(Tax::rate).sum();
    let base = total_included / (Decimal::ONE + rate_sum / hundred);

    let taxes: Vec<TaxLine> = expense
        .taxes()
        .iter()
        .map(|tax| TaxLine {
            tax_id: tax.id(),
            name: tax.name().to_string(),
            amount: currency.round(base * tax.rate() / hundred),
        })
        .collect();

    let tax_sum: Decimal = taxes.iter().map(|t| t.amount).sum();
    TaxBreakdown {
        total_excluded: total_included - tax_sum,
        total_included,
        taxes,
    }
}
