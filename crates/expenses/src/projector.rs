//! Expense → vendor-bill line projection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vendorbill_core::{
    AccountId, CurrencyId, Entity, ExpenseId, PartnerId, ProductId, TaxId, UomId, ValueObject,
};

use crate::expense::{AnalyticDistribution, Expense, Tax};
use crate::settings::BillingSettings;

/// Field values of one accounting line, ready for the host to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveLineDraft {
    pub name: String,
    pub account_id: Option<AccountId>,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub product_id: Option<ProductId>,
    pub product_uom_id: Option<UomId>,
    pub analytic_distribution: Option<AnalyticDistribution>,
    pub tax_ids: Vec<TaxId>,
    pub currency_id: CurrencyId,
    pub partner_id: PartnerId,
    pub expense_id: ExpenseId,
}

impl ValueObject for MoveLineDraft {}

/// Project one expense onto a bill line.
pub fn project(expense: &Expense, settings: &BillingSettings) -> MoveLineDraft {
    MoveLineDraft {
        name: line_label(expense, settings),
        account_id: expense.account_id(),
        quantity: expense.effective_quantity(),
        price_unit: price_unit(expense),
        product_id: expense.product_id(),
        product_uom_id: expense.product_uom_id(),
        analytic_distribution: expense.analytic_distribution().cloned(),
        tax_ids: expense.taxes().iter().map(Tax::id).collect(),
        currency_id: expense.currency().id(),
        partner_id: expense.vendor_id(),
        expense_id: *expense.id(),
    }
}

/// `[bill#REF] Employee: first line of the description`, the description
/// truncated to `label_max_chars` characters.
pub fn line_label(expense: &Expense, settings: &BillingSettings) -> String {
    let summary: String = expense
        .name()
        .split('\n')
        .next()
        .unwrap_or_default()
        .chars()
        .take(settings.label_max_chars)
        .collect();

    let employee = &expense.employee().name;
    match expense.reference() {
        Some(reference) => format!(
            "[{}{reference}] {employee}: {summary}",
            settings.bill_reference_prefix
        ),
        None => format!("{employee}: {summary}"),
    }
}

/// The product cost when there is one (always in company currency),
/// otherwise the lump-sum total.
fn price_unit(expense: &Expense) -> Decimal {
    if expense.unit_amount().is_zero() {
        expense.total_amount_company()
    } else {
        expense.unit_amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::fixtures::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use vendorbill_core::AnalyticAccountId;

    #[test]
    fn referenced_lump_sum_taxi_ride() {
        let expense = priced(&employee("Alice"), PartnerId::new(), "Taxi\nAirport ride", dec!(42.00))
            .with_reference("R100");

        let line = project(&expense, &BillingSettings::default());
        assert_eq!(line.name, "[bill#R100] Alice: Taxi");
        assert_eq!(line.price_unit, dec!(42.00));
        assert_eq!(line.quantity, Decimal::ONE);
    }

    #[test]
    fn label_without_reference_has_no_prefix() {
        let expense = priced(&employee("Bob"), PartnerId::new(), "Parking", dec!(5));
        assert_eq!(line_label(&expense, &BillingSettings::default()), "Bob: Parking");
    }

    #[test]
    fn description_is_truncated_by_characters() {
        let long = "é".repeat(80);
        let expense = priced(&employee("Bob"), PartnerId::new(), &long, dec!(5));
        let label = line_label(&expense, &BillingSettings::default());
        assert_eq!(label, format!("Bob: {}", "é".repeat(64)));
    }

    #[test]
    fn unit_cost_wins_over_total() {
        let expense = priced(&employee("Bob"), PartnerId::new(), "Mileage", dec!(45))
            .with_amounts(dec!(0.30), dec!(45))
            .with_quantity(dec!(150));
        let line = project(&expense, &BillingSettings::default());
        assert_eq!(line.price_unit, dec!(0.30));
        assert_eq!(line.quantity, dec!(150));
    }

    #[test]
    fn references_are_copied_verbatim() {
        let tax = Tax::percent(TaxId::new(), "VAT 21%", dec!(21)).unwrap();
        let distribution = AnalyticDistribution::new([(AnalyticAccountId::new(), dec!(100))]).unwrap();
        let vendor = PartnerId::new();
        let expense = priced(&employee("Bob"), vendor, "Hotel", dec!(121))
            .with_taxes(vec![tax.clone()])
            .with_analytic_distribution(distribution.clone());

        let line = project(&expense, &BillingSettings::default());
        assert_eq!(line.tax_ids, vec![tax.id()]);
        assert_eq!(line.analytic_distribution, Some(distribution));
        assert_eq!(line.partner_id, vendor);
        assert_eq!(line.expense_id, *expense.id());
        assert_eq!(line.account_id, expense.account_id());
        assert_eq!(line.product_id, expense.product_id());
        assert_eq!(line.product_uom_id, expense.product_uom_id());
        assert_eq!(line.currency_id, expense.currency().id());
    }

    proptest! {
        /// Property: projection is deterministic.
        #[test]
        fn projecting_twice_gives_equal_lines(
            name in "[a-zA-Z \n]{0,100}",
            reference in proptest::option::of("[A-Z0-9]{0,8}"),
            cents in 1i64..10_000_000,
        ) {
            let mut expense = priced(&employee("Alice"), PartnerId::new(), &name, Decimal::new(cents, 2));
            if let Some(reference) = reference {
                expense = expense.with_reference(reference);
            }
            let settings = BillingSettings::default();
            prop_assert_eq!(project(&expense, &settings), project(&expense, &settings));
        }
    }
}
