//! Expense record snapshot, as loaded by the host, plus its vendor rule.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vendorbill_core::{
    AccountId, AnalyticAccountId, CompanyId, Currency, DomainError, DomainResult, EmployeeId,
    Entity, ExpenseId, PartnerId, ProductId, ReportId, TaxId, UomId, ValueObject,
};

use crate::error::{ExpenseError, ExpenseResult};

/// Expense lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseState {
    Draft,
    Reported,
    Approved,
    Done,
    Refused,
}

impl ExpenseState {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseState::Draft => "draft",
            ExpenseState::Reported => "reported",
            ExpenseState::Approved => "approved",
            ExpenseState::Done => "done",
            ExpenseState::Refused => "refused",
        }
    }

    /// States in which the vendor may still be edited.
    pub fn vendor_editable(self) -> bool {
        matches!(self, ExpenseState::Draft | ExpenseState::Refused)
    }
}

impl core::fmt::Display for ExpenseState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who paid: the employee (to be reimbursed) or the company directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    OwnAccount,
    CompanyAccount,
}

/// Employee data an expense needs for labels and vendor fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: EmployeeId,
    pub name: String,
    /// Commercial partner of the employee's home address, if any.
    pub home_partner_id: Option<PartnerId>,
}

/// A percent tax applied to an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxRecord")]
pub struct Tax {
    id: TaxId,
    name: String,
    rate: Decimal,
}

#[derive(Deserialize)]
struct TaxRecord {
    id: TaxId,
    name: String,
    rate: Decimal,
}

impl TryFrom<TaxRecord> for Tax {
    type Error = DomainError;

    fn try_from(record: TaxRecord) -> Result<Self, Self::Error> {
        Tax::percent(record.id, record.name, record.rate)
    }
}

impl Tax {
    /// Invariant: the rate is not negative.
    pub fn percent(id: TaxId, name: impl Into<String>, rate: Decimal) -> DomainResult<Self> {
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(DomainError::validation("tax rate must not be negative"));
        }
        Ok(Self {
            id,
            name: name.into(),
            rate,
        })
    }

    pub fn id(&self) -> TaxId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rate in percent (e.g. `21` for 21%).
    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Cost-center allocation: analytic account → percentage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<AnalyticAccountId, Decimal>")]
pub struct AnalyticDistribution(BTreeMap<AnalyticAccountId, Decimal>);

impl ValueObject for AnalyticDistribution {}

impl TryFrom<BTreeMap<AnalyticAccountId, Decimal>> for AnalyticDistribution {
    type Error = DomainError;

    fn try_from(shares: BTreeMap<AnalyticAccountId, Decimal>) -> Result<Self, Self::Error> {
        AnalyticDistribution::new(shares)
    }
}

impl AnalyticDistribution {
    /// Invariant: every share is positive.
    pub fn new(shares: impl IntoIterator<Item = (AnalyticAccountId, Decimal)>) -> DomainResult<Self> {
        let mut map = BTreeMap::new();
        for (account, share) in shares {
            if share <= Decimal::ZERO {
                return Err(DomainError::validation(format!(
                    "analytic share for {account} must be positive"
                )));
            }
            *map.entry(account).or_insert(Decimal::ZERO) += share;
        }
        Ok(Self(map))
    }

    pub fn shares(&self) -> &BTreeMap<AnalyticAccountId, Decimal> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Snapshot of a persisted expense.
///
/// The vendor is mandatory and can only be changed through
/// [`Expense::set_vendor`], which enforces the state rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    name: String,
    reference: Option<String>,
    date: NaiveDate,
    employee: EmployeeRef,
    vendor_id: PartnerId,
    product_id: Option<ProductId>,
    product_uom_id: Option<UomId>,
    account_id: Option<AccountId>,
    unit_amount: Decimal,
    total_amount_company: Decimal,
    quantity: Option<Decimal>,
    taxes: Vec<Tax>,
    analytic_distribution: Option<AnalyticDistribution>,
    currency: Currency,
    company_id: CompanyId,
    payment_mode: PaymentMode,
    report_id: Option<ReportId>,
    state: ExpenseState,
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Expense {
    /// A draft, unpriced, employee-paid expense; refine it with the `with_*` setters.
    pub fn new(
        id: ExpenseId,
        name: impl Into<String>,
        date: NaiveDate,
        employee: EmployeeRef,
        vendor_id: PartnerId,
        currency: Currency,
        company_id: CompanyId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            reference: None,
            date,
            employee,
            vendor_id,
            product_id: None,
            product_uom_id: None,
            account_id: None,
            unit_amount: Decimal::ZERO,
            total_amount_company: Decimal::ZERO,
            quantity: None,
            taxes: Vec::new(),
            analytic_distribution: None,
            currency,
            company_id,
            payment_mode: PaymentMode::OwnAccount,
            report_id: None,
            state: ExpenseState::Draft,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_product(mut self, product_id: ProductId, uom_id: Option<UomId>) -> Self {
        self.product_id = Some(product_id);
        self.product_uom_id = uom_id;
        self
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// `unit_amount` is the product cost (zero when the product has none);
    /// `total_amount_company` is the total in company currency.
    pub fn with_amounts(mut self, unit_amount: Decimal, total_amount_company: Decimal) -> Self {
        self.unit_amount = unit_amount;
        self.total_amount_company = total_amount_company;
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_taxes(mut self, taxes: Vec<Tax>) -> Self {
        self.taxes = taxes;
        self
    }

    pub fn with_analytic_distribution(mut self, distribution: AnalyticDistribution) -> Self {
        self.analytic_distribution = Some(distribution);
        self
    }

    pub fn with_payment_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = mode;
        self
    }

    /// Hydrate lifecycle data exactly as the host stored it.
    pub fn with_lifecycle(mut self, state: ExpenseState, report_id: Option<ReportId>) -> Self {
        self.state = state;
        self.report_id = report_id;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference, treating an empty string as absent.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn employee(&self) -> &EmployeeRef {
        &self.employee
    }

    pub fn vendor_id(&self) -> PartnerId {
        self.vendor_id
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn product_uom_id(&self) -> Option<UomId> {
        self.product_uom_id
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    pub fn unit_amount(&self) -> Decimal {
        self.unit_amount
    }

    pub fn total_amount_company(&self) -> Decimal {
        self.total_amount_company
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.quantity
    }

    pub fn taxes(&self) -> &[Tax] {
        &self.taxes
    }

    pub fn analytic_distribution(&self) -> Option<&AnalyticDistribution> {
        self.analytic_distribution.as_ref()
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    pub fn report_id(&self) -> Option<ReportId> {
        self.report_id
    }

    pub fn state(&self) -> ExpenseState {
        self.state
    }

    /// Quantity, with an unset or zero quantity counting as one.
    pub fn effective_quantity(&self) -> Decimal {
        match self.quantity {
            Some(q) if !q.is_zero() => q,
            _ => Decimal::ONE,
        }
    }

    /// An expense whose total rounds to zero has not been priced yet.
    pub fn is_priced(&self) -> bool {
        !self.currency.is_zero(self.total_amount_company)
    }

    /// Draft and not yet attached to a report.
    pub fn is_reportable(&self) -> bool {
        self.state == ExpenseState::Draft && self.report_id.is_none()
    }

    /// Change the vendor. Only allowed while the expense is draft or refused.
    pub fn set_vendor(&mut self, vendor_id: PartnerId) -> ExpenseResult<()> {
        if !self.state.vendor_editable() {
            return Err(ExpenseError::VendorLocked { state: self.state });
        }
        if self.vendor_id != vendor_id {
            tracing::debug!(expense = %self.id, from = %self.vendor_id, to = %vendor_id, "expense vendor changed");
            self.vendor_id = vendor_id;
        }
        Ok(())
    }
}
