//! Batch validation and report splitting.
//!
//! A batch is what the host hands over when the user asks to report (or bill)
//! a selection of expenses. Validation filters and checks it once; everything
//! downstream takes an [`ExpenseBatch`] and can rely on its invariants.

use serde::{Deserialize, Serialize};

use vendorbill_core::{CompanyId, EmployeeId, Entity, ExpenseId, PartnerId, ValueObject};

use crate::error::{ExpenseError, ExpenseResult};
use crate::expense::{EmployeeRef, Expense, PaymentMode};
use crate::settings::BillingSettings;

/// Validated, non-empty set of expenses.
///
/// Invariants:
/// - every member is priced, draft, and not attached to a report
/// - every member has a category
/// - all members share one employee and one vendor
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBatch {
    expenses: Vec<Expense>,
}

impl ExpenseBatch {
    /// Filter out unpriced expenses, then check the batch, in this order:
    /// duplicate report, nothing priced, mixed employees, missing category,
    /// mixed vendors.
    #[tracing::instrument(level = "debug", skip_all, fields(submitted = expenses.len()))]
    pub fn validate(expenses: Vec<Expense>) -> ExpenseResult<Self> {
        let submitted = expenses.len();
        let priced: Vec<Expense> = expenses.into_iter().filter(Expense::is_priced).collect();
        if priced.len() != submitted {
            tracing::debug!(excluded = submitted - priced.len(), "skipping expenses without amount");
        }

        let result = Self::check(&priced);
        if let Err(err) = &result {
            tracing::debug!(code = err.code(), "expense batch rejected");
        }
        result.map(|()| Self { expenses: priced })
    }

    fn check(priced: &[Expense]) -> ExpenseResult<()> {
        if priced.iter().any(|e| !e.is_reportable()) {
            return Err(ExpenseError::DuplicateReport);
        }

        let Some(first) = priced.first() else {
            return Err(ExpenseError::NoPriceableExpense);
        };

        let employee_id = first.employee().id;
        if priced.iter().any(|e| e.employee().id != employee_id) {
            return Err(ExpenseError::MixedEmployee);
        }

        if priced.iter().any(|e| e.product_id().is_none()) {
            return Err(ExpenseError::MissingCategory);
        }

        let vendor_id = first.vendor_id();
        if priced.iter().any(|e| e.vendor_id() != vendor_id) {
            return Err(ExpenseError::MixedVendor);
        }

        Ok(())
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Always false for a validated batch.
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn ids(&self) -> Vec<ExpenseId> {
        self.expenses.iter().map(|e| *e.id()).collect()
    }

    fn first(&self) -> &Expense {
        &self.expenses[0]
    }

    pub fn employee(&self) -> &EmployeeRef {
        self.first().employee()
    }

    pub fn vendor_id(&self) -> PartnerId {
        self.first().vendor_id()
    }

    pub fn company_id(&self) -> CompanyId {
        self.first().company_id()
    }

    /// Report name: the description of a lone expense, otherwise the date
    /// range of the members (a single date when they all share it).
    pub fn name(&self, settings: &BillingSettings) -> String {
        if let [only] = self.expenses.as_slice() {
            return only.name().to_string();
        }

        let dates = self.expenses.iter().map(Expense::date);
        let (min, max) = match (dates.clone().min(), dates.max()) {
            (Some(min), Some(max)) => (min, max),
            _ => return String::new(),
        };

        let min = settings.format_date(min);
        let max = settings.format_date(max);
        if min == max { min } else { format!("{min} - {max}") }
    }

    /// Split by payment mode: employee-paid first, company-paid second.
    ///
    /// A batch paid one way only comes back as-is.
    pub fn split(self) -> Vec<ExpenseBatch> {
        let (own, company): (Vec<Expense>, Vec<Expense>) = self
            .expenses
            .into_iter()
            .partition(|e| e.payment_mode() == PaymentMode::OwnAccount);

        tracing::debug!(own = own.len(), company = company.len(), "splitting expense batch");

        [own, company]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(|expenses| ExpenseBatch { expenses })
            .collect()
    }

    /// One report-creation request per payment-mode partition.
    pub fn report_requests(self, settings: &BillingSettings) -> Vec<ReportRequest> {
        self.split()
            .iter()
            .map(|batch| ReportRequest::from_batch(batch, settings))
            .collect()
    }
}

/// State a requested report is created in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    Draft,
}

/// Values for a report the host should create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub company_id: CompanyId,
    pub employee_id: EmployeeId,
    pub name: String,
    pub expense_ids: Vec<ExpenseId>,
    pub state: ReportState,
}

impl ValueObject for ReportRequest {}

impl ReportRequest {
    pub fn from_batch(batch: &ExpenseBatch, settings: &BillingSettings) -> Self {
        Self {
            company_id: batch.company_id(),
            employee_id: batch.employee().id,
            name: batch.name(settings),
            expense_ids: batch.ids(),
            state: ReportState::Draft,
        }
    }
}
