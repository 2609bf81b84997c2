//! Expense-specific failures.
//!
//! Every variant except `Domain` is a user-facing data-entry problem: the
//! host shows the message as-is and nothing is retried.

use thiserror::Error;

use vendorbill_core::DomainError;

use crate::expense::ExpenseState;

/// Result type for expense operations.
pub type ExpenseResult<T> = Result<T, ExpenseError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    /// An expense is already attached to a report, or is no longer a draft.
    #[error("an expense line cannot be reported twice")]
    DuplicateReport,

    /// Nothing in the batch carries a non-zero amount.
    #[error("expenses without an amount cannot be reported")]
    NoPriceableExpense,

    #[error("expenses of different employees cannot share a report")]
    MixedEmployee,

    /// An expense has no product (category) assigned.
    #[error("a report cannot be created for expenses without a category")]
    MissingCategory,

    /// The batch, or the lines projected from it, span several vendors.
    #[error("expenses of different vendors cannot share a report")]
    MixedVendor,

    /// The vendor was edited outside the `draft`/`refused` states.
    #[error("the vendor of a {state} expense cannot be changed")]
    VendorLocked { state: ExpenseState },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ExpenseError {
    /// Stable machine-readable code, for hosts that translate messages.
    pub fn code(&self) -> &'static str {
        match self {
            ExpenseError::DuplicateReport => "duplicate_report",
            ExpenseError::NoPriceableExpense => "no_priceable_expense",
            ExpenseError::MixedEmployee => "mixed_employee",
            ExpenseError::MissingCategory => "missing_category",
            ExpenseError::MixedVendor => "mixed_vendor",
            ExpenseError::VendorLocked { .. } => "vendor_locked",
            ExpenseError::Domain(_) => "domain",
        }
    }
}
