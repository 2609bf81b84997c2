//! Expenses → vendor bills.
//!
//! Every expense carries a mandatory vendor. This crate validates a selection
//! of expenses, splits it into report requests, and prepares the vendor bill
//! (header + lines) the host ERP persists and posts. Pure, deterministic domain
//! logic: no IO, no storage, no posting.

pub mod batch;
pub mod bill;
pub mod error;
pub mod expense;
pub mod projector;
pub mod settings;
pub mod tax;

pub use batch::{ExpenseBatch, ReportRequest, ReportState};
pub use bill::{BillDraft, MoveType, assemble, assemble_on};
pub use error::{ExpenseError, ExpenseResult};
pub use expense::{AnalyticDistribution, EmployeeRef, Expense, ExpenseState, PaymentMode, Tax};
pub use projector::{MoveLineDraft, line_label, project};
pub use settings::BillingSettings;
pub use tax::{TaxBreakdown, TaxLine, compute_taxes};
