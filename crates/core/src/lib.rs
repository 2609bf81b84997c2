//! `vendorbill-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers for the host ERP's records, the shared error type, and the
//! currency rounding rules every amount comparison goes through.

pub mod currency;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use currency::Currency;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    AccountId, AnalyticAccountId, CompanyId, CurrencyId, EmployeeId, ExpenseId, JournalId,
    PartnerId, ProductId, ReportId, TaxId, UomId,
};
pub use value_object::ValueObject;
