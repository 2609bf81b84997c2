//! Vendor-bill assembly from a validated batch.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use vendorbill_core::{DomainError, JournalId, PartnerId, ValueObject};

use crate::batch::ExpenseBatch;
use crate::error::{ExpenseError, ExpenseResult};
use crate::projector::{MoveLineDraft, project};
use crate::settings::BillingSettings;

/// Placeholder document name; the host assigns the number on posting.
pub const UNNUMBERED: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    /// Incoming vendor bill.
    InInvoice,
}

/// Header and lines of a vendor bill for the host to persist.
///
/// Invariant: `partner_id` equals every line's `partner_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDraft {
    pub name: String,
    pub date: NaiveDate,
    pub invoice_date: NaiveDate,
    #[serde(rename = "ref")]
    pub reference: String,
    pub partner_id: PartnerId,
    pub journal_id: JournalId,
    pub move_type: MoveType,
    pub lines: Vec<MoveLineDraft>,
}

impl ValueObject for BillDraft {}

impl BillDraft {
    /// JSON document handed to the host's persistence layer.
    pub fn to_payload(&self) -> ExpenseResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            ExpenseError::Domain(DomainError::invariant(format!("bill draft not serializable: {e}")))
        })
    }
}

/// Assemble a bill dated `accounting_date`, or today when absent.
pub fn assemble(
    batch: &ExpenseBatch,
    accounting_date: Option<NaiveDate>,
    journal_id: JournalId,
    settings: &BillingSettings,
) -> ExpenseResult<BillDraft> {
    assemble_on(batch, accounting_date, Local::now().date_naive(), journal_id, settings)
}

/// [`assemble`] with an explicit "today".
#[tracing::instrument(level = "debug", skip_all, fields(lines = batch.len(), journal = %journal_id))]
pub fn assemble_on(
    batch: &ExpenseBatch,
    accounting_date: Option<NaiveDate>,
    today: NaiveDate,
    journal_id: JournalId,
    settings: &BillingSettings,
) -> ExpenseResult<BillDraft> {
    let reference = match batch.expenses() {
        [only] => only.reference().unwrap_or_default().to_string(),
        _ => batch.name(settings),
    };
    let date = accounting_date.unwrap_or(today);

    let lines: Vec<MoveLineDraft> = batch
        .expenses()
        .iter()
        .map(|expense| project(expense, settings))
        .collect();

    let partner_id = header_vendor(batch, &lines)?;
    ensure_single_vendor(partner_id, &lines)?;

    tracing::debug!(vendor = %partner_id, %date, "vendor bill assembled");
    Ok(BillDraft {
        name: UNNUMBERED.to_string(),
        date,
        invoice_date: date,
        reference,
        partner_id,
        journal_id,
        move_type: MoveType::InInvoice,
        lines,
    })
}

/// The employee's home partner, replaced by the first line's vendor whenever
/// there is a line.
fn header_vendor(batch: &ExpenseBatch, lines: &[MoveLineDraft]) -> ExpenseResult<PartnerId> {
    let fallback = batch.employee().home_partner_id;
    lines
        .first()
        .map(|line| line.partner_id)
        .or(fallback)
        .ok_or_else(|| {
            ExpenseError::Domain(DomainError::invariant(
                "bill has no lines and the employee has no home partner",
            ))
        })
}

/// Every line must bill the header vendor.
fn ensure_single_vendor(partner_id: PartnerId, lines: &[MoveLineDraft]) -> ExpenseResult<()> {
    if lines.iter().any(|line| line.partner_id != partner_id) {
        tracing::debug!(vendor = %partner_id, "bill lines span several vendors");
        return Err(ExpenseError::MixedVendor);
    }
    Ok(())
}
