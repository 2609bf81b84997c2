//! Formatting knobs for labels, references and report names.

use std::fmt::Write as _;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use vendorbill_core::{DomainError, DomainResult};

pub const DATE_FORMAT_ENV: &str = "VENDORBILL_DATE_FORMAT";
pub const LABEL_MAX_CHARS_ENV: &str = "VENDORBILL_LABEL_MAX_CHARS";

/// Settings shared by the projector, the splitter and the bill assembler.
///
/// Deserialized documents may omit fields (defaults apply) and are checked
/// with [`BillingSettings::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SettingsRecord")]
pub struct BillingSettings {
    /// `strftime` pattern used for report names built from a date range.
    pub date_format: String,
    /// Characters kept from the first line of an expense description.
    pub label_max_chars: usize,
    /// Prefix inside the brackets of a referenced line label (`[bill#R1] `).
    pub bill_reference_prefix: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            label_max_chars: 64,
            bill_reference_prefix: "bill#".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct SettingsRecord {
    date_format: String,
    label_max_chars: usize,
    bill_reference_prefix: String,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        let BillingSettings {
            date_format,
            label_max_chars,
            bill_reference_prefix,
        } = BillingSettings::default();
        Self {
            date_format,
            label_max_chars,
            bill_reference_prefix,
        }
    }
}

impl TryFrom<SettingsRecord> for BillingSettings {
    type Error = DomainError;

    fn try_from(record: SettingsRecord) -> Result<Self, Self::Error> {
        let settings = BillingSettings {
            date_format: record.date_format,
            label_max_chars: record.label_max_chars,
            bill_reference_prefix: record.bill_reference_prefix,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl BillingSettings {
    /// Defaults overridden by `VENDORBILL_DATE_FORMAT` / `VENDORBILL_LABEL_MAX_CHARS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BillingSettings::from_env`] with an injectable variable source.
    ///
    /// Unusable values are ignored with a warning, keeping the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(format) = lookup(DATE_FORMAT_ENV) {
            if is_valid_date_format(&format) {
                settings.date_format = format;
            } else {
                tracing::warn!(value = %format, "{DATE_FORMAT_ENV} is not a valid date format; using default");
            }
        }

        if let Some(raw) = lookup(LABEL_MAX_CHARS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => settings.label_max_chars = n,
                _ => {
                    tracing::warn!(value = %raw, "{LABEL_MAX_CHARS_ENV} must be a positive integer; using default");
                }
            }
        }

        settings
    }

    /// Check a set of settings; deserialization runs this too.
    pub fn validate(&self) -> DomainResult<()> {
        if !is_valid_date_format(&self.date_format) {
            return Err(DomainError::validation(format!(
                "invalid date format: {:?}",
                self.date_format
            )));
        }
        if self.label_max_chars == 0 {
            return Err(DomainError::validation("label_max_chars must be positive"));
        }
        Ok(())
    }

    /// Format a date for report names; falls back to ISO-8601 on a bad pattern.
    pub fn format_date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }
}

fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}
