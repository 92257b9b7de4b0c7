use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single recorded income or expense.
///
/// Serialized with camelCase field names; this is the exact shape stored
/// under the `entries` key. Fields this type does not know about are kept in
/// `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Random UUID assigned on creation, reused when editing
    pub id: String,
    /// Always positive; the sign comes from `is_income`
    pub amount: f64,
    /// Trimmed, never empty
    pub description: String,
    /// Date picked by the user (RFC 3339). Older records have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// `false` means expense
    pub is_income: bool,
    /// Epoch millis of creation. Missing on records written by older builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// Contribution of this entry to the income accumulator
    pub fn income_contribution(&self) -> f64 {
        if self.is_income {
            self.amount
        } else {
            0.0
        }
    }

    /// Key used for recency ordering: `created_at`, falling back to `date`.
    /// Entries with neither sort as oldest.
    pub fn recency_key(&self) -> i64 {
        self.created_at
            .or_else(|| self.date.map(|date| date.timestamp_millis()))
            .unwrap_or(i64::MIN)
    }

    pub fn type_label(&self) -> &'static str {
        if self.is_income {
            "Income"
        } else {
            "Expense"
        }
    }
}

/// Raw user input for creating or updating an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Amount exactly as typed; parsed during validation
    pub amount: String,
    pub description: String,
    /// `None` means "now" for new entries and "keep" for edits
    pub date: Option<DateTime<Utc>>,
    pub is_income: bool,
}

impl EntryDraft {
    pub fn new(amount: impl Into<String>, description: impl Into<String>, is_income: bool) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
            date: None,
            is_income,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Totals shown at the top of the entry list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BalanceSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

/// An entry prepared for display in the list or detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedEntry {
    pub id: String,
    pub description: String,
    /// "+₹500.00" / "-₹200.00"
    pub formatted_amount: String,
    /// "2025-06-13"
    pub formatted_date: String,
    /// "Income: Salary"
    pub accessibility_label: String,
    pub is_income: bool,
    pub raw_amount: f64,
}

/// A single entry as shown on the detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub id: String,
    /// "Income" / "Expense"
    pub type_label: String,
    pub description: String,
    /// Unsigned, e.g. "₹500.00"
    pub formatted_amount: String,
    /// "2025-06-13", empty when the entry has no date
    pub formatted_date: String,
}

/// Read-only view of the stored entries, refreshed each time the list is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryListSnapshot {
    /// Most recent first
    pub entries: Vec<FormattedEntry>,
    pub summary: BalanceSummary,
    pub formatted_balance: String,
    /// Advisory message when stored data could not be read
    pub notice: Option<String>,
}

impl EntryListSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State of the create/edit form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EntryFormState {
    /// Set when editing an existing entry
    pub editing_id: Option<String>,
    pub amount_input: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub is_income: bool,
}

impl EntryFormState {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            amount: self.amount_input.clone(),
            description: self.description.clone(),
            date: self.date,
            is_income: self.is_income,
        }
    }
}
