//! Entry list and detail view logic.
//!
//! Turns stored entries into the read-only snapshot the list screen renders:
//! most recent first, amounts signed by category, and the balance summary on
//! top. The screen keeps no state of its own beyond the last snapshot and asks
//! for a fresh one whenever it regains focus.

use shared::{Entry, EntryDetail, EntryListSnapshot, FormattedEntry};
use std::cmp::Reverse;
use tracing::info;

use crate::domain::balance_service::compute_balance;
use crate::domain::entry_repository::EntryRepository;
use crate::error::Result;
use crate::storage::KeyValueStore;

pub const INVALID_DATA_NOTICE: &str = "Invalid data format in storage";
pub const DELETED_NOTICE: &str = "Entry deleted";

/// Most recent first, by `created_at` and falling back to `date`
pub fn sort_by_recency(entries: &mut [Entry]) {
    entries.sort_by_key(|entry| Reverse(entry.recency_key()));
}

pub struct EntryListService<S: KeyValueStore> {
    entry_repository: EntryRepository<S>,
    currency_symbol: String,
}

impl<S: KeyValueStore> Clone for EntryListService<S> {
    fn clone(&self) -> Self {
        Self {
            entry_repository: self.entry_repository.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

impl<S: KeyValueStore> EntryListService<S> {
    pub fn new(entry_repository: EntryRepository<S>, currency_symbol: impl Into<String>) -> Self {
        Self {
            entry_repository,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Everything the list screen shows
    pub async fn load_snapshot(&self) -> Result<EntryListSnapshot> {
        let loaded = self.entry_repository.load_entries().await?;
        let income = self.entry_repository.income_accumulator().await?;

        let summary = compute_balance(&loaded.entries, income);

        let mut entries = loaded.entries;
        sort_by_recency(&mut entries);

        info!(
            "Loaded {} entries, balance {:.2}",
            entries.len(),
            summary.balance
        );

        Ok(EntryListSnapshot {
            entries: entries.iter().map(|entry| self.format_entry(entry)).collect(),
            formatted_balance: self.format_balance(summary.balance),
            summary,
            notice: loaded
                .recovered_from_decode_error
                .then(|| INVALID_DATA_NOTICE.to_string()),
        })
    }

    /// Detail screen view. Errors should be shown with
    /// [`EntryOperation::LoadEntry`](crate::error::EntryOperation::LoadEntry).
    pub async fn load_detail(&self, id: &str) -> Result<Option<EntryDetail>> {
        let entry = self.entry_repository.get_entry(id).await?;
        Ok(entry.map(|entry| self.format_detail(&entry)))
    }

    /// Delete from the detail screen, returning the confirmation notice
    pub async fn delete(&self, id: &str) -> Result<String> {
        self.entry_repository.delete_entry(id).await?;
        Ok(DELETED_NOTICE.to_string())
    }

    pub fn format_entry(&self, entry: &Entry) -> FormattedEntry {
        FormattedEntry {
            id: entry.id.clone(),
            description: entry.description.clone(),
            formatted_amount: self.format_amount(entry),
            formatted_date: format_date(entry),
            accessibility_label: accessibility_label(entry),
            is_income: entry.is_income,
            raw_amount: entry.amount,
        }
    }

    pub fn format_detail(&self, entry: &Entry) -> EntryDetail {
        EntryDetail {
            id: entry.id.clone(),
            type_label: entry.type_label().to_string(),
            description: entry.description.clone(),
            formatted_amount: format!("{}{:.2}", self.currency_symbol, entry.amount),
            formatted_date: format_date(entry),
        }
    }

    /// "+₹500.00" for income, "-₹200.00" for expenses
    pub fn format_amount(&self, entry: &Entry) -> String {
        let sign = if entry.is_income { '+' } else { '-' };
        format!("{}{}{:.2}", sign, self.currency_symbol, entry.amount)
    }

    pub fn format_balance(&self, balance: f64) -> String {
        if balance < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, balance.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, balance)
        }
    }
}

pub fn format_date(entry: &Entry) -> String {
    entry
        .date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn accessibility_label(entry: &Entry) -> String {
    format!("{}: {}", entry.type_label(), entry.description)
}
