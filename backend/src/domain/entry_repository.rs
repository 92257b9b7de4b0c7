//! Entry repository for the expense tracker.
//!
//! The repository owns both persisted values: the entry collection and the
//! income accumulator. Every mutation reads the whole collection, changes it
//! in memory and writes it back, then applies the matching change to the
//! accumulator:
//!
//! - create: add the new amount if it is income
//! - update: subtract the old amount if it was income, add the new amount if
//!   it is income
//! - delete: subtract the amount if it was income
//!
//! Mutations never build on a collection that failed to decode: a value that
//! is valid JSON but not an array is replaced, anything else aborts the write
//! with [`LedgerError::Decode`] and leaves the stored value alone.
//!
//! The two writes are independent. If the second one fails the collection is
//! already stored and the accumulator drifts; see
//! [`BalanceService::audit_income`](super::balance_service::BalanceService::audit_income).
//!
//! Mutations through one repository (and its clones) are serialised. Nothing
//! protects against other writers on the same store.

use chrono::Utc;
use shared::{Entry, EntryDraft};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::balance_service::recompute_income;
use crate::error::{DecodeError, LedgerError, Result, ValidationError};
use crate::storage::entry_codec::{decode_entries, decode_income, encode_entries, encode_income};
use crate::storage::{KeyValueStore, ENTRIES_KEY, INCOME_KEY};

/// Draft fields after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub amount: f64,
    pub description: String,
}

/// Parse an amount as typed by the user
pub fn parse_amount(input: &str) -> std::result::Result<f64, ValidationError> {
    let trimmed = input.trim();
    let amount = trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount(trimmed.to_string()))?;

    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

pub fn clean_description(input: &str) -> std::result::Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Check a draft without touching the store
pub fn validate_draft(draft: &EntryDraft) -> std::result::Result<ValidatedDraft, ValidationError> {
    let description = clean_description(&draft.description)?;
    let amount = parse_amount(&draft.amount)?;
    Ok(ValidatedDraft { amount, description })
}

/// Result of reading the collection, noting whether bad data was discarded
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedEntries {
    pub entries: Vec<Entry>,
    pub recovered_from_decode_error: bool,
}

pub struct EntryRepository<S: KeyValueStore> {
    store: Arc<S>,
    write_lock: Arc<Mutex<()>>,
}

impl<S: KeyValueStore> Clone for EntryRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<S: KeyValueStore> EntryRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All stored entries in storage order. Unreadable data reads as empty.
    pub async fn list_entries(&self) -> Result<Vec<Entry>> {
        Ok(self.load_entries().await?.entries)
    }

    pub async fn load_entries(&self) -> Result<LoadedEntries> {
        let raw = self.read(ENTRIES_KEY).await?;
        match decode_entries(raw.as_deref()) {
            Ok(entries) => Ok(LoadedEntries {
                entries,
                recovered_from_decode_error: false,
            }),
            Err(e) => {
                warn!("Discarding unreadable entry collection: {}", e);
                Ok(LoadedEntries {
                    entries: Vec::new(),
                    recovered_from_decode_error: true,
                })
            }
        }
    }

    pub async fn get_entry(&self, id: &str) -> Result<Option<Entry>> {
        let entries = self.list_entries().await?;
        Ok(entries.into_iter().find(|entry| entry.id == id))
    }

    /// Current value of the income accumulator
    pub async fn income_accumulator(&self) -> Result<f64> {
        let raw = self.read(INCOME_KEY).await?;
        Ok(decode_income(raw.as_deref()))
    }

    pub async fn create_entry(&self, draft: EntryDraft) -> Result<Entry> {
        let validated = validate_draft(&draft)?;

        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries_for_write().await?;

        let now = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            amount: validated.amount,
            description: validated.description,
            date: Some(draft.date.unwrap_or(now)),
            is_income: draft.is_income,
            created_at: Some(now.timestamp_millis()),
            extra: Default::default(),
        };

        entries.push(entry.clone());
        self.save_entries(&entries).await?;

        if entry.is_income {
            let income = self.income_accumulator().await?;
            self.save_income(income + entry.amount).await?;
        }

        info!(
            "Created {} entry {} ({:.2})",
            kind(&entry),
            entry.id,
            entry.amount
        );
        Ok(entry)
    }

    /// Replace an entry's fields, keeping its id, creation time and any
    /// fields written by other clients
    pub async fn update_entry(&self, id: &str, draft: EntryDraft) -> Result<Entry> {
        let validated = validate_draft(&draft)?;

        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries_for_write().await?;

        let slot = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        let updated = Entry {
            id: slot.id.clone(),
            amount: validated.amount,
            description: validated.description,
            date: draft.date.or(slot.date),
            is_income: draft.is_income,
            created_at: slot.created_at,
            extra: slot.extra.clone(),
        };
        let previous = std::mem::replace(slot, updated.clone());

        self.save_entries(&entries).await?;

        if previous.is_income || updated.is_income {
            let mut income = self.income_accumulator().await?;
            if previous.is_income {
                income -= previous.amount;
            }
            if updated.is_income {
                income += updated.amount;
            }
            self.save_income(income).await?;
        }

        info!(
            "Updated entry {}: {} {:.2} -> {} {:.2}",
            id,
            kind(&previous),
            previous.amount,
            kind(&updated),
            updated.amount
        );
        Ok(updated)
    }

    /// Remove an entry. Unknown ids are ignored.
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries_for_write().await?;

        let Some(position) = entries.iter().position(|entry| entry.id == id) else {
            debug!("Delete of unknown entry {} ignored", id);
            return Ok(());
        };
        let removed = entries.remove(position);

        self.save_entries(&entries).await?;

        if removed.is_income {
            let income = self.income_accumulator().await?;
            self.save_income(income - removed.amount).await?;
        }

        info!("Deleted {} entry {}", kind(&removed), id);
        Ok(())
    }

    /// Overwrite the accumulator with the sum recomputed from the entries
    pub async fn rebuild_income_accumulator(&self) -> Result<f64> {
        let _guard = self.write_lock.lock().await;
        let entries = self.entries_for_write().await?;
        let income = recompute_income(&entries);
        self.save_income(income).await?;
        Ok(income)
    }

    /// The collection a mutation starts from
    async fn entries_for_write(&self) -> Result<Vec<Entry>> {
        let raw = self.read(ENTRIES_KEY).await?;
        match decode_entries(raw.as_deref()) {
            Ok(entries) => Ok(entries),
            Err(DecodeError::NotAnArray) => {
                warn!("Stored entries are not an array, starting a new collection");
                Ok(Vec::new())
            }
            Err(e) => {
                error!("Not writing over unreadable entries: {}", e);
                Err(e.into())
            }
        }
    }

    async fn save_entries(&self, entries: &[Entry]) -> Result<()> {
        let encoded = encode_entries(entries).map_err(anyhow::Error::from)?;
        self.write(ENTRIES_KEY, &encoded).await
    }

    async fn save_income(&self, income: f64) -> Result<()> {
        self.write(INCOME_KEY, &encode_income(income)).await
    }

    async fn read(&self, key: &str) -> Result<Option<String>> {
        self.store.get_value(key).await.map_err(|e| {
            error!("Failed to read {}: {:#}", key, e);
            LedgerError::StorageIo(e)
        })
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        self.store.put_value(key, value).await.map_err(|e| {
            error!("Failed to write {}: {:#}", key, e);
            LedgerError::StorageIo(e)
        })
    }
}

fn kind(entry: &Entry) -> &'static str {
    if entry.is_income {
        "income"
    } else {
        "expense"
    }
}
