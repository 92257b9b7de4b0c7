//! Error types for the expense tracker backend.
//!
//! Validation and lookup failures are surfaced to the user as-is. Reads
//! recover from undecodable stored data by showing an empty list; writes
//! refuse to run on top of it so the stored value is never overwritten. Store
//! I/O failures are wrapped once and shown as a generic notice.

use thiserror::Error;

/// Why a draft was rejected before touching the store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Description cannot be empty")]
    EmptyDescription,
    #[error("Amount is not a valid number: {0:?}")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
}

/// Why a stored value could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored entries are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored entries are not a JSON array")]
    NotAnArray,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Entry {0} not found")]
    NotFound(String),
    #[error("storage failure: {0}")]
    StorageIo(#[from] anyhow::Error),
    #[error("refusing to overwrite unreadable entries: {0}")]
    Decode(#[from] DecodeError),
}

/// Which user action an error happened in, for picking the notice text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOperation {
    /// Loading the list
    Load,
    /// Loading one entry for the detail screen or the edit form
    LoadEntry,
    Save,
    Delete,
}

pub const INVALID_DRAFT_NOTICE: &str = "Please enter a valid amount and description";
pub const NOT_FOUND_NOTICE: &str = "Entry not found";

impl LedgerError {
    /// User-facing message for this error
    pub fn notice(&self, operation: EntryOperation) -> String {
        match self {
            LedgerError::Validation(_) => INVALID_DRAFT_NOTICE.to_string(),
            LedgerError::NotFound(_) => NOT_FOUND_NOTICE.to_string(),
            LedgerError::StorageIo(_) | LedgerError::Decode(_) => match operation {
                EntryOperation::Load => "Failed to load data".to_string(),
                EntryOperation::LoadEntry => "Failed to load entry".to_string(),
                EntryOperation::Save => "Failed to save entry".to_string(),
                EntryOperation::Delete => "Failed to delete entry".to_string(),
            },
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
