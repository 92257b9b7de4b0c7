//! # Storage Traits
//!
//! The repository only ever needs to read and overwrite whole values by key,
//! so that is all the store abstraction offers. No delete, batch or
//! transaction primitive is used.

use anyhow::Result;
use async_trait::async_trait;

/// Key under which the JSON entry collection is stored
pub const ENTRIES_KEY: &str = "entries";

/// Key under which the income accumulator is stored
pub const INCOME_KEY: &str = "income";

/// Trait defining the interface for the string key-value store
///
/// Writes to different keys are independent; there is no way to update
/// `entries` and `income` atomically through this interface.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve a value by key, `None` if it was never written
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing whatever was there
    async fn put_value(&self, key: &str, value: &str) -> Result<()>;
}
