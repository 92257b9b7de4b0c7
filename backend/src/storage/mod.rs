//! # Storage Module
//!
//! Persistence for the expense tracker. The domain layer talks to a
//! [`KeyValueStore`] and never to SQLite directly, so the store can be
//! swapped for the in-memory implementation in tests.
//!
//! Two keys are used: [`ENTRIES_KEY`] for the JSON entry collection and
//! [`INCOME_KEY`] for the income accumulator.

pub mod db;
pub mod entry_codec;
pub mod memory;
pub mod traits;

pub use db::DbConnection;
pub use memory::InMemoryStore;
pub use traits::{KeyValueStore, ENTRIES_KEY, INCOME_KEY};
