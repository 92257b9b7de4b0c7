//! # Expense Tracker Backend
//!
//! All non-UI logic of the expense tracker: entry persistence, the income
//! accumulator, balance derivation, and the view logic behind the list,
//! detail and create/edit screens.
//!
//! ## Architecture
//!
//! ```text
//! Screens (external)
//!     ↓
//! Domain (EntryListService, EntryFormService, BalanceService)
//!     ↓
//! EntryRepository
//!     ↓
//! Storage (KeyValueStore: SQLite or in-memory)
//! ```
//!
//! The repository is the only component that writes to the store. Screens
//! hold read-only snapshots and refresh them after every mutation.

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use config::LedgerConfig;
pub use domain::*;
pub use error::{EntryOperation, LedgerError};
pub use storage::{DbConnection, InMemoryStore, KeyValueStore};

/// Services shared by all screens, wired to one repository
pub struct AppState<S: KeyValueStore> {
    pub entry_repository: EntryRepository<S>,
    pub balance_service: BalanceService<S>,
    pub entry_list_service: EntryListService<S>,
    pub entry_form_service: EntryFormService<S>,
}

impl<S: KeyValueStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            entry_repository: self.entry_repository.clone(),
            balance_service: self.balance_service.clone(),
            entry_list_service: self.entry_list_service.clone(),
            entry_form_service: self.entry_form_service.clone(),
        }
    }
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(store: Arc<S>, config: &LedgerConfig) -> Self {
        let entry_repository = EntryRepository::new(store);
        Self {
            balance_service: BalanceService::new(entry_repository.clone()),
            entry_list_service: EntryListService::new(
                entry_repository.clone(),
                config.currency_symbol.clone(),
            ),
            entry_form_service: EntryFormService::new(entry_repository.clone()),
            entry_repository,
        }
    }
}

/// Install the global tracing subscriber. Later calls are ignored.
pub fn init_tracing(config: &LedgerConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Set up logging and the SQLite store, and wire the services
pub async fn initialize_backend(config: &LedgerConfig) -> Result<AppState<DbConnection>> {
    init_tracing(config);

    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(Arc::new(db_conn), config))
}
