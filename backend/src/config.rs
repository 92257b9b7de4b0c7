//! Runtime configuration, read from the environment.

use std::env;

pub const DATABASE_URL_VAR: &str = "EXPENSE_TRACKER_DATABASE_URL";
pub const CURRENCY_VAR: &str = "EXPENSE_TRACKER_CURRENCY";
pub const LOG_FILTER_VAR: &str = "EXPENSE_TRACKER_LOG";

const DEFAULT_DATABASE_URL: &str = "sqlite:expenses.db";
const DEFAULT_CURRENCY: &str = "₹";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    pub database_url: String,
    /// Prefix used when formatting amounts
    pub currency_symbol: String,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            currency_symbol: DEFAULT_CURRENCY.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by any `EXPENSE_TRACKER_*` variables that are set
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |name: &str, fallback: String| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(fallback)
        };

        Self {
            database_url: read(DATABASE_URL_VAR, defaults.database_url),
            currency_symbol: read(CURRENCY_VAR, defaults.currency_symbol),
            log_filter: read(LOG_FILTER_VAR, defaults.log_filter),
        }
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }
}
