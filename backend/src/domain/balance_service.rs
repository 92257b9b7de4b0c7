//! Balance derivation for the expense tracker.
//!
//! The displayed income comes from the stored accumulator rather than being
//! summed from the entries on every render. Expenses are always summed. The
//! service can also compare the accumulator against the entries and rewrite it
//! when the two have drifted apart (for example after a failed write).

use serde::Serialize;
use shared::{BalanceSummary, Entry};
use tracing::{info, warn};

use crate::domain::entry_repository::EntryRepository;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// Differences below this are treated as float noise
const DRIFT_EPSILON: f64 = 0.001;

/// Totals for a list of entries, trusting `income_accumulator` for income
pub fn compute_balance(entries: &[Entry], income_accumulator: f64) -> BalanceSummary {
    let total_expenses: f64 = entries
        .iter()
        .filter(|entry| !entry.is_income)
        .map(|entry| entry.amount)
        .sum();

    BalanceSummary {
        total_income: income_accumulator,
        total_expenses,
        balance: income_accumulator - total_expenses,
    }
}

/// What the accumulator should hold for these entries
pub fn recompute_income(entries: &[Entry]) -> f64 {
    entries.iter().map(Entry::income_contribution).sum()
}

/// Stored versus recomputed income
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeAudit {
    pub stored: f64,
    pub recomputed: f64,
    /// `stored - recomputed`
    pub drift: f64,
}

impl IncomeAudit {
    pub fn is_consistent(&self) -> bool {
        self.drift.abs() < DRIFT_EPSILON
    }
}

pub struct BalanceService<S: KeyValueStore> {
    entry_repository: EntryRepository<S>,
}

impl<S: KeyValueStore> Clone for BalanceService<S> {
    fn clone(&self) -> Self {
        Self {
            entry_repository: self.entry_repository.clone(),
        }
    }
}

impl<S: KeyValueStore> BalanceService<S> {
    pub fn new(entry_repository: EntryRepository<S>) -> Self {
        Self { entry_repository }
    }

    pub async fn current_summary(&self) -> Result<BalanceSummary> {
        let entries = self.entry_repository.list_entries().await?;
        let income = self.entry_repository.income_accumulator().await?;
        Ok(compute_balance(&entries, income))
    }

    /// Compare the stored accumulator with the sum of income entries
    pub async fn audit_income(&self) -> Result<IncomeAudit> {
        let entries = self.entry_repository.list_entries().await?;
        let stored = self.entry_repository.income_accumulator().await?;
        let recomputed = recompute_income(&entries);

        let audit = IncomeAudit {
            stored,
            recomputed,
            drift: stored - recomputed,
        };

        if audit.is_consistent() {
            info!("Income accumulator is consistent ({:.2})", stored);
        } else {
            warn!(
                "Income accumulator drifted: stored {:.2}, entries sum to {:.2}",
                stored, recomputed
            );
        }
        Ok(audit)
    }

    /// Rewrite the accumulator from the entries, returning the new value
    pub async fn repair_income(&self) -> Result<f64> {
        let repaired = self.entry_repository.rebuild_income_accumulator().await?;
        info!("Income accumulator rebuilt as {:.2}", repaired);
        Ok(repaired)
    }
}
