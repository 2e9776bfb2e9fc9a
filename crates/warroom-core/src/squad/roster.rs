// The acquired squad: ordered entries mutated only through validated verbs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SquadRules;
use crate::squad::validator::{validate_addition, Rejection};
use crate::valuation::{ValuationResult, ValuedPlayer};

/// Purse position after the current signings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total_purse: f64,
    pub spent: f64,
    pub remaining: f64,
    pub slots_remaining: usize,
    /// `slots_remaining * min_reserve_per_slot`.
    pub min_reserve: f64,
    /// `max(0, remaining - min_reserve)`.
    pub available: f64,
}

/// Ordered roster of acquired players.
///
/// Holds only entries that passed `validate_addition` against the squad as it
/// stood at the time, so the size, overseas, and purse limits always hold.
#[derive(Debug, Clone)]
pub struct Squad {
    rules: SquadRules,
    entries: Vec<ValuedPlayer>,
}

impl Squad {
    pub fn new(rules: SquadRules) -> Self {
        Squad {
            rules,
            entries: Vec::new(),
        }
    }

    /// Read-only view in signing order.
    pub fn snapshot(&self) -> &[ValuedPlayer] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.iter().any(|p| p.id() == player_id)
    }

    // --- Verbs ---

    /// Sign `candidate` if every constraint holds. The squad is untouched on
    /// rejection.
    pub fn add(&mut self, candidate: ValuedPlayer) -> Result<(), Rejection> {
        validate_addition(&self.entries, &candidate, &self.rules)?;
        debug!(
            "signed {} for {:.2} Cr ({} in squad)",
            candidate.record.name,
            candidate.price(),
            self.entries.len() + 1
        );
        self.entries.push(candidate);
        Ok(())
    }

    /// Release a player. Returns the removed entry, or `None` if the id is
    /// not in the squad.
    pub fn remove(&mut self, player_id: &str) -> Option<ValuedPlayer> {
        let idx = self.entries.iter().position(|p| p.id() == player_id)?;
        let removed = self.entries.remove(idx);
        debug!("released {} ({} in squad)", removed.record.name, self.entries.len());
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // --- Queries ---

    pub fn spent(&self) -> f64 {
        self.entries.iter().map(ValuedPlayer::price).sum()
    }

    pub fn remaining(&self) -> f64 {
        self.rules.total_purse - self.spent()
    }

    pub fn overseas_count(&self) -> usize {
        self.entries.iter().filter(|p| p.is_overseas()).count()
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        let spent = self.spent();
        let remaining = self.rules.total_purse - spent;
        let slots_remaining = self.rules.max_squad_size.saturating_sub(self.entries.len());
        let min_reserve = slots_remaining as f64 * self.rules.min_reserve_per_slot;
        BudgetSummary {
            total_purse: self.rules.total_purse,
            spent,
            remaining,
            slots_remaining,
            min_reserve,
            available: (remaining - min_reserve).max(0.0),
        }
    }

    // --- Persistence ---

    /// Serializable copy of the current squad.
    pub fn to_saved(&self) -> SavedSquad {
        SavedSquad {
            saved_at: Utc::now(),
            players: self
                .entries
                .iter()
                .map(|p| SavedEntry {
                    id: p.id().to_string(),
                    valuation: p.valuation,
                })
                .collect(),
        }
    }

    /// Rebuild the squad from saved ids, looking each one up in `pool` and
    /// replaying it through the validator.
    ///
    /// Ids missing from the pool and entries the current rules reject are
    /// skipped with a warning. Returns the number of players restored.
    pub fn restore(&mut self, saved: &SavedSquad, pool: &[ValuedPlayer]) -> usize {
        self.entries.clear();
        for entry in &saved.players {
            let Some(player) = pool.iter().find(|p| p.id() == entry.id) else {
                warn!("Saved squad player {} is not in the dataset; skipping", entry.id);
                continue;
            };
            if let Err(rejection) = self.add(player.clone()) {
                warn!("Saved squad player {} no longer fits: {}", entry.id, rejection);
            }
        }
        self.entries.len()
    }
}

/// One saved roster entry. The valuation at signing time is kept for
/// reference; restore always re-prices from the current dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub id: String,
    pub valuation: ValuationResult,
}

/// Persisted squad document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSquad {
    pub saved_at: DateTime<Utc>,
    pub players: Vec<SavedEntry>,
}

impl SavedSquad {
    pub fn ids(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
