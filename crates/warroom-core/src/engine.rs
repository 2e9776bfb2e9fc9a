// War room facade: valued player pool, the squad, and its persistence.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::db::KeyValueStore;
use crate::player::PlayerStatRecord;
use crate::squad::composition::{self, Composition, Gap};
use crate::squad::lineup::{self, KeeperEligibility, Lineup, NameHintKeeper};
use crate::squad::roster::{BudgetSummary, SavedSquad, Squad};
use crate::valuation::{self, ValuedPlayer};

/// Outcome of a squad mutation, with a message fit to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    fn ok(message: impl Into<String>) -> Self {
        ActionResult {
            success: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            message: message.into(),
        }
    }
}

/// Format an amount in crores, e.g. `₹12.34 Cr`.
pub fn format_crores(value: f64) -> String {
    format!("₹{value:.2} Cr")
}

/// The single handle the front end talks to.
///
/// Owns the valued pool (computed once at construction), the squad, and the
/// store it is saved to. Every mutation saves the squad afterwards; a failed
/// save is logged and the in-memory squad stays authoritative.
pub struct WarRoom<S: KeyValueStore> {
    config: Config,
    players: Vec<ValuedPlayer>,
    squad: Squad,
    keeper: Box<dyn KeeperEligibility>,
    store: S,
}

impl<S: KeyValueStore> WarRoom<S> {
    /// Value `records`, then restore any squad previously saved in `store`.
    pub fn new(config: Config, records: &[PlayerStatRecord], store: S) -> Result<Self> {
        config::validate(&config).context("invalid configuration")?;

        let players = valuation::value_all(records, &config.valuation).context("failed to value player pool")?;
        info!(
            "Valued {} players, pool total {}",
            players.len(),
            format_crores(valuation::pool_total(&players))
        );

        let keeper = Box::new(NameHintKeeper::new(&config.squad.keeper_name_hints));
        let mut room = WarRoom {
            squad: Squad::new(config.squad.clone()),
            config,
            players,
            keeper,
            store,
        };
        room.restore()?;
        Ok(room)
    }

    /// Replace the keeper-eligibility check.
    pub fn with_keeper(mut self, keeper: impl KeeperEligibility + 'static) -> Self {
        self.keeper = Box::new(keeper);
        self
    }

    fn restore(&mut self) -> Result<()> {
        let key = &self.config.database.squad_key;
        let Some(json) = self.store.load(key).context("failed to load saved squad")? else {
            info!("No saved squad under '{}', starting fresh", key);
            return Ok(());
        };

        let saved: SavedSquad = match serde_json::from_str(&json) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Ignoring unreadable saved squad: {}", e);
                return Ok(());
            }
        };

        let restored = self.squad.restore(&saved, &self.players);
        info!(
            "Restored {} of {} saved players (saved at {})",
            restored,
            saved.players.len(),
            saved.saved_at
        );
        Ok(())
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.squad.to_saved())
            .context("failed to serialize squad")
            .and_then(|json| self.store.save(&self.config.database.squad_key, &json));
        if let Err(e) = result {
            warn!("Failed to save squad: {:#}", e);
        }
    }

    // --- Mutations ---

    pub fn add_player(&mut self, player_id: &str) -> ActionResult {
        let Some(player) = self.player(player_id).cloned() else {
            return ActionResult::fail(format!("Player {player_id} not found"));
        };
        let name = player.record.name.clone();
        let price = player.price();

        match self.squad.add(player) {
            Ok(()) => {
                info!("Added {} to squad for {}", name, format_crores(price));
                self.persist();
                ActionResult::ok(format!("{name} added to squad for {}", format_crores(price)))
            }
            Err(rejection) => {
                info!("Rejected {}: {}", name, rejection);
                ActionResult::fail(rejection.to_string())
            }
        }
    }

    pub fn remove_player(&mut self, player_id: &str) -> ActionResult {
        match self.squad.remove(player_id) {
            Some(removed) => {
                info!("Removed {} from squad", removed.record.name);
                self.persist();
                ActionResult::ok(format!("{} removed from squad", removed.record.name))
            }
            None => ActionResult::fail(format!("Player {player_id} is not in the squad")),
        }
    }

    pub fn clear_roster(&mut self) -> ActionResult {
        let count = self.squad.len();
        self.squad.clear();
        info!("Cleared squad ({} players released)", count);
        self.persist();
        ActionResult::ok("Squad cleared")
    }

    // --- Queries ---

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The whole valued pool in dataset order.
    pub fn valued_players(&self) -> &[ValuedPlayer] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&ValuedPlayer> {
        self.players.iter().find(|p| p.id() == player_id)
    }

    pub fn squad(&self) -> &[ValuedPlayer] {
        self.squad.snapshot()
    }

    pub fn in_squad(&self, player_id: &str) -> bool {
        self.squad.contains(player_id)
    }

    pub fn spent(&self) -> f64 {
        self.squad.spent()
    }

    pub fn remaining(&self) -> f64 {
        self.squad.remaining()
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        self.squad.budget_summary()
    }

    pub fn pool_total(&self) -> f64 {
        valuation::pool_total(&self.players)
    }

    pub fn composition(&self) -> Composition {
        composition::composition(self.squad.snapshot())
    }

    pub fn gaps(&self) -> Vec<Gap> {
        composition::gaps(self.squad.snapshot(), self.keeper.as_ref())
    }

    pub fn best_lineup(&self) -> Option<Lineup<'_>> {
        lineup::best_lineup(
            self.squad.snapshot(),
            self.keeper.as_ref(),
            self.config.squad.max_lineup_overseas,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
