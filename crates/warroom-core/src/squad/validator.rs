// Roster constraint checks run before every addition.

use thiserror::Error;

use crate::config::SquadRules;
use crate::valuation::ValuedPlayer;

/// Slack allowed when comparing a price against the spendable purse, so
/// accumulated floating-point noise never rejects an exactly affordable player.
pub const BUDGET_EPSILON: f64 = 1e-9;

/// Why a candidate was turned away. The display text is user-facing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("{name} is already in the squad")]
    Duplicate { name: String },

    #[error("Squad full! Maximum {max} players allowed")]
    SquadFull { max: usize },

    #[error("Maximum {max} overseas players allowed")]
    OverseasCap { max: usize },

    #[error(
        "Not enough budget for {name} at ₹{price:.2} Cr: ₹{available:.2} Cr available after reserving ₹{reserve:.2} Cr for remaining slots"
    )]
    InsufficientBudget {
        name: String,
        price: f64,
        available: f64,
        reserve: f64,
    },
}

/// Minimum purse held back for the slots still open after one more signing.
pub fn reserve_after_next(current_size: usize, rules: &SquadRules) -> f64 {
    let open_after = rules.max_squad_size.saturating_sub(current_size + 1);
    open_after as f64 * rules.min_reserve_per_slot
}

/// Check whether `candidate` may join `entries`.
///
/// Checks run in a fixed order (duplicate, size, overseas, budget) and the
/// first failure is returned.
pub fn validate_addition(
    entries: &[ValuedPlayer],
    candidate: &ValuedPlayer,
    rules: &SquadRules,
) -> Result<(), Rejection> {
    if entries.iter().any(|p| p.id() == candidate.id()) {
        return Err(Rejection::Duplicate {
            name: candidate.record.name.clone(),
        });
    }

    if entries.len() >= rules.max_squad_size {
        return Err(Rejection::SquadFull {
            max: rules.max_squad_size,
        });
    }

    if candidate.is_overseas() {
        let overseas = entries.iter().filter(|p| p.is_overseas()).count();
        if overseas >= rules.max_overseas {
            return Err(Rejection::OverseasCap {
                max: rules.max_overseas,
            });
        }
    }

    let spent: f64 = entries.iter().map(ValuedPlayer::price).sum();
    let remaining = rules.total_purse - spent;
    let reserve = reserve_after_next(entries.len(), rules);
    let available = remaining - reserve;
    if candidate.price() > available + BUDGET_EPSILON {
        return Err(Rejection::InsufficientBudget {
            name: candidate.record.name.clone(),
            price: candidate.price(),
            available: available.max(0.0),
            reserve,
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
