// Post-WAR adjustments: sample-size confidence, age curve, and form.
//
// Each adjustment is a pure function of the record and its configuration.
// Confidence shrinks a value toward the league average; age and form are
// multipliers applied after it.

use crate::config::{AgeCurveConfig, ConfidenceConfig, FormConfig};
use crate::player::{PlayerStatRecord, Role};

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Weight given to a player's own numbers for a sample of `matches`.
///
/// Picks the tier with the largest `min_matches` not above `matches`, falling
/// back to `floor` when no tier applies. Tiers may be listed in any order.
pub fn confidence(matches: u32, cfg: &ConfidenceConfig) -> f64 {
    cfg.tiers
        .iter()
        .filter(|tier| matches >= tier.min_matches)
        .max_by_key(|tier| tier.min_matches)
        .map(|tier| tier.weight)
        .unwrap_or(cfg.floor)
}

/// Blend a base value toward the league average by `weight`.
///
/// `adjusted = base * weight + league_average * (1 - weight)`
pub fn adjusted_value(base_value: f64, weight: f64, cfg: &ConfidenceConfig) -> f64 {
    base_value * weight + cfg.league_average_value * (1.0 - weight)
}

// ---------------------------------------------------------------------------
// Age
// ---------------------------------------------------------------------------

/// Age multiplier for a player of `age` in `role`.
///
/// Flat at `peak_multiplier` inside the role's peak window. Younger players
/// get a development bonus per year short of the window; older players lose
/// `decline_per_year` per year past it, never dropping below `floor`.
pub fn age_multiplier(age: u32, role: Role, cfg: &AgeCurveConfig) -> f64 {
    let window = cfg.window(role);

    if age < window.start {
        1.0 + (window.start - age) as f64 * cfg.youth_bonus_per_year
    } else if age <= window.end {
        cfg.peak_multiplier
    } else {
        (1.0 - (age - window.end) as f64 * cfg.decline_per_year).max(cfg.floor)
    }
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Form multiplier from headline rate stats.
///
/// Starts at 1.0. A strike rate above the threshold sets the batting
/// multiplier; an economy below the threshold then sets the bowling
/// multiplier, replacing the batting one. Either career block counts,
/// regardless of role.
pub fn form_multiplier(record: &PlayerStatRecord, cfg: &FormConfig) -> f64 {
    let mut multiplier = 1.0;
    if record
        .batting
        .as_ref()
        .is_some_and(|b| b.strike_rate > cfg.strike_rate_threshold)
    {
        multiplier = cfg.batting_multiplier;
    }
    if record
        .bowling
        .as_ref()
        .is_some_and(|b| b.economy < cfg.economy_threshold)
    {
        multiplier = cfg.bowling_multiplier;
    }
    multiplier
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
