// Wins Above Replacement for batting, bowling, and all-rounders.
//
// Batting production is measured as runs created, bowling production as runs
// saved against a league-average bowler. Each is compared to a replacement
// level and converted to wins at `runs_per_win`. Both disciplines clamp at
// zero: a sub-replacement player is worth a replacement, not less.

use crate::config::WarConstants;
use crate::player::{Discipline, InvalidStatsError, PlayerStatRecord, Role};
use crate::valuation::normalize::{normalize_batting, normalize_bowling, SeasonBatting, SeasonBowling};

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

/// Fractional bonus on runs for scoring quickly. Zero at or below the
/// threshold, capped at `strike_rate_bonus_cap`.
pub fn strike_rate_bonus(strike_rate: f64, c: &WarConstants) -> f64 {
    if strike_rate <= c.strike_rate_threshold {
        return 0.0;
    }
    ((strike_rate - c.strike_rate_threshold) / c.strike_rate_divisor).min(c.strike_rate_bonus_cap)
}

/// Batting Runs Created for one season.
pub fn batting_runs_created(season: &SeasonBatting, c: &WarConstants) -> f64 {
    let boundary_bonus = season.boundaries() * c.boundary_run_value;
    let strike_rate_bonus = season.runs * strike_rate_bonus(season.strike_rate, c);
    let winning_bonus = season.runs_in_wins * c.runs_in_wins_weight;
    let pressure_bonus = season.high_pressure_runs * c.high_pressure_weight;

    season.runs + boundary_bonus + strike_rate_bonus + winning_bonus + pressure_bonus
}

pub fn batting_war(season: &SeasonBatting, c: &WarConstants) -> f64 {
    let above_replacement = batting_runs_created(season, c) - c.replacement_level_batting;
    (above_replacement / c.runs_per_win).max(0.0)
}

// ---------------------------------------------------------------------------
// Bowling
// ---------------------------------------------------------------------------

/// Extra credit for runs saved in the death overs. Only bowlers with recorded
/// death overs and a recorded death economy qualify; a death economy worse
/// than league average earns nothing rather than a penalty.
pub fn death_overs_premium(season: &SeasonBowling, c: &WarConstants) -> f64 {
    if season.death_overs <= 0.0 || season.death_economy <= 0.0 {
        return 0.0;
    }
    let saved_per_over = (c.league_average_death_economy - season.death_economy).max(0.0);
    season.death_overs * saved_per_over * c.death_overs_weight
}

/// Bowling Runs Saved for one season.
pub fn bowling_runs_saved(season: &SeasonBowling, c: &WarConstants) -> f64 {
    let expected_runs = season.overs * c.league_average_economy;
    let actual_runs = season.overs * season.economy;
    let wicket_value = season.wickets * c.wicket_run_value;
    let powerplay_bonus = season.powerplay_wickets * c.powerplay_wicket_value;

    (expected_runs - actual_runs) + wicket_value + death_overs_premium(season, c) + powerplay_bonus
}

pub fn bowling_war(season: &SeasonBowling, c: &WarConstants) -> f64 {
    let above_replacement = bowling_runs_saved(season, c) - c.replacement_level_bowling;
    (above_replacement / c.runs_per_win).max(0.0)
}

// ---------------------------------------------------------------------------
// Role selection
// ---------------------------------------------------------------------------

/// Combined value of a player contributing in both disciplines.
pub fn all_rounder_war(batting: f64, bowling: f64, c: &WarConstants) -> f64 {
    (batting.max(0.0) + bowling.max(0.0)) * c.flexibility_premium
}

/// Per-discipline WAR plus the role-selected total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarBreakdown {
    pub batting: Option<f64>,
    pub bowling: Option<f64>,
    pub total: f64,
}

/// Compute the role-selected WAR for a record.
///
/// Only the disciplines the role is priced on contribute; a batsman's
/// part-time bowling record does not.
pub fn role_war(record: &PlayerStatRecord, c: &WarConstants) -> Result<WarBreakdown, InvalidStatsError> {
    record.validate()?;

    let season_batting = |r: &PlayerStatRecord| -> Result<f64, InvalidStatsError> {
        let career = r.batting.as_ref().ok_or_else(|| missing(r, Discipline::Batting))?;
        Ok(batting_war(&normalize_batting(&r.id, career, c.matches_per_season)?, c))
    };
    let season_bowling = |r: &PlayerStatRecord| -> Result<f64, InvalidStatsError> {
        let career = r.bowling.as_ref().ok_or_else(|| missing(r, Discipline::Bowling))?;
        Ok(bowling_war(&normalize_bowling(&r.id, career, c.matches_per_season)?, c))
    };

    let breakdown = match record.role {
        Role::Batsman => {
            let bat = season_batting(record)?;
            WarBreakdown {
                batting: Some(bat),
                bowling: None,
                total: bat,
            }
        }
        Role::Bowler => {
            let bowl = season_bowling(record)?;
            WarBreakdown {
                batting: None,
                bowling: Some(bowl),
                total: bowl,
            }
        }
        Role::AllRounder => {
            let bat = season_batting(record)?;
            let bowl = season_bowling(record)?;
            WarBreakdown {
                batting: Some(bat),
                bowling: Some(bowl),
                total: all_rounder_war(bat, bowl, c),
            }
        }
    };

    Ok(breakdown)
}

fn missing(record: &PlayerStatRecord, discipline: Discipline) -> InvalidStatsError {
    InvalidStatsError::MissingCareer {
        player_id: record.id.clone(),
        role: record.role,
        discipline,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
