// Player stat records: identity, career blocks, and precondition checks.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Identity enums
// ---------------------------------------------------------------------------

/// Playing role. Determines which career blocks a record must carry and which
/// WAR formula prices it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Batsman,
    Bowler,
    #[serde(rename = "All-Rounder", alias = "AllRounder")]
    AllRounder,
}

impl Role {
    /// Parse a role label. Accepts "All-Rounder", "AllRounder" and "AR".
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batsman" | "bat" => Some(Role::Batsman),
            "bowler" | "bowl" => Some(Role::Bowler),
            "all-rounder" | "allrounder" | "ar" => Some(Role::AllRounder),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Batsman => "Batsman",
            Role::Bowler => "Bowler",
            Role::AllRounder => "All-Rounder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Nationality class for quota purposes.
///
/// Datasets exported from the auction tool label domestic players "Indian";
/// that label is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nationality {
    #[serde(alias = "Indian")]
    Domestic,
    Overseas,
}

impl Nationality {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "domestic" | "indian" => Some(Nationality::Domestic),
            "overseas" => Some(Nationality::Overseas),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Nationality::Domestic => "Domestic",
            Nationality::Overseas => "Overseas",
        }
    }
}

impl fmt::Display for Nationality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which career block a check or figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Batting,
    Bowling,
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discipline::Batting => f.write_str("batting"),
            Discipline::Bowling => f.write_str("bowling"),
        }
    }
}

// ---------------------------------------------------------------------------
// Career blocks
// ---------------------------------------------------------------------------

/// Cumulative batting figures across a player's career.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingCareer {
    pub matches: u32,
    pub runs: u32,
    #[serde(default)]
    pub fours: u32,
    #[serde(default)]
    pub sixes: u32,
    pub strike_rate: f64,
    /// Runs scored in matches the player's side went on to win.
    #[serde(default)]
    pub runs_in_wins: u32,
    /// Runs scored in chases or collapses flagged as high-pressure.
    #[serde(default)]
    pub high_pressure_runs: u32,
}

/// Cumulative bowling figures across a player's career.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingCareer {
    pub matches: u32,
    pub overs: f64,
    pub economy: f64,
    pub wickets: u32,
    #[serde(default)]
    pub death_overs: f64,
    #[serde(default)]
    pub death_economy: f64,
    #[serde(default)]
    pub powerplay_wickets: u32,
}

// ---------------------------------------------------------------------------
// PlayerStatRecord
// ---------------------------------------------------------------------------

/// One player's immutable input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team: String,
    pub role: Role,
    #[serde(rename = "type", alias = "nationality")]
    pub nationality: Nationality,
    pub age: u32,
    #[serde(default, rename = "battingStats", alias = "batting")]
    pub batting: Option<BattingCareer>,
    #[serde(default, rename = "bowlingStats", alias = "bowling")]
    pub bowling: Option<BowlingCareer>,
    /// Explicit keeper capability. `None` means the dataset does not say, and
    /// keeper detection falls back to the name hints.
    #[serde(default, alias = "wicket_keeper")]
    pub wicket_keeper: Option<bool>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s.trim().to_string(),
    })
}

impl PlayerStatRecord {
    pub fn is_overseas(&self) -> bool {
        self.nationality == Nationality::Overseas
    }

    /// Matches used as the sample size for confidence weighting: the batting
    /// block when present, otherwise the bowling block.
    pub fn sample_matches(&self) -> u32 {
        self.batting
            .as_ref()
            .map(|b| b.matches)
            .filter(|&m| m > 0)
            .or_else(|| self.bowling.as_ref().map(|b| b.matches))
            .unwrap_or(0)
    }

    /// Check every precondition the valuation pipeline relies on.
    pub fn validate(&self) -> Result<(), InvalidStatsError> {
        let needs_batting = matches!(self.role, Role::Batsman | Role::AllRounder);
        let needs_bowling = matches!(self.role, Role::Bowler | Role::AllRounder);

        if needs_batting && self.batting.is_none() {
            return Err(InvalidStatsError::MissingCareer {
                player_id: self.id.clone(),
                role: self.role,
                discipline: Discipline::Batting,
            });
        }
        if needs_bowling && self.bowling.is_none() {
            return Err(InvalidStatsError::MissingCareer {
                player_id: self.id.clone(),
                role: self.role,
                discipline: Discipline::Bowling,
            });
        }

        if let Some(bat) = &self.batting {
            if bat.matches == 0 {
                return Err(InvalidStatsError::ZeroMatches {
                    player_id: self.id.clone(),
                    discipline: Discipline::Batting,
                });
            }
            self.check_figure("battingStats.strikeRate", bat.strike_rate)?;
        }

        if let Some(bowl) = &self.bowling {
            if bowl.matches == 0 {
                return Err(InvalidStatsError::ZeroMatches {
                    player_id: self.id.clone(),
                    discipline: Discipline::Bowling,
                });
            }
            self.check_figure("bowlingStats.overs", bowl.overs)?;
            self.check_figure("bowlingStats.economy", bowl.economy)?;
            self.check_figure("bowlingStats.deathOvers", bowl.death_overs)?;
            self.check_figure("bowlingStats.deathEconomy", bowl.death_economy)?;
        }

        Ok(())
    }

    fn check_figure(&self, field: &'static str, value: f64) -> Result<(), InvalidStatsError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(InvalidStatsError::InvalidFigure {
                player_id: self.id.clone(),
                field,
                value,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Malformed input: a data-quality problem upstream, never coerced to zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidStatsError {
    #[error("player {player_id}: role {role} requires a {discipline} career record")]
    MissingCareer {
        player_id: String,
        role: Role,
        discipline: Discipline,
    },

    #[error("player {player_id}: {discipline} career record has zero matches")]
    ZeroMatches {
        player_id: String,
        discipline: Discipline,
    },

    #[error("player {player_id}: {field} must be finite and non-negative, got {value}")]
    InvalidFigure {
        player_id: String,
        field: &'static str,
        value: f64,
    },
}

impl InvalidStatsError {
    /// Identity of the offending player.
    pub fn player_id(&self) -> &str {
        match self {
            InvalidStatsError::MissingCareer { player_id, .. }
            | InvalidStatsError::ZeroMatches { player_id, .. }
            | InvalidStatsError::InvalidFigure { player_id, .. } => player_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn batting(matches: u32) -> BattingCareer {
        BattingCareer {
            matches,
            runs: 1200,
            fours: 110,
            sixes: 45,
            strike_rate: 138.0,
            runs_in_wins: 700,
            high_pressure_runs: 300,
        }
    }

    fn bowling(matches: u32) -> BowlingCareer {
        BowlingCareer {
            matches,
            overs: 180.0,
            economy: 7.6,
            wickets: 60,
            death_overs: 40.0,
            death_economy: 9.1,
            powerplay_wickets: 14,
        }
    }

    fn record(role: Role) -> PlayerStatRecord {
        PlayerStatRecord {
            id: "p1".into(),
            name: "Test Player".into(),
            team: "TST".into(),
            role,
            nationality: Nationality::Domestic,
            age: 27,
            batting: None,
            bowling: None,
            wicket_keeper: None,
        }
    }

    #[test]
    fn batsman_without_batting_block_is_rejected() {
        let err = record(Role::Batsman).validate().unwrap_err();
        assert_eq!(
            err,
            InvalidStatsError::MissingCareer {
                player_id: "p1".into(),
                role: Role::Batsman,
                discipline: Discipline::Batting,
            }
        );
        assert_eq!(err.player_id(), "p1");
    }

    #[test]
    fn all_rounder_needs_both_blocks() {
        let mut r = record(Role::AllRounder);
        r.batting = Some(batting(40));
        let err = r.validate().unwrap_err();
        assert!(matches!(
            err,
            InvalidStatsError::MissingCareer {
                discipline: Discipline::Bowling,
                ..
            }
        ));

        r.bowling = Some(bowling(40));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn zero_matches_is_a_precondition_violation() {
        let mut r = record(Role::Bowler);
        r.bowling = Some(bowling(0));
        let err = r.validate().unwrap_err();
        assert!(matches!(
            err,
            InvalidStatsError::ZeroMatches {
                discipline: Discipline::Bowling,
                ..
            }
        ));
    }

    #[test]
    fn extra_block_with_zero_matches_is_also_rejected() {
        let mut r = record(Role::Batsman);
        r.batting = Some(batting(30));
        r.bowling = Some(bowling(0));
        assert!(r.validate().is_err());
    }

    #[test]
    fn non_finite_economy_is_rejected() {
        let mut r = record(Role::Bowler);
        let mut b = bowling(20);
        b.economy = f64::NAN;
        r.bowling = Some(b);
        let err = r.validate().unwrap_err();
        assert!(err.to_string().contains("bowlingStats.economy"));
    }

    #[test]
    fn sample_matches_prefers_batting() {
        let mut r = record(Role::AllRounder);
        r.batting = Some(batting(33));
        r.bowling = Some(bowling(51));
        assert_eq!(r.sample_matches(), 33);

        r.batting = None;
        assert_eq!(r.sample_matches(), 51);
    }

    #[test]
    fn deserializes_auction_tool_json_shape() {
        let json = r#"{
            "id": 17,
            "name": "K. Arora",
            "team": "DEL",
            "role": "All-Rounder",
            "type": "Indian",
            "age": 24,
            "battingStats": { "matches": 20, "runs": 410, "strikeRate": 151.2 },
            "bowlingStats": { "matches": 20, "overs": 52.0, "economy": 8.1, "wickets": 19 }
        }"#;
        let r: PlayerStatRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, "17");
        assert_eq!(r.role, Role::AllRounder);
        assert_eq!(r.nationality, Nationality::Domestic);
        assert_eq!(r.batting.as_ref().unwrap().fours, 0);
        assert_eq!(r.bowling.as_ref().unwrap().death_overs, 0.0);
        assert!(r.wicket_keeper.is_none());
    }

    #[test]
    fn role_and_nationality_labels_parse() {
        assert_eq!(Role::from_label("all-rounder"), Some(Role::AllRounder));
        assert_eq!(Role::from_label(" Bowler "), Some(Role::Bowler));
        assert_eq!(Role::from_label("keeper"), None);
        assert_eq!(Nationality::from_label("Indian"), Some(Nationality::Domestic));
        assert_eq!(Nationality::from_label("OVERSEAS"), Some(Nationality::Overseas));
    }
}
