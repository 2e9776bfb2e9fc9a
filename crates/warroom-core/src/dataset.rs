// Player dataset loading.
//
// Two layouts are accepted: a JSON array of nested records (camelCase keys,
// `battingStats` / `bowlingStats` blocks) and a flat CSV with `bat_*` and
// `bowl_*` columns, where an empty `bat_matches` / `bowl_matches` cell means
// the player has no record in that discipline.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::player::{BattingCareer, BowlingCareer, Nationality, PlayerStatRecord, Role};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawCsvPlayer {
    id: String,
    name: String,
    #[serde(default)]
    team: String,
    role: String,
    #[serde(alias = "nationality")]
    r#type: String,
    age: u32,
    #[serde(default)]
    wicket_keeper: Option<bool>,

    bat_matches: Option<u32>,
    bat_runs: Option<u32>,
    bat_fours: Option<u32>,
    bat_sixes: Option<u32>,
    bat_strike_rate: Option<f64>,
    bat_runs_in_wins: Option<u32>,
    bat_high_pressure_runs: Option<u32>,

    bowl_matches: Option<u32>,
    bowl_overs: Option<f64>,
    bowl_economy: Option<f64>,
    bowl_wickets: Option<u32>,
    bowl_death_overs: Option<f64>,
    bowl_death_economy: Option<f64>,
    bowl_powerplay_wickets: Option<u32>,
}

/// A figure the career block cannot do without. Blank means the row is
/// malformed, not zero.
fn required<T>(value: Option<T>, column: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing {column}"))
}

impl RawCsvPlayer {
    fn into_record(self) -> Result<PlayerStatRecord, String> {
        let role = Role::from_label(&self.role).ok_or_else(|| format!("unknown role '{}'", self.role))?;
        let nationality = Nationality::from_label(&self.r#type)
            .ok_or_else(|| format!("unknown player type '{}'", self.r#type))?;

        // An empty matches cell means no block; a set one makes the core
        // figures mandatory.
        let batting = match self.bat_matches {
            Some(matches) => Some(BattingCareer {
                matches,
                runs: required(self.bat_runs, "bat_runs")?,
                fours: self.bat_fours.unwrap_or(0),
                sixes: self.bat_sixes.unwrap_or(0),
                strike_rate: required(self.bat_strike_rate, "bat_strike_rate")?,
                runs_in_wins: self.bat_runs_in_wins.unwrap_or(0),
                high_pressure_runs: self.bat_high_pressure_runs.unwrap_or(0),
            }),
            None => None,
        };
        let bowling = match self.bowl_matches {
            Some(matches) => Some(BowlingCareer {
                matches,
                overs: required(self.bowl_overs, "bowl_overs")?,
                economy: required(self.bowl_economy, "bowl_economy")?,
                wickets: required(self.bowl_wickets, "bowl_wickets")?,
                death_overs: self.bowl_death_overs.unwrap_or(0.0),
                death_economy: self.bowl_death_economy.unwrap_or(0.0),
                powerplay_wickets: self.bowl_powerplay_wickets.unwrap_or(0),
            }),
            None => None,
        };

        Ok(PlayerStatRecord {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            team: self.team.trim().to_string(),
            role,
            nationality,
            age: self.age,
            batting,
            bowling,
            wicket_keeper: self.wicket_keeper,
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_json_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerStatRecord>, serde_json::Error> {
    serde_json::from_reader(rdr)
}

fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerStatRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawCsvPlayer>() {
        match result {
            Ok(raw) => {
                let id = raw.id.clone();
                match raw.into_record() {
                    Ok(record) => players.push(record),
                    Err(reason) => warn!("skipping player '{}': {}", id.trim(), reason),
                }
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Reject empty datasets and duplicate ids.
fn check_dataset(players: &[PlayerStatRecord]) -> Result<(), DatasetError> {
    if players.is_empty() {
        return Err(DatasetError::Validation("dataset contains no players".into()));
    }
    let mut seen = HashSet::new();
    for p in players {
        if !seen.insert(p.id.as_str()) {
            return Err(DatasetError::Validation(format!("duplicate player id '{}'", p.id)));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, DatasetError> {
    std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a JSON array of player records.
pub fn load_players_json(path: &Path) -> Result<Vec<PlayerStatRecord>, DatasetError> {
    let file = open(path)?;
    load_json_from_reader(std::io::BufReader::new(file)).map_err(|e| DatasetError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load a flat CSV of player records. Malformed rows are skipped with a
/// warning.
pub fn load_players_csv(path: &Path) -> Result<Vec<PlayerStatRecord>, DatasetError> {
    let file = open(path)?;
    load_csv_from_reader(file).map_err(|e| DatasetError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the player dataset, choosing the format from the file extension
/// (`.csv` for CSV, anything else as JSON).
pub fn load_players(path: &Path) -> Result<Vec<PlayerStatRecord>, DatasetError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let players = if is_csv {
        load_players_csv(path)?
    } else {
        load_players_json(path)?
    };
    check_dataset(&players)?;

    info!("Loaded {} players from {}", players.len(), path.display());
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
