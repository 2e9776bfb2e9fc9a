// Configuration loading and parsing (squad.toml, valuation.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::player::Role;
use crate::valuation::scarcity::ScarcityRule;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub squad: SquadRules,
    pub valuation: ValuationConfig,
    pub database: DatabaseConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// squad.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire squad.toml file.
#[derive(Debug, Clone, Deserialize)]
struct SquadFile {
    squad: SquadRules,
    database: DatabaseConfig,
    data_paths: DataPaths,
}

/// Purse and composition rules enforced on every roster mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct SquadRules {
    /// Total purse in crores.
    pub total_purse: f64,
    pub max_squad_size: usize,
    pub max_overseas: usize,
    /// Minimum price held back for every roster slot still to be filled.
    pub min_reserve_per_slot: f64,
    /// Overseas cap for the starting XI.
    pub max_lineup_overseas: usize,
    /// Lower-cased name fragments treated as keeper-eligible when a record
    /// carries no explicit keeper flag.
    pub keeper_name_hints: Vec<String>,
}

impl Default for SquadRules {
    fn default() -> Self {
        SquadRules {
            total_purse: 120.0,
            max_squad_size: 25,
            max_overseas: 8,
            min_reserve_per_slot: 0.2,
            max_lineup_overseas: 4,
            keeper_name_hints: ["pant", "samson", "kishan", "dhoni"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    /// Key the roster is saved under in the key-value store.
    pub squad_key: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: "warroom.db".into(),
            squad_key: "iplSquad".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            players: "data/players.json".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// valuation.toml structs
// ---------------------------------------------------------------------------

/// Every tuning constant of the valuation pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuationConfig {
    pub war: WarConstants,
    pub confidence: ConfidenceConfig,
    pub age: AgeCurveConfig,
    pub form: FormConfig,
    /// Ordered scarcity table; the first matching rule wins.
    pub scarcity: Vec<ScarcityRule>,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            war: WarConstants::default(),
            confidence: ConfidenceConfig::default(),
            age: AgeCurveConfig::default(),
            form: FormConfig::default(),
            scarcity: crate::valuation::scarcity::default_rules(),
        }
    }
}

/// Calibration against the league's scoring environment.
#[derive(Debug, Clone, Deserialize)]
pub struct WarConstants {
    pub matches_per_season: u32,
    pub runs_per_win: f64,
    /// Crores per win above replacement.
    pub market_rate_per_war: f64,
    pub replacement_level_batting: f64,
    pub replacement_level_bowling: f64,

    // Batting bonuses
    pub boundary_run_value: f64,
    pub strike_rate_threshold: f64,
    pub strike_rate_divisor: f64,
    pub strike_rate_bonus_cap: f64,
    pub runs_in_wins_weight: f64,
    pub high_pressure_weight: f64,

    // Bowling
    pub league_average_economy: f64,
    pub wicket_run_value: f64,
    pub league_average_death_economy: f64,
    pub death_overs_weight: f64,
    pub powerplay_wicket_value: f64,

    pub flexibility_premium: f64,
}

impl Default for WarConstants {
    fn default() -> Self {
        WarConstants {
            matches_per_season: 14,
            runs_per_win: 22.0,
            market_rate_per_war: 2.5,
            replacement_level_batting: 280.0,
            replacement_level_bowling: 150.0,
            boundary_run_value: 0.5,
            strike_rate_threshold: 150.0,
            strike_rate_divisor: 1000.0,
            strike_rate_bonus_cap: 0.10,
            runs_in_wins_weight: 0.10,
            high_pressure_weight: 0.15,
            league_average_economy: 9.0,
            wicket_run_value: 6.0,
            league_average_death_economy: 10.5,
            death_overs_weight: 1.0,
            powerplay_wicket_value: 3.0,
            flexibility_premium: 1.17,
        }
    }
}

/// One step of the sample-size confidence function.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConfidenceTier {
    pub min_matches: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfidenceConfig {
    /// Price small samples are shrunk toward, in crores.
    pub league_average_value: f64,
    /// Weight used when no tier applies.
    pub floor: f64,
    pub tiers: Vec<ConfidenceTier>,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        ConfidenceConfig {
            league_average_value: 5.0,
            floor: 0.50,
            tiers: vec![
                ConfidenceTier { min_matches: 50, weight: 0.95 },
                ConfidenceTier { min_matches: 30, weight: 0.80 },
                ConfidenceTier { min_matches: 14, weight: 0.60 },
            ],
        }
    }
}

/// Inclusive peak-age window.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PeakWindow {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgeCurveConfig {
    pub peak_multiplier: f64,
    pub youth_bonus_per_year: f64,
    pub decline_per_year: f64,
    pub floor: f64,
    pub batsman: PeakWindow,
    pub bowler: PeakWindow,
    pub all_rounder: PeakWindow,
}

impl AgeCurveConfig {
    pub fn window(&self, role: Role) -> PeakWindow {
        match role {
            Role::Batsman => self.batsman,
            Role::Bowler => self.bowler,
            Role::AllRounder => self.all_rounder,
        }
    }
}

impl Default for AgeCurveConfig {
    fn default() -> Self {
        AgeCurveConfig {
            peak_multiplier: 1.05,
            youth_bonus_per_year: 0.02,
            decline_per_year: 0.03,
            floor: 0.85,
            batsman: PeakWindow { start: 27, end: 32 },
            bowler: PeakWindow { start: 26, end: 32 },
            all_rounder: PeakWindow { start: 27, end: 31 },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormConfig {
    pub strike_rate_threshold: f64,
    pub batting_multiplier: f64,
    pub economy_threshold: f64,
    pub bowling_multiplier: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            strike_rate_threshold: 150.0,
            batting_multiplier: 1.1,
            economy_threshold: 7.5,
            bowling_multiplier: 1.1,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/squad.toml` and
/// `config/valuation.toml`, relative to the given `base_dir`.
///
/// This does not auto-copy defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let squad_path = config_dir.join("squad.toml");
    let squad_text = read_file(&squad_path)?;
    let squad_file: SquadFile =
        toml::from_str(&squad_text).map_err(|e| ConfigError::ParseError {
            path: squad_path.clone(),
            source: e,
        })?;

    let valuation_path = config_dir.join("valuation.toml");
    let valuation_text = read_file(&valuation_path)?;
    let valuation: ValuationConfig =
        toml::from_str(&valuation_text).map_err(|e| ConfigError::ParseError {
            path: valuation_path.clone(),
            source: e,
        })?;

    let config = Config {
        squad: squad_file.squad,
        valuation,
        database: squad_file.database,
        data_paths: squad_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Files read from `config/`, each seeded from `defaults/` when absent.
const CONFIG_FILES: [&str; 2] = ["squad.toml", "valuation.toml"];

/// Copy any missing config file from `defaults/` into `config/`. Files already
/// in `config/` are never touched. Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let target = config_dir.join(name);
        if target.is_file() {
            continue;
        }

        let source = defaults_dir.join(name);
        if !source.is_file() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{} is missing and there is no {} to seed it from",
                    target.display(),
                    source.display()
                ),
            });
        }

        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
        std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {}: {e}", source.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Seed and load config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let base_dir = std::env::current_dir().map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("cannot resolve the working directory: {e}"),
    })?;
    for path in ensure_config_files(&base_dir)? {
        info!("Seeded {} from defaults", path.display());
    }
    load_config_from(&base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let squad = &config.squad;

    if !(squad.total_purse.is_finite() && squad.total_purse > 0.0) {
        return Err(invalid(
            "squad.total_purse",
            format!("must be > 0, got {}", squad.total_purse),
        ));
    }
    if squad.max_squad_size == 0 {
        return Err(invalid("squad.max_squad_size", "must be greater than 0"));
    }
    if squad.max_overseas > squad.max_squad_size {
        return Err(invalid(
            "squad.max_overseas",
            format!(
                "must not exceed max_squad_size ({}), got {}",
                squad.max_squad_size, squad.max_overseas
            ),
        ));
    }
    if !(squad.min_reserve_per_slot.is_finite() && squad.min_reserve_per_slot >= 0.0) {
        return Err(invalid(
            "squad.min_reserve_per_slot",
            format!("must be >= 0, got {}", squad.min_reserve_per_slot),
        ));
    }
    let full_reserve = squad.min_reserve_per_slot * squad.max_squad_size as f64;
    if full_reserve > squad.total_purse {
        return Err(invalid(
            "squad.min_reserve_per_slot",
            format!(
                "reserving {} for {} slots exceeds the purse of {}",
                squad.min_reserve_per_slot, squad.max_squad_size, squad.total_purse
            ),
        ));
    }
    if squad.max_lineup_overseas > 11 {
        return Err(invalid(
            "squad.max_lineup_overseas",
            format!("must be <= 11, got {}", squad.max_lineup_overseas),
        ));
    }

    validate_valuation(&config.valuation)
}

fn validate_valuation(v: &ValuationConfig) -> Result<(), ConfigError> {
    let war = &v.war;
    if war.matches_per_season == 0 {
        return Err(invalid("war.matches_per_season", "must be greater than 0"));
    }

    let positive: &[(&str, f64)] = &[
        ("war.runs_per_win", war.runs_per_win),
        ("war.strike_rate_divisor", war.strike_rate_divisor),
        ("war.league_average_economy", war.league_average_economy),
    ];
    for (name, val) in positive {
        if !(val.is_finite() && *val > 0.0) {
            return Err(invalid(*name, format!("must be > 0, got {val}")));
        }
    }

    let non_negative: &[(&str, f64)] = &[
        ("war.market_rate_per_war", war.market_rate_per_war),
        ("war.replacement_level_batting", war.replacement_level_batting),
        ("war.replacement_level_bowling", war.replacement_level_bowling),
        ("war.boundary_run_value", war.boundary_run_value),
        ("war.strike_rate_threshold", war.strike_rate_threshold),
        ("war.strike_rate_bonus_cap", war.strike_rate_bonus_cap),
        ("war.runs_in_wins_weight", war.runs_in_wins_weight),
        ("war.high_pressure_weight", war.high_pressure_weight),
        ("war.wicket_run_value", war.wicket_run_value),
        ("war.league_average_death_economy", war.league_average_death_economy),
        ("war.death_overs_weight", war.death_overs_weight),
        ("war.powerplay_wicket_value", war.powerplay_wicket_value),
        ("confidence.league_average_value", v.confidence.league_average_value),
        ("age.youth_bonus_per_year", v.age.youth_bonus_per_year),
        ("age.decline_per_year", v.age.decline_per_year),
    ];
    for (name, val) in non_negative {
        if !(val.is_finite() && *val >= 0.0) {
            return Err(invalid(*name, format!("must be >= 0, got {val}")));
        }
    }

    if !(war.flexibility_premium.is_finite() && war.flexibility_premium > 1.0) {
        return Err(invalid(
            "war.flexibility_premium",
            format!("must be > 1, got {}", war.flexibility_premium),
        ));
    }

    // Confidence weights live in [0, 1] and never drop as the sample grows.
    let conf = &v.confidence;
    if !(0.0..=1.0).contains(&conf.floor) {
        return Err(invalid(
            "confidence.floor",
            format!("must be between 0.0 and 1.0 inclusive, got {}", conf.floor),
        ));
    }
    let mut tiers = conf.tiers.clone();
    tiers.sort_by_key(|t| t.min_matches);
    let mut previous = conf.floor;
    for tier in &tiers {
        if !(0.0..=1.0).contains(&tier.weight) {
            return Err(invalid(
                "confidence.tiers",
                format!(
                    "weight for {} matches must be between 0.0 and 1.0, got {}",
                    tier.min_matches, tier.weight
                ),
            ));
        }
        if tier.weight < previous {
            return Err(invalid(
                "confidence.tiers",
                format!(
                    "weight for {} matches ({}) is lower than a smaller sample's ({})",
                    tier.min_matches, tier.weight, previous
                ),
            ));
        }
        previous = tier.weight;
    }

    let age = &v.age;
    if !(age.floor > 0.0 && age.floor <= 1.0) {
        return Err(invalid(
            "age.floor",
            format!("must be in (0, 1], got {}", age.floor),
        ));
    }
    if !(age.peak_multiplier.is_finite() && age.peak_multiplier > 0.0) {
        return Err(invalid(
            "age.peak_multiplier",
            format!("must be > 0, got {}", age.peak_multiplier),
        ));
    }
    for (name, w) in [
        ("age.batsman", age.batsman),
        ("age.bowler", age.bowler),
        ("age.all_rounder", age.all_rounder),
    ] {
        if w.start > w.end {
            return Err(invalid(
                name,
                format!("window start {} is after end {}", w.start, w.end),
            ));
        }
    }

    for (name, val) in [
        ("form.batting_multiplier", v.form.batting_multiplier),
        ("form.bowling_multiplier", v.form.bowling_multiplier),
    ] {
        if !(val.is_finite() && val > 0.0) {
            return Err(invalid(name, format!("must be > 0, got {val}")));
        }
    }

    for (i, rule) in v.scarcity.iter().enumerate() {
        if !(rule.multiplier.is_finite() && rule.multiplier > 0.0) {
            return Err(invalid(
                format!("scarcity[{i}].multiplier"),
                format!("must be > 0, got {}", rule.multiplier),
            ));
        }
        if rule.label.trim().is_empty() {
            return Err(invalid(format!("scarcity[{i}].label"), "must not be empty"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
