// Valuation pipeline: WAR -> base value -> confidence -> age -> scarcity -> form.
//
// Stage order is fixed. Everything here is pure: the same record and config
// always produce a bit-identical result, so a whole dataset can be valued in
// parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::ValuationConfig;
use crate::player::{InvalidStatsError, PlayerStatRecord};
use crate::valuation::adjust::{adjusted_value, age_multiplier, confidence, form_multiplier};
use crate::valuation::scarcity::scarcity_multiplier;
use crate::valuation::war::role_war;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every intermediate figure of a player's valuation, at full precision.
/// Monetary fields are in crores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    /// Role-selected WAR.
    pub war: f64,
    pub batting_war: Option<f64>,
    pub bowling_war: Option<f64>,
    pub base_value: f64,
    pub confidence: f64,
    pub adjusted_base: f64,
    pub age_multiplier: f64,
    pub scarcity_multiplier: f64,
    pub form_multiplier: f64,
    pub final_value: f64,
}

impl ValuationResult {
    /// Copy with every figure rounded to two decimals, for display only.
    pub fn rounded(&self) -> ValuationResult {
        ValuationResult {
            war: round2(self.war),
            batting_war: self.batting_war.map(round2),
            bowling_war: self.bowling_war.map(round2),
            base_value: round2(self.base_value),
            confidence: round2(self.confidence),
            adjusted_base: round2(self.adjusted_base),
            age_multiplier: round2(self.age_multiplier),
            scarcity_multiplier: round2(self.scarcity_multiplier),
            form_multiplier: round2(self.form_multiplier),
            final_value: round2(self.final_value),
        }
    }

    pub fn grade(&self) -> ValueGrade {
        ValueGrade::from_war(self.war)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A record paired with its valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedPlayer {
    pub record: PlayerStatRecord,
    pub valuation: ValuationResult,
}

impl ValuedPlayer {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn price(&self) -> f64 {
        self.valuation.final_value
    }

    pub fn is_overseas(&self) -> bool {
        self.record.is_overseas()
    }
}

/// Coarse quality band derived from WAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueGrade {
    BelowAverage,
    Average,
    Good,
    VeryGood,
    Elite,
}

impl ValueGrade {
    pub fn from_war(war: f64) -> Self {
        if war >= 2.0 {
            ValueGrade::Elite
        } else if war >= 1.5 {
            ValueGrade::VeryGood
        } else if war >= 1.0 {
            ValueGrade::Good
        } else if war >= 0.5 {
            ValueGrade::Average
        } else {
            ValueGrade::BelowAverage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueGrade::Elite => "Elite",
            ValueGrade::VeryGood => "Very Good",
            ValueGrade::Good => "Good",
            ValueGrade::Average => "Average",
            ValueGrade::BelowAverage => "Below Average",
        }
    }
}

impl fmt::Display for ValueGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full pipeline for one record.
pub fn value_player(
    record: &PlayerStatRecord,
    cfg: &ValuationConfig,
) -> Result<ValuedPlayer, InvalidStatsError> {
    let war = role_war(record, &cfg.war)?;
    let base_value = war.total * cfg.war.market_rate_per_war;

    let weight = confidence(record.sample_matches(), &cfg.confidence);
    let adjusted_base = adjusted_value(base_value, weight, &cfg.confidence);

    let age = age_multiplier(record.age, record.role, &cfg.age);
    let scarcity = scarcity_multiplier(&cfg.scarcity, record);
    let form = form_multiplier(record, &cfg.form);

    let final_value = adjusted_base * age * scarcity * form;

    debug!(
        "valued {} ({}): war={:.3} base={:.2} final={:.2}",
        record.name, record.id, war.total, base_value, final_value
    );

    Ok(ValuedPlayer {
        record: record.clone(),
        valuation: ValuationResult {
            war: war.total,
            batting_war: war.batting,
            bowling_war: war.bowling,
            base_value,
            confidence: weight,
            adjusted_base,
            age_multiplier: age,
            scarcity_multiplier: scarcity,
            form_multiplier: form,
            final_value,
        },
    })
}

/// Value every record, preserving input order. Fails on the first malformed
/// record.
pub fn value_all(
    records: &[PlayerStatRecord],
    cfg: &ValuationConfig,
) -> Result<Vec<ValuedPlayer>, InvalidStatsError> {
    records
        .par_iter()
        .map(|record| value_player(record, cfg))
        .collect()
}

/// Sum of final values across a valued pool.
pub fn pool_total(players: &[ValuedPlayer]) -> f64 {
    players.iter().map(ValuedPlayer::price).sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
