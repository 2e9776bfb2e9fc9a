// Valuation engine: season normalization, WAR, adjustments, pricing.

pub mod adjust;
pub mod normalize;
pub mod pipeline;
pub mod scarcity;
pub mod war;

pub use pipeline::{pool_total, value_all, value_player, ValuationResult, ValueGrade, ValuedPlayer};
