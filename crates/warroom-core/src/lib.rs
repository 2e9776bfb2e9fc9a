// Cricket player valuation and squad construction.

pub mod config;
pub mod dataset;
pub mod db;
pub mod engine;
pub mod player;
pub mod squad;
pub mod valuation;

pub use engine::{format_crores, ActionResult, WarRoom};
