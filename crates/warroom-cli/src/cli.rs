// Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use warroom_core::player::Role;

/// Value cricket players and build an auction squad within the purse.
#[derive(Debug, Parser)]
#[command(name = "warroom", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List valued players, most expensive first.
    Players {
        /// Only show players in this role.
        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Maximum number of rows.
        #[arg(long, default_value_t = 25)]
        limit: usize,

        /// Rank by WAR instead of final value.
        #[arg(long)]
        by_war: bool,
    },

    /// Show the full valuation breakdown for one player.
    Show { id: String },

    /// Add a player to the squad.
    Add { id: String },

    /// Remove a player from the squad.
    Remove { id: String },

    /// Release every player in the squad.
    Clear,

    /// Print the squad, budget, composition, gaps and best XI.
    Squad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Batsman,
    Bowler,
    AllRounder,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Batsman => Role::Batsman,
            RoleArg::Bowler => Role::Bowler,
            RoleArg::AllRounder => Role::AllRounder,
        }
    }
}
