use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::scoring::StandingsMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "league-standings: scoring for online chess leagues")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

/// Which season a command reads
#[derive(Args, Debug, Clone, PartialEq)]
pub struct SeasonArgs {
    /// League tag
    #[arg(short, long)]
    pub league: String,
    /// Season tag (optional, defaults to the latest season of the league)
    #[arg(short, long)]
    pub season: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Create an empty database, dropping existing tables
    Init,
    /// Load a season document (JSON) into the database
    Import {
        /// Path of the season document
        file: PathBuf,
    },
    /// Print the standings of a season
    Standings {
        #[command(flatten)]
        season: SeasonArgs,
        /// Ordering of the table; completed seasons always use final order
        #[arg(short, long, value_enum, default_value_t = StandingsMode::Pairing)]
        mode: StandingsMode,
        /// Count the published round in progress as well
        #[arg(long = "include-current")]
        include_current: bool,
        /// Rating section such as u1600
        #[arg(long)]
        section: Option<String>,
        /// Compute even when a cached table exists
        #[arg(long = "no-cache")]
        no_cache: bool,
    },
    /// Print the wallchart: seed order with every round of every player
    Wallchart {
        #[command(flatten)]
        season: SeasonArgs,
    },
    /// Print the pairings of a round
    Pairings {
        #[command(flatten)]
        season: SeasonArgs,
        /// Round number (optional, defaults to the latest published round)
        #[arg(short, long)]
        round: Option<i32>,
        /// Show pairing problems meant for league staff
        #[arg(long)]
        privileged: bool,
    },
    /// Print white's results per board
    Stats {
        #[command(flatten)]
        season: SeasonArgs,
    },
    /// Print the team crosstable
    Crosstable {
        #[command(flatten)]
        season: SeasonArgs,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}
