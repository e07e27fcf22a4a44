//! CLI Commands Module
//!
//! Command-line definitions for the coop score CLI.

use crate::config::{defaults, keys};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Coop score CLI
#[derive(Parser, Debug)]
#[command(name = "coopscore")]
#[command(version)]
#[command(about = "Scores cooperative contract play from coop status snapshots")]
#[command(long_about = "Fetches contracts and coop status snapshots, reconstructs per-player \
    contribution scores for every coop in the grade registry and stores one JSON report \
    per contract.")]
pub struct Cli {
    /// Contract source base URL (env: COOP_CONTRACTS_URL)
    #[arg(long, env = keys::CONTRACTS_URL)]
    pub contracts_url: Option<String>,

    /// Coop status source base URL (env: COOP_STATUS_URL)
    #[arg(long, env = keys::STATUS_URL)]
    pub status_url: Option<String>,

    /// Grade registry file or URL (env: COOP_GRADES_PATH)
    #[arg(short, long, env = keys::GRADES_PATH, default_value = defaults::GRADES_PATH)]
    pub grades: String,

    /// Report output directory (env: COOP_OUTPUT_DIR)
    #[arg(short, long, env = keys::OUTPUT_DIR, default_value = defaults::OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Coops fetched concurrently per batch (env: COOP_BATCH_SIZE)
    #[arg(long, env = keys::BATCH_SIZE, default_value_t = defaults::BATCH_SIZE)]
    pub batch_size: usize,

    /// Pause between batches in milliseconds (env: COOP_BATCH_PAUSE_MS)
    #[arg(long, env = keys::BATCH_PAUSE_MS, default_value_t = defaults::BATCH_PAUSE_MS)]
    pub batch_pause_ms: u64,

    /// Request timeout in seconds (env: COOP_TIMEOUT_SECS)
    #[arg(long, env = keys::TIMEOUT_SECS, default_value_t = defaults::TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Skip buff history lookups for contributors that arrive without one
    #[arg(long)]
    pub no_buffs: bool,

    /// Only contracts starting at or after this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub season_start: Option<String>,

    /// Only contracts starting before this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long)]
    pub season_end: Option<String>,

    /// Output format (json, table)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table format (human-readable)
    #[default]
    Table,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every registered coop and store the reports
    Score {
        /// Score without writing reports
        #[arg(long)]
        dry_run: bool,
    },

    /// Score a single coop and print its report
    Coop {
        /// Contract identifier
        #[arg(short, long)]
        contract: String,

        /// Coop code
        #[arg(long)]
        coop: String,

        /// Grade to use instead of the registry entry
        #[arg(long)]
        grade: Option<String>,
    },

    /// Print stored reports
    Show {
        /// Contract identifier; lists stored contracts when omitted
        #[arg(short, long)]
        contract: Option<String>,
    },

    /// Print the resolved configuration
    Config,
}
