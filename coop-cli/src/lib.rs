//! Coop Score CLI
//!
//! Fetches contracts and coop status snapshots, scores every coop in the
//! grade registry with `coop-core` and stores the reports.
//!
//! # Usage
//!
//! ```text
//! coopscore [OPTIONS] <COMMAND>
//!
//! Commands:
//!   score   Score every registered coop and store the reports
//!   coop    Score a single coop and print its report
//!   show    Print stored reports
//!   config  Print the resolved configuration
//!
//! Options:
//!       --contracts-url <URL>     Contract source base URL [env: COOP_CONTRACTS_URL]
//!       --status-url <URL>        Coop status source base URL [env: COOP_STATUS_URL]
//!   -g, --grades <PATH|URL>       Grade registry [env: COOP_GRADES_PATH] [default: grades.json]
//!   -o, --output-dir <DIR>        Report directory [env: COOP_OUTPUT_DIR] [default: reports]
//!       --batch-size <N>          Coops per batch [env: COOP_BATCH_SIZE] [default: 10]
//!       --batch-pause-ms <MS>     Pause between batches [env: COOP_BATCH_PAUSE_MS] [default: 1000]
//!       --timeout-secs <S>        Request timeout [env: COOP_TIMEOUT_SECS] [default: 30]
//!       --no-buffs                Skip buff history lookups
//!       --season-start <DATE>     Only contracts starting at or after DATE
//!       --season-end <DATE>       Only contracts starting before DATE
//!   -f, --format <FORMAT>         Output format (json, table) [default: table]
//!   -v, --verbose                 Enable verbose output
//! ```
//!
//! # Examples
//!
//! ## Score a season
//! ```text
//! coopscore --season-start 2025-01-06 --season-end 2025-04-07 score
//! ```
//!
//! ## Score one coop with an explicit grade
//! ```text
//! coopscore coop --contract hatchery-rush --coop sunny-side --grade aaa
//! ```
//!
//! ## Show stored reports
//! ```text
//! coopscore --format json show --contract hatchery-rush
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod output;
pub mod registry;
pub mod runner;
pub mod season;
pub mod store;

pub use client::{ContractSource, CoopStatusSource, SnapshotSource};
pub use commands::{Cli, Commands, OutputFormat};
pub use config::RunConfig;
pub use error::{CliError, CliResult};
pub use registry::GradeRegistry;
pub use season::SeasonWindow;
pub use store::{ContractReports, JsonFileStore, MemoryStore, ResultStore};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
