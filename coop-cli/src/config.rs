//! Run Configuration
//!
//! Resolved settings for one invocation. Command-line flags win over
//! environment variables (a `.env` file is loaded first), which win over
//! the defaults below.

use crate::commands::Cli;
use crate::error::{CliError, CliResult};
use crate::season::SeasonWindow;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names
pub mod keys {
    /// Contract source base URL
    pub const CONTRACTS_URL: &str = "COOP_CONTRACTS_URL";
    /// Coop status source base URL
    pub const STATUS_URL: &str = "COOP_STATUS_URL";
    /// Grade registry path or URL
    pub const GRADES_PATH: &str = "COOP_GRADES_PATH";
    /// Report output directory
    pub const OUTPUT_DIR: &str = "COOP_OUTPUT_DIR";
    /// Coops fetched per batch
    pub const BATCH_SIZE: &str = "COOP_BATCH_SIZE";
    /// Pause between batches (milliseconds)
    pub const BATCH_PAUSE_MS: &str = "COOP_BATCH_PAUSE_MS";
    /// Request timeout (seconds)
    pub const TIMEOUT_SECS: &str = "COOP_TIMEOUT_SECS";
}

/// Default configuration values
pub mod defaults {
    /// Default grade registry
    pub const GRADES_PATH: &str = "grades.json";
    /// Default report directory
    pub const OUTPUT_DIR: &str = "reports";
    /// Default batch size
    pub const BATCH_SIZE: usize = 10;
    /// Default pause between batches (milliseconds)
    pub const BATCH_PAUSE_MS: u64 = 1000;
    /// Default timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Resolved settings
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub contracts_url: Option<String>,
    pub coop_status_url: Option<String>,
    pub grades_source: String,
    pub output_dir: PathBuf,
    pub batch_size: usize,
    pub batch_pause_ms: u64,
    pub timeout_secs: u64,
    pub fetch_buffs: bool,
    pub season: SeasonWindow,
}

impl RunConfig {
    /// Resolve settings from parsed arguments
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let config = Self {
            contracts_url: non_empty(cli.contracts_url.as_deref()),
            coop_status_url: non_empty(cli.status_url.as_deref()),
            grades_source: cli.grades.clone(),
            output_dir: cli.output_dir.clone(),
            batch_size: cli.batch_size,
            batch_pause_ms: cli.batch_pause_ms,
            timeout_secs: cli.timeout_secs,
            fetch_buffs: !cli.no_buffs,
            season: SeasonWindow::from_args(cli.season_start.as_deref(), cli.season_end.as_deref())?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> CliResult<()> {
        if self.batch_size == 0 {
            return Err(CliError::config(format!("{} must be at least 1", keys::BATCH_SIZE)));
        }
        if self.timeout_secs == 0 {
            return Err(CliError::config(format!("{} must be at least 1", keys::TIMEOUT_SECS)));
        }
        Ok(())
    }

    /// Contract source URL, required by commands that fetch
    pub fn require_contracts_url(&self) -> CliResult<&str> {
        self.contracts_url
            .as_deref()
            .ok_or_else(|| CliError::config(format!("{} is not set", keys::CONTRACTS_URL)))
    }

    /// Coop status URL, required by commands that fetch
    pub fn require_status_url(&self) -> CliResult<&str> {
        self.coop_status_url
            .as_deref()
            .ok_or_else(|| CliError::config(format!("{} is not set", keys::STATUS_URL)))
    }

    /// Pause between batches
    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["coopscore"];
        argv.extend_from_slice(args);
        argv.push("config");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_arguments() {
        let cli = parse(&[
            "--contracts-url", "https://contracts.example.com",
            "--status-url", "https://status.example.com",
            "--batch-size", "4",
            "--batch-pause-ms", "250",
            "--season-start", "2025-01-06",
            "--no-buffs",
        ]);
        let config = RunConfig::from_cli(&cli).unwrap();

        assert_eq!(config.require_contracts_url().unwrap(), "https://contracts.example.com");
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.batch_pause(), Duration::from_millis(250));
        assert!(!config.fetch_buffs);
        assert!(config.season.start.is_some());
        assert!(config.season.end.is_none());
    }

    #[test]
    fn test_blank_url_is_unset() {
        let cli = parse(&["--contracts-url", "  "]);
        let config = RunConfig::from_cli(&cli).unwrap();
        assert!(matches!(
            config.require_contracts_url(),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let cli = parse(&["--batch-size", "0"]);
        assert!(matches!(RunConfig::from_cli(&cli), Err(CliError::ConfigError { .. })));
    }

    #[test]
    fn test_bad_season_date_rejected() {
        let cli = parse(&["--season-end", "soon"]);
        assert!(matches!(RunConfig::from_cli(&cli), Err(CliError::InvalidArgument { .. })));
    }
}
