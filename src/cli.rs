//! Command-line interface parsing for iQuiz
//!
//! This module handles parsing of CLI arguments using clap: a one-off source
//! URL, a one-off refresh interval, and a `--list` mode that prints the quiz
//! catalog instead of starting the interface.

use clap::Parser;
use thiserror::Error;

use crate::settings::{Settings, MAX_REFRESH_INTERVAL_SECS, MIN_REFRESH_INTERVAL_SECS};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The refresh interval is outside the supported range
    #[error("Invalid interval: {0}s. The refresh interval must be between 10 and 3600 seconds")]
    InvalidInterval(u64),
}

/// iQuiz - Take multiple-choice quizzes from a remote feed
#[derive(Parser, Debug)]
#[command(name = "iquiz")]
#[command(about = "Multiple-choice quizzes from a remote JSON feed, cached for offline use")]
#[command(version)]
pub struct Cli {
    /// Fetch quizzes from this URL for this session instead of the saved source
    #[arg(long, value_name = "URL")]
    pub source: Option<String>,

    /// Auto-refresh interval in seconds for this session (10-3600)
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Print the quiz list once and exit instead of starting the interface
    #[arg(long)]
    pub list: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupConfig {
    /// Source URL override
    pub source_url: Option<String>,
    /// Refresh interval override in seconds
    pub refresh_interval: Option<u64>,
    /// Print the list and exit
    pub list_only: bool,
}

/// Checks that a refresh interval is within the supported range
pub fn parse_interval_arg(secs: u64) -> Result<u64, CliError> {
    if (MIN_REFRESH_INTERVAL_SECS..=MAX_REFRESH_INTERVAL_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(CliError::InvalidInterval(secs))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with the requested overrides
    /// * `Err(CliError)` if the interval is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let refresh_interval = cli.interval.map(parse_interval_arg).transpose()?;
        Ok(StartupConfig {
            source_url: cli.source.clone(),
            refresh_interval,
            list_only: cli.list,
        })
    }

    /// Applies the overrides on top of loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref url) = self.source_url {
            settings.source_url = url.clone();
        }
        if let Some(secs) = self.refresh_interval {
            settings.set_refresh_interval(secs);
        }
    }
}
