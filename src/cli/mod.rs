//! Command-line interface for `cdeps`.
//!
//! `cdeps` reads a declarations file (see [`crate::config`]), declares every
//! entry into the buckets of a component and reports the result.
//!
//! # Commands
//!
//! - `resolve` - declare everything, run deferred resolution and print each bucket
//! - `check` - load, validate and declare without printing buckets
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - no logging
//! - `--file` / `-f` - declarations file (default `deps.toml`)
//!
//! `RUST_LOG` takes precedence over `--verbose` and `--quiet`. Logs go to
//! stderr so that command output on stdout stays machine readable.
//!
//! # Examples
//!
//! ```bash
//! cdeps resolve
//! cdeps --file build/deps.toml resolve --format json
//! cdeps resolve --no-deferred
//! cdeps -v check
//! ```

mod check;
mod resolve;

pub use check::CheckCommand;
pub use resolve::{OutputFormat, ResolveCommand};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_DECLARATIONS_FILE;

/// Settings derived from the global flags, passed to every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Filter used when `RUST_LOG` is not set. `None` disables logging.
    pub log_level: Option<String>,

    /// Declarations file to read.
    pub declarations_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            declarations_path: PathBuf::from(DEFAULT_DECLARATIONS_FILE),
        }
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn with_declarations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.declarations_path = path.into();
        self
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match &self.log_level {
                Some(level) => EnvFilter::new(level),
                None => return,
            },
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[derive(Parser)]
#[command(
    name = "cdeps",
    about = "Declare component dependencies from a TOML file",
    version,
    long_about = "cdeps reads dependency declarations, routes each one as an eager, bundle or deferred declaration into the buckets of a component, and reports the result."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the declarations file
    #[arg(short, long, global = true, value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Declare every entry and print the resulting buckets
    Resolve(ResolveCommand),

    /// Validate and declare every entry without printing buckets
    Check(CheckCommand),
}

impl Cli {
    /// Run the selected command with configuration built from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            declarations_path: self
                .file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DECLARATIONS_FILE)),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&config).await,
            Commands::Check(cmd) => cmd.execute(&config).await,
        }
    }
}
