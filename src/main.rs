//! `cdeps` entry point
//!
//! Parses the command line, runs the selected command and prints failures
//! with a suggestion before exiting with status 1.
//!
//! Commands:
//! - `resolve` - Declare every entry of deps.toml and print the buckets
//! - `check` - Validate and declare without printing buckets

use anyhow::Result;
use clap::Parser;
use component_deps::cli;
use component_deps::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
