//! The `check` command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::debug;

use super::CliConfig;
use crate::component::BucketRole;
use crate::config::DeclarationsFile;

/// Validate and declare every entry of the declarations file.
///
/// Deferred declarations are registered but not resolved, so this only
/// reports problems visible at declaration time.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let path = &config.declarations_path;
        let file = DeclarationsFile::load(path).await?;
        let deps = file.component()?;

        let declared: usize = BucketRole::ALL.into_iter().map(|role| deps.bucket(role).len()).sum();
        let pending: usize =
            BucketRole::ALL.into_iter().map(|role| deps.bucket(role).pending_count()).sum();
        debug!("{} declared, {} deferred", declared, pending);

        println!(
            "{} {} is valid: {} entr{}, {} dependenc{} declared, {} deferred",
            "✓".green(),
            path.display(),
            file.declarations.len(),
            if file.declarations.len() == 1 { "y" } else { "ies" },
            declared,
            if declared == 1 { "y" } else { "ies" },
            pending
        );
        Ok(())
    }
}
