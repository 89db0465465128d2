//! The `resolve` command.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

use super::CliConfig;
use crate::bucket::DependencyBucket;
use crate::component::{BucketRole, ComponentDependencies};
use crate::config::DeclarationsFile;
use crate::dependency::Dependency;

/// Declare every entry, resolve deferred declarations and print the buckets.
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Leave deferred declarations unresolved
    #[arg(long)]
    pub no_deferred: bool,
}

/// How `resolve` prints its report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One heading per bucket followed by its dependencies.
    #[default]
    Text,

    /// A single JSON object.
    Json,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResolveReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'a str>,
    buckets: Vec<BucketReport<'a>>,
}

#[derive(Debug, Serialize)]
struct BucketReport<'a> {
    name: &'a str,
    extends_from: &'a [String],
    dependencies: Vec<&'a Dependency>,
    pending: usize,
}

impl<'a> ResolveReport<'a> {
    pub(crate) fn new(unit: Option<&'a str>, deps: &'a ComponentDependencies) -> Self {
        let buckets = BucketRole::ALL
            .into_iter()
            .map(|role| BucketReport::new(deps.bucket(role)))
            .collect();
        Self { unit, buckets }
    }

    pub(crate) fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(unit) = self.unit {
            let _ = writeln!(out, "{}", unit.bold());
        }
        for bucket in &self.buckets {
            let _ = writeln!(out, "{}", bucket.name.cyan());
            if bucket.dependencies.is_empty() && bucket.pending == 0 {
                let _ = writeln!(out, "  (none)");
            }
            for dependency in &bucket.dependencies {
                let _ = writeln!(out, "  {dependency}");
            }
            if bucket.pending > 0 {
                let _ = writeln!(out, "  ({} deferred, not resolved)", bucket.pending);
            }
        }
        out
    }
}

impl<'a> BucketReport<'a> {
    fn new(bucket: &'a DependencyBucket) -> Self {
        Self {
            name: bucket.name(),
            extends_from: bucket.extends_from(),
            dependencies: bucket.dependencies().collect(),
            pending: bucket.pending_count(),
        }
    }
}

impl ResolveCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let file = DeclarationsFile::load(&config.declarations_path).await?;
        let mut deps = file.component()?;

        if self.no_deferred {
            debug!("Skipping deferred resolution");
        } else {
            let resolved = deps.resolve_pending()?;
            debug!("Resolved {} deferred declaration(s)", resolved);
        }

        let report = ResolveReport::new(file.unit.as_deref(), &deps);
        match self.format {
            OutputFormat::Text => print!("{}", report.to_text()),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize resolve report")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}
