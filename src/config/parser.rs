//! Reading TOML files with error context.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;

use crate::core::DepsError;

/// Read and parse a TOML file.
///
/// A missing file is reported as [`DepsError::DeclarationsNotFound`] and a
/// syntax or schema problem as [`DepsError::DeclarationsParseError`], so
/// callers can downcast either one. Other I/O failures keep their
/// [`std::io::Error`] with the path added as context.
pub async fn parse_file<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let exists = fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check for {}", path.display()))?;
    if !exists {
        return Err(DepsError::DeclarationsNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse_str(&content, path)
}

/// Parse TOML text that came from `origin`.
pub fn parse_str<T>(content: &str, origin: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    toml::from_str(content).map_err(|error: toml::de::Error| {
        DepsError::DeclarationsParseError {
            file: origin.display().to_string(),
            reason: error.message().to_string(),
        }
        .into()
    })
}
