//! Test utilities
//!
//! Helpers shared by unit tests and the integration tests under `tests/`:
//! logging setup and sample declarations files.
//!
//! # Example
//!
//! ```rust,ignore
//! use component_deps::test_utils::{DeclarationsFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let dir = tempfile::tempdir().unwrap();
//! let path = DeclarationsFixture::basic().write_to(dir.path()).unwrap();
//! assert!(path.ends_with("deps.toml"));
//! ```

pub mod fixtures;

pub use fixtures::DeclarationsFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=component_deps=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeclarationsFile;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fixtures_load() {
        init_test_logging(None);
        let temp = tempdir().unwrap();

        let basic = DeclarationsFixture::basic().write_to(temp.path()).unwrap();
        let file = DeclarationsFile::load(&basic).await.unwrap();
        assert_eq!(file.declarations.len(), 3);
        assert!(file.validate().is_ok());

        let ambiguous = DeclarationsFixture::ambiguous_entry().write_to(temp.path()).unwrap();
        let file = DeclarationsFile::load(&ambiguous).await.unwrap();
        assert!(file.validate().is_err());

        let empty = DeclarationsFixture::empty().write_to(temp.path()).unwrap();
        let file = DeclarationsFile::load(&empty).await.unwrap();
        assert!(file.declarations.is_empty());
    }
}
