//! Sample declarations files for tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DECLARATIONS_FILE;

/// Test fixture for creating sample deps.toml files
#[derive(Clone, Debug)]
pub struct DeclarationsFixture {
    pub content: String,
    pub name: String,
}

impl DeclarationsFixture {
    /// One eager, one bundle and one deferred declaration
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
unit = ":app"

[catalog.libraries]
a = "g1:a:1"
b = { group = "g1", name = "b", version = "2" }

[catalog.bundles]
pair = ["a", "b"]

[[declare]]
bucket = "implementation"
notation = "g:lib:1.0"

[[declare]]
bucket = "implementation"
bundle = "pair"

[[declare]]
bucket = "runtimeOnly"
lazy = "g:x:3"
"#
            .trim()
            .to_string(),
        }
    }

    /// Project, builtin and test-fixtures declarations with metadata
    pub fn with_fixtures() -> Self {
        Self {
            name: "with_fixtures".to_string(),
            content: r#"
[[declare]]
bucket = "implementation"
project = ":core"
test_fixtures = true

[[declare]]
bucket = "implementation"
notation = "org.example:lib:1.0"
test_fixtures = true
because = "shared test data"

[[declare]]
bucket = "compileOnly"
builtin = "build-api"
"#
            .trim()
            .to_string(),
        }
    }

    /// Deferred declaration whose coordinates are only rejected at resolution
    pub fn bad_lazy() -> Self {
        Self {
            name: "bad_lazy".to_string(),
            content: r#"
[[declare]]
bucket = "runtimeOnly"
lazy = "not-coordinates"
"#
            .trim()
            .to_string(),
        }
    }

    /// Entry with two notation fields
    pub fn ambiguous_entry() -> Self {
        Self {
            name: "ambiguous_entry".to_string(),
            content: r#"
[[declare]]
bucket = "implementation"
notation = "g:a:1"
project = ":core"
"#
            .trim()
            .to_string(),
        }
    }

    /// Invalid TOML syntax
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: "[[declare]\nbucket = \"implementation\"".to_string(),
        }
    }

    /// No declarations at all
    pub fn empty() -> Self {
        Self {
            name: "empty".to_string(),
            content: String::new(),
        }
    }

    /// Write this fixture as `deps.toml` in `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(DEFAULT_DECLARATIONS_FILE);
        fs::write(&path, &self.content)
            .with_context(|| {
                format!("Failed to write fixture '{}' to {}", self.name, path.display())
            })?;
        Ok(path)
    }
}
