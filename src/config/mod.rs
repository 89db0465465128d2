//! Declarations files.
//!
//! A declarations file describes the dependencies of one component in TOML,
//! together with the version catalog its entries may refer to. The CLI loads
//! it, validates it and feeds every entry through
//! [`ComponentDependencies`](crate::component::ComponentDependencies).
//!
//! # Format
//!
//! ```toml
//! unit = ":app"
//!
//! [catalog.libraries]
//! junit = "org.junit:junit:4.13.2"
//! hamcrest = { group = "org.hamcrest", name = "hamcrest", version = "2.2" }
//!
//! [catalog.bundles]
//! testing = ["junit", "hamcrest"]
//!
//! [[declare]]
//! bucket = "implementation"
//! notation = "com.google.guava:guava:33.0.0-jre"
//! because = "collections"
//! exclude = [{ group = "com.google.code.findbugs" }]
//!
//! [[declare]]
//! bucket = "implementation"
//! bundle = "testing"
//!
//! [[declare]]
//! bucket = "runtimeOnly"
//! lazy = "org.postgresql:postgresql:42.7.1"
//!
//! [[declare]]
//! bucket = "implementation"
//! project = ":core"
//! test_fixtures = true
//!
//! [[declare]]
//! bucket = "compileOnly"
//! builtin = "build-api"
//! ```
//!
//! Every entry names a `bucket` (`implementation`, `compileOnly`,
//! `runtimeOnly` or `annotationProcessor`) and exactly one notation field:
//!
//! | Field | Declared as |
//! |---|---|
//! | `notation` | module coordinates, created immediately |
//! | `project` | a sibling project |
//! | `library` | a catalog library, resolved with the deferred dependencies |
//! | `bundle` | a catalog bundle, expanded immediately |
//! | `lazy` | module coordinates read only at resolution |
//! | `builtin` | `build-api`, `test-kit` or `local-groovy` |
//!
//! `because`, `transitive`, `exclude` and `test_fixtures` are applied to every
//! dependency the entry produces.

mod declarations;
pub mod parser;

pub use declarations::{Declaration, DeclarationSource, DeclarationsFile};

/// File name looked up when no `--file` is given.
pub const DEFAULT_DECLARATIONS_FILE: &str = "deps.toml";
