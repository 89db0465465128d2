//! Dependency declaration for JVM-style build components.
//!
//! A component owns four named dependency buckets (`implementation`,
//! `compileOnly`, `runtimeOnly` and `annotationProcessor`). Every
//! declaration is given as a [`Notation`](notation::Notation) and routed by
//! its kind:
//!
//! - **Eager** notations (coordinate strings, coordinate values, project
//!   references, class-path notations, ready-made dependencies) are turned
//!   into a dependency and appended immediately.
//! - **Bundle** notations (a provider statically typed as a bundle) are
//!   forced at declaration time and every element is appended in order.
//! - **Deferred** notations (any other provider) register a producer on the
//!   bucket; the dependency appears once pending entries are resolved.
//!
//! Values that merely know how to become a provider, such as version catalog
//! accessors, are unwrapped once before routing.
//!
//! # Core Modules
//!
//! - [`notation`] - notation kinds, providers and classification
//! - [`dependency`] - dependency model, the factory and the test-fixtures augmenter
//! - [`bucket`] - ordered buckets with deferred entries
//! - [`component`] - the four buckets of a component and the declaration entry points
//! - [`catalog`] - version catalogs and their accessors
//!
//! # Supporting Modules
//!
//! - [`config`] - the `deps.toml` declarations file
//! - [`cli`] - the `cdeps` command line
//! - [`core`] - error types and user-facing error formatting
//!
//! # Example
//!
//! ```rust
//! use component_deps::component::{BucketRole, ComponentDependencies};
//! use component_deps::dependency::{Bundle, ModuleCoordinates};
//! use component_deps::notation::{ConcreteNotation, Notation, Provider};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut deps = ComponentDependencies::new();
//!
//! deps.implementation("g:lib:1.0")?;
//! deps.implementation(Provider::new("pair", || {
//!     Ok(Bundle::new(
//!         "pair",
//!         vec![
//!             ModuleCoordinates::new("g1", "a", Some("1")).into(),
//!             ModuleCoordinates::new("g1", "b", Some("2")).into(),
//!         ],
//!     ))
//! }))?;
//! deps.runtime_only(Notation::deferred("x", || Ok(ConcreteNotation::from("g:x:3"))))?;
//!
//! assert_eq!(deps.bucket(BucketRole::Implementation).len(), 3);
//! assert_eq!(deps.bucket(BucketRole::RuntimeOnly).len(), 0);
//!
//! deps.resolve_pending()?;
//! assert_eq!(deps.bucket(BucketRole::RuntimeOnly).len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod catalog;
pub mod cli;
pub mod component;
pub mod config;
pub mod core;
pub mod dependency;
pub mod notation;

// Test utilities (available for both unit and integration tests)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
