//! Turning concrete notations into dependency objects.

use std::sync::Arc;

use tracing::trace;

use super::{Dependency, ModuleCoordinates};
use crate::core::DepsError;
use crate::notation::ConcreteNotation;

/// Callback applied to every dependency produced by a declaration, after
/// creation and before it is added to a bucket.
///
/// Errors it returns are handed back to the caller unchanged.
pub type Customizer = Arc<dyn Fn(&mut Dependency) -> anyhow::Result<()> + Send + Sync>;

/// Build a [`Customizer`] from a closure.
pub fn customizer(
    action: impl Fn(&mut Dependency) -> anyhow::Result<()> + Send + Sync + 'static,
) -> Customizer {
    Arc::new(action)
}

/// Creates [`Dependency`] objects from concrete notations.
///
/// Stateless; it never touches a bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyFactory;

impl DependencyFactory {
    pub const fn new() -> Self {
        Self
    }

    /// Create a dependency and apply `customizer` to it exactly once.
    ///
    /// # Errors
    ///
    /// - [`DepsError::InvalidCoordinates`] for malformed or incomplete coordinates
    /// - [`DepsError::UnsupportedNotation`] for bucket references
    /// - [`DepsError::CustomizerReplacedTarget`] if the customizer swapped the target
    /// - whatever the customizer returns
    pub fn create(
        &self,
        notation: ConcreteNotation,
        customizer: Option<&Customizer>,
    ) -> anyhow::Result<Dependency> {
        let mut dependency = match notation {
            ConcreteNotation::Coordinates(text) => {
                Dependency::module(ModuleCoordinates::parse(&text)?)
            }
            ConcreteNotation::Module(coordinates) => {
                coordinates.validate()?;
                Dependency::module(coordinates)
            }
            ConcreteNotation::Minimal(minimal) => {
                minimal.coordinates().validate()?;
                Dependency::module(minimal.coordinates().clone())
            }
            ConcreteNotation::Project(project) => Dependency::project(project.path()),
            ConcreteNotation::ClassPath(notation) => Dependency::class_path(notation),
            ConcreteNotation::Dependency(dependency) => dependency,
            ConcreteNotation::Bucket(bucket) => {
                return Err(DepsError::UnsupportedNotation {
                    notation: bucket.to_string(),
                    reason: "a bucket cannot be turned into a dependency".to_string(),
                }
                .into());
            }
        };

        if let Some(customize) = customizer {
            let original = dependency.clone();
            customize(&mut dependency)?;
            if dependency.target() != original.target() {
                return Err(DepsError::CustomizerReplacedTarget {
                    original: original.to_string(),
                    replacement: dependency.to_string(),
                }
                .into());
            }
        }
        trace!("Created dependency {}", dependency);
        Ok(dependency)
    }
}
