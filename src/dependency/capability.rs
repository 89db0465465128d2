//! Capability requirements and the test-fixtures augmenter.
//!
//! A capability names an alternate variant that the resolved module must
//! additionally provide. Requesting the test fixtures of a dependency comes in
//! two shapes:
//!
//! - for a sibling project, a [`CapabilityRequirement::ProjectTestFixtures`]
//!   marker naming the project; whoever resolves it looks up that project's
//!   fixtures output
//! - for an external module `group:name:version`, a concrete capability
//!   `group:name-test-fixtures` with no version, matching any version that
//!   offers it

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::{Dependency, DependencyTarget};
use crate::core::DepsError;

/// Suffix appended to a module name to form its test-fixtures capability.
pub const TEST_FIXTURES_CAPABILITY_SUFFIX: &str = "-test-fixtures";

/// A capability identifier. `version: None` matches any version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Capability {
    pub group: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Capability {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: Option<impl Into<String>>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.map(Into::into),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.name, version),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

/// A capability a dependency's resolved component must provide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CapabilityRequirement {
    /// An explicit capability coordinate.
    Module(Capability),
    /// The test-fixtures variant of a project in the same build.
    ProjectTestFixtures {
        /// Path of the project, e.g. `:core`
        project_path: String,
    },
}

impl fmt::Display for CapabilityRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(capability) => capability.fmt(f),
            Self::ProjectTestFixtures { project_path } => {
                write!(f, "test fixtures of project {project_path}")
            }
        }
    }
}

/// Require the test-fixtures variant of `dependency`.
///
/// The same dependency is returned carrying the extra requirement, ready to
/// be declared in a bucket. Coordinates are never changed.
///
/// # Errors
///
/// Class-path dependencies have no published variants and are rejected with
/// [`DepsError::UnsupportedNotation`].
///
/// # Examples
///
/// ```rust
/// use component_deps::dependency::{
///     Capability, CapabilityRequirement, Dependency, ModuleCoordinates, with_test_fixtures,
/// };
///
/// let dep = Dependency::module(ModuleCoordinates::new("g", "lib", Some("1.0")));
/// let dep = with_test_fixtures(dep).unwrap();
/// assert_eq!(
///     dep.capabilities(),
///     [CapabilityRequirement::Module(Capability::new("g", "lib-test-fixtures", None::<String>))]
/// );
/// ```
pub fn with_test_fixtures(mut dependency: Dependency) -> Result<Dependency, DepsError> {
    require_test_fixtures(&mut dependency)?;
    Ok(dependency)
}

/// In-place form of [`with_test_fixtures`], for use inside customizers.
///
/// On error the dependency is left unchanged.
pub fn require_test_fixtures(dependency: &mut Dependency) -> Result<(), DepsError> {
    let requirement = match dependency.target() {
        DependencyTarget::Project { path } => CapabilityRequirement::ProjectTestFixtures {
            project_path: path.clone(),
        },
        DependencyTarget::Module(coordinates) => CapabilityRequirement::Module(Capability::new(
            coordinates.group.clone(),
            format!("{}{TEST_FIXTURES_CAPABILITY_SUFFIX}", coordinates.name),
            None::<String>,
        )),
        DependencyTarget::ClassPath(notation) => {
            return Err(DepsError::UnsupportedNotation {
                notation: notation.to_string(),
                reason: "class-path dependencies have no test fixtures variant".to_string(),
            });
        }
    };

    debug!("Requiring capability '{}' on {}", requirement, dependency);
    dependency.require_capability(requirement);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::{ClassPathNotation, ModuleCoordinates};

    #[test]
    fn test_module_fixtures_capability_has_no_version() {
        let dep = Dependency::module(ModuleCoordinates::new("org.acme", "engine", Some("2.1")));
        let dep = with_test_fixtures(dep).unwrap();

        assert_eq!(
            dep.capabilities(),
            [CapabilityRequirement::Module(Capability::new(
                "org.acme",
                "engine-test-fixtures",
                None::<String>
            ))]
        );
        // coordinates untouched
        assert_eq!(dep.to_string(), "org.acme:engine:2.1");
    }

    #[test]
    fn test_project_fixtures_uses_project_marker() {
        let dep = with_test_fixtures(Dependency::project(":core")).unwrap();
        assert_eq!(
            dep.capabilities(),
            [CapabilityRequirement::ProjectTestFixtures {
                project_path: ":core".to_string()
            }]
        );
        assert_eq!(dep.project_path(), Some(":core"));
    }

    #[test]
    fn test_requesting_fixtures_twice_adds_one_requirement() {
        let dep = Dependency::module(ModuleCoordinates::new("g", "lib", Some("1.0")));
        let dep = with_test_fixtures(with_test_fixtures(dep).unwrap()).unwrap();
        assert_eq!(dep.capabilities().len(), 1);
    }

    #[test]
    fn test_class_path_dependencies_are_rejected() {
        let err =
            with_test_fixtures(Dependency::class_path(ClassPathNotation::TestKit)).unwrap_err();
        assert!(matches!(err, DepsError::UnsupportedNotation { .. }));
    }

    #[test]
    fn test_in_place_form_keeps_the_target() {
        let mut dep = Dependency::project(":core");
        require_test_fixtures(&mut dep).unwrap();
        assert_eq!(dep.project_path(), Some(":core"));
        assert_eq!(dep.capabilities().len(), 1);

        let mut api = Dependency::class_path(ClassPathNotation::BuildApi);
        assert!(require_test_fixtures(&mut api).is_err());
        assert!(api.capabilities().is_empty());
    }
}
