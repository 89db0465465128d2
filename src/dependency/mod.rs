//! The dependency declaration model.
//!
//! A [`Dependency`] is what ends up in a bucket: a fixed target (a module,
//! a sibling project, or a class-path notation) plus mutable declaration
//! metadata that customizers are free to change:
//!
//! - a reason (`because`)
//! - whether transitive dependencies are followed
//! - exclude rules
//! - capability requirements
//!
//! The target is private and has no setter. A customizer that assigns a whole
//! new [`Dependency`] with a different target is rejected by
//! [`DependencyFactory::create`].

mod capability;
mod coordinates;
mod factory;

pub use capability::{
    Capability, CapabilityRequirement, TEST_FIXTURES_CAPABILITY_SUFFIX, require_test_fixtures,
    with_test_fixtures,
};
pub use coordinates::{Bundle, MinimalDependency, ModuleCoordinates};
pub use factory::{Customizer, DependencyFactory, customizer};

use serde::Serialize;
use std::fmt;

/// Self-dependencies on files shipped with the build tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassPathNotation {
    /// The build tool's plugin API
    BuildApi,
    /// The build tool's functional testing kit
    TestKit,
    /// The Groovy runtime bundled with the build tool
    LocalGroovy,
}

impl ClassPathNotation {
    /// Parse the kebab-case name used in declaration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "build-api" => Some(Self::BuildApi),
            "test-kit" => Some(Self::TestKit),
            "local-groovy" => Some(Self::LocalGroovy),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuildApi => "build-api",
            Self::TestKit => "test-kit",
            Self::LocalGroovy => "local-groovy",
        }
    }
}

impl fmt::Display for ClassPathNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dependency points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyTarget {
    /// An external module
    Module(ModuleCoordinates),
    /// Another project of the same build
    Project {
        /// Project path, e.g. `:core`
        path: String,
    },
    /// Files shipped with the build tool
    ClassPath(ClassPathNotation),
}

/// A module-level exclusion: either field may be omitted to match anything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub struct ExcludeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl ExcludeRule {
    pub fn new(group: Option<impl Into<String>>, module: Option<impl Into<String>>) -> Self {
        Self {
            group: group.map(Into::into),
            module: module.map(Into::into),
        }
    }

    /// Whether this rule excludes the given module.
    pub fn matches(&self, coordinates: &ModuleCoordinates) -> bool {
        self.group.as_ref().is_none_or(|g| *g == coordinates.group)
            && self.module.as_ref().is_none_or(|m| *m == coordinates.name)
    }
}

/// A declared dependency, owned by the bucket it is added to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    target: DependencyTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    transitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excludes: Vec<ExcludeRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    capabilities: Vec<CapabilityRequirement>,
}

impl Dependency {
    fn with_target(target: DependencyTarget) -> Self {
        Self {
            target,
            reason: None,
            transitive: true,
            excludes: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// A dependency on an external module.
    pub fn module(coordinates: ModuleCoordinates) -> Self {
        Self::with_target(DependencyTarget::Module(coordinates))
    }

    /// A dependency on another project of the same build.
    pub fn project(path: impl Into<String>) -> Self {
        Self::with_target(DependencyTarget::Project { path: path.into() })
    }

    /// A dependency on files shipped with the build tool.
    pub fn class_path(notation: ClassPathNotation) -> Self {
        Self::with_target(DependencyTarget::ClassPath(notation))
    }

    pub const fn target(&self) -> &DependencyTarget {
        &self.target
    }

    /// Coordinates for module dependencies, `None` otherwise.
    pub const fn coordinates(&self) -> Option<&ModuleCoordinates> {
        match &self.target {
            DependencyTarget::Module(coordinates) => Some(coordinates),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&str> {
        self.coordinates().map(|c| c.group.as_str())
    }

    /// Module name, project path or class-path notation name.
    pub fn name(&self) -> &str {
        match &self.target {
            DependencyTarget::Module(coordinates) => &coordinates.name,
            DependencyTarget::Project { path } => path,
            DependencyTarget::ClassPath(notation) => notation.as_str(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.coordinates().and_then(|c| c.version.as_deref())
    }

    pub fn project_path(&self) -> Option<&str> {
        match &self.target {
            DependencyTarget::Project { path } => Some(path),
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Record why this dependency is declared.
    pub fn because(&mut self, reason: impl Into<String>) -> &mut Self {
        self.reason = Some(reason.into());
        self
    }

    pub const fn is_transitive(&self) -> bool {
        self.transitive
    }

    pub fn set_transitive(&mut self, transitive: bool) -> &mut Self {
        self.transitive = transitive;
        self
    }

    pub fn excludes(&self) -> &[ExcludeRule] {
        &self.excludes
    }

    pub fn exclude(&mut self, rule: ExcludeRule) -> &mut Self {
        if !self.excludes.contains(&rule) {
            self.excludes.push(rule);
        }
        self
    }

    pub fn capabilities(&self) -> &[CapabilityRequirement] {
        &self.capabilities
    }

    /// Add a capability requirement; requiring the same one twice is a no-op.
    pub fn require_capability(&mut self, requirement: CapabilityRequirement) -> &mut Self {
        if !self.capabilities.contains(&requirement) {
            self.capabilities.push(requirement);
        }
        self
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            DependencyTarget::Module(coordinates) => coordinates.fmt(f),
            DependencyTarget::Project { path } => write!(f, "project {path}"),
            DependencyTarget::ClassPath(notation) => write!(f, "{notation}()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_setters_do_not_touch_target() {
        let mut dep = Dependency::module(ModuleCoordinates::new("g", "lib", Some("1.0")));
        dep.because("needed for parsing")
            .set_transitive(false)
            .exclude(ExcludeRule::new(Some("commons-logging"), None::<String>));

        assert_eq!(dep.reason(), Some("needed for parsing"));
        assert!(!dep.is_transitive());
        assert_eq!(dep.excludes().len(), 1);
        assert_eq!(dep.group(), Some("g"));
        assert_eq!(dep.name(), "lib");
        assert_eq!(dep.version(), Some("1.0"));
    }

    #[test]
    fn test_exclude_rule_wildcards() {
        let coords = ModuleCoordinates::new("org.slf4j", "slf4j-api", None::<String>);
        assert!(ExcludeRule::new(Some("org.slf4j"), None::<String>).matches(&coords));
        assert!(ExcludeRule::new(None::<String>, Some("slf4j-api")).matches(&coords));
        assert!(!ExcludeRule::new(Some("org.slf4j"), Some("slf4j-simple")).matches(&coords));
    }

    #[test]
    fn test_display_per_target() {
        assert_eq!(Dependency::project(":core").to_string(), "project :core");
        assert_eq!(
            Dependency::class_path(ClassPathNotation::LocalGroovy).to_string(),
            "local-groovy()"
        );
    }

    #[test]
    fn test_class_path_names_round_trip() {
        for notation in [
            ClassPathNotation::BuildApi,
            ClassPathNotation::TestKit,
            ClassPathNotation::LocalGroovy,
        ] {
            assert_eq!(ClassPathNotation::from_name(notation.as_str()), Some(notation));
        }
        assert_eq!(ClassPathNotation::from_name("gradle-api"), None);
    }
}
