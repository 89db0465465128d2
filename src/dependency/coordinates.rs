//! Module coordinates, minimal descriptors and bundles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::DepsError;

/// A `group:name[:version]` triple identifying a published module.
///
/// The version is optional; an absent version leaves the choice to whatever
/// performs resolution later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleCoordinates {
    /// Organisation or group owning the module
    pub group: String,
    /// Module name within the group
    pub name: String,
    /// Requested version, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleCoordinates {
    /// Build coordinates from their parts without validating them.
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

    /// Parse `group:name` or `group:name:version`.
    ///
    /// Surrounding whitespace is ignored. Empty segments and more than three
    /// segments are rejected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use component_deps::dependency::ModuleCoordinates;
    ///
    /// let coords = ModuleCoordinates::parse("org.junit:junit:4.13.2").unwrap();
    /// assert_eq!(coords.group, "org.junit");
    /// assert_eq!(coords.version.as_deref(), Some("4.13.2"));
    ///
    /// assert!(ModuleCoordinates::parse("junit").is_err());
    /// ```
    pub fn parse(notation: &str) -> Result<Self, DepsError> {
        let trimmed = notation.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        let invalid = |reason: &str| DepsError::InvalidCoordinates {
            notation: notation.to_string(),
            reason: reason.to_string(),
        };

        let coords = match parts.as_slice() {
            [group, name] => Self::new(*group, *name, None::<String>),
            [group, name, version] => {
                if version.is_empty() {
                    return Err(invalid("version segment is empty"));
                }
                Self::new(*group, *name, Some(*version))
            }
            [_] => return Err(invalid("expected 'group:name[:version]'")),
            _ => return Err(invalid("too many ':' separated segments")),
        };
        coords.validate().map_err(|e| match e {
            DepsError::InvalidCoordinates { reason, .. } => invalid(&reason),
            other => other,
        })?;
        Ok(coords)
    }

    /// Check that group and name are present and that no part contains `:`.
    pub fn validate(&self) -> Result<(), DepsError> {
        let version = self.version.as_deref();
        let reason = if self.group.trim().is_empty() {
            Some("group is missing")
        } else if self.name.trim().is_empty() {
            Some("name is missing")
        } else if version.is_some_and(|v| v.trim().is_empty()) {
            Some("version is blank")
        } else if [Some(self.group.as_str()), Some(self.name.as_str()), version]
            .into_iter()
            .flatten()
            .any(|part| part.contains(':'))
        {
            Some("too many ':' separated segments")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DepsError::InvalidCoordinates {
                notation: self.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ModuleCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.name, version),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

impl FromStr for ModuleCoordinates {
    type Err = DepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A bare coordinate descriptor as found inside a [`Bundle`].
///
/// Immutable: it carries no declaration metadata and exposes no setters.
/// Expansion turns it into a fresh [`Dependency`](super::Dependency).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinimalDependency {
    coordinates: ModuleCoordinates,
}

impl MinimalDependency {
    /// Wrap coordinates; validation is deferred to expansion.
    pub const fn new(coordinates: ModuleCoordinates) -> Self {
        Self { coordinates }
    }

    /// The wrapped coordinates.
    pub const fn coordinates(&self) -> &ModuleCoordinates {
        &self.coordinates
    }

    pub fn group(&self) -> &str {
        &self.coordinates.group
    }

    pub fn name(&self) -> &str {
        &self.coordinates.name
    }

    pub fn version(&self) -> Option<&str> {
        self.coordinates.version.as_deref()
    }
}

impl fmt::Display for MinimalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.coordinates.fmt(f)
    }
}

impl From<ModuleCoordinates> for MinimalDependency {
    fn from(coordinates: ModuleCoordinates) -> Self {
        Self::new(coordinates)
    }
}

/// An ordered group of minimal descriptors declared as one notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    alias: String,
    dependencies: Vec<MinimalDependency>,
}

impl Bundle {
    pub fn new(alias: impl Into<String>, dependencies: Vec<MinimalDependency>) -> Self {
        Self {
            alias: alias.into(),
            dependencies,
        }
    }

    /// Alias used in error messages.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MinimalDependency> {
        self.dependencies.iter()
    }
}

impl IntoIterator for Bundle {
    type Item = MinimalDependency;
    type IntoIter = std::vec::IntoIter<MinimalDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.dependencies.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type Item = &'a MinimalDependency;
    type IntoIter = std::slice::Iter<'a, MinimalDependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.dependencies.iter()
    }
}
