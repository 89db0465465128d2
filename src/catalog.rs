//! Version catalogs.
//!
//! A catalog maps aliases to library coordinates and groups libraries into
//! bundles. Its accessors are the usual source of [`ProviderConvertible`]
//! notations: a library accessor converts to a provider of a single
//! notation, a bundle accessor to a provider statically typed as a
//! [`Bundle`].
//!
//! Lookups happen when the provider is forced, not when the accessor is
//! created, so an unknown alias surfaces as
//! [`DepsError::CatalogEntryNotFound`] at the point where the value is used.
//!
//! ```toml
//! [catalog.libraries]
//! junit = "org.junit:junit:4.13.2"
//! hamcrest = { group = "org.hamcrest", name = "hamcrest", version = "2.2" }
//!
//! [catalog.bundles]
//! testing = ["junit", "hamcrest"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::DepsError;
use crate::dependency::{Bundle, MinimalDependency, ModuleCoordinates};
use crate::notation::{
    ConcreteNotation, Notation, Provider, ProviderConvertible, ProviderNotation,
};

/// How a library is written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibraryDefinition {
    /// `"group:name[:version]"`
    Notation(String),
    /// `{ group = "...", name = "...", version = "..." }`
    Detailed {
        #[serde(default)]
        group: String,
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
}

impl LibraryDefinition {
    /// Coordinates as written. Missing parts stay empty and extra `:` segments
    /// stay in the version; the factory or the bundle expander rejects both
    /// when the library is actually used.
    pub fn coordinates(&self) -> ModuleCoordinates {
        match self {
            Self::Notation(text) => {
                let mut parts = text.trim().splitn(3, ':');
                let group = parts.next().unwrap_or_default();
                let name = parts.next().unwrap_or_default();
                ModuleCoordinates::new(group, name, parts.next())
            }
            Self::Detailed { group, name, version } => {
                ModuleCoordinates::new(group.clone(), name.clone(), version.clone())
            }
        }
    }
}

/// The `[catalog]` table of a declarations file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub libraries: BTreeMap<String, LibraryDefinition>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bundles: BTreeMap<String, Vec<String>>,
}

/// A shared, read-only catalog handing out accessors.
#[derive(Debug, Clone, Default)]
pub struct VersionCatalog {
    definition: Arc<CatalogDefinition>,
}

impl VersionCatalog {
    pub fn new(definition: CatalogDefinition) -> Self {
        Self {
            definition: Arc::new(definition),
        }
    }

    /// Accessor for a library alias.
    pub fn library(&self, alias: impl Into<String>) -> LibraryAccessor {
        LibraryAccessor {
            catalog: self.clone(),
            alias: alias.into(),
        }
    }

    /// Accessor for a bundle alias.
    pub fn bundle(&self, alias: impl Into<String>) -> BundleAccessor {
        BundleAccessor {
            catalog: self.clone(),
            alias: alias.into(),
        }
    }

    pub fn has_library(&self, alias: &str) -> bool {
        self.definition.libraries.contains_key(alias)
    }

    pub fn has_bundle(&self, alias: &str) -> bool {
        self.definition.bundles.contains_key(alias)
    }

    fn lookup_library(&self, alias: &str) -> Result<ModuleCoordinates, DepsError> {
        self.definition
            .libraries
            .get(alias)
            .map(LibraryDefinition::coordinates)
            .ok_or_else(|| DepsError::CatalogEntryNotFound {
                kind: "library".to_string(),
                alias: alias.to_string(),
            })
    }

    fn lookup_bundle(&self, alias: &str) -> Result<Bundle, DepsError> {
        let members =
            self.definition.bundles.get(alias).ok_or_else(|| DepsError::CatalogEntryNotFound {
                kind: "bundle".to_string(),
                alias: alias.to_string(),
            })?;

        let dependencies = members
            .iter()
            .map(|member| self.lookup_library(member).map(MinimalDependency::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Bundle::new(alias, dependencies))
    }
}

/// Catalog accessor for one library.
#[derive(Debug, Clone)]
pub struct LibraryAccessor {
    catalog: VersionCatalog,
    alias: String,
}

impl LibraryAccessor {
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl ProviderConvertible for LibraryAccessor {
    fn as_provider(&self) -> ProviderNotation {
        let catalog = self.catalog.clone();
        let alias = self.alias.clone();
        ProviderNotation::Single(Provider::new(format!("libs.{}", self.alias), move || {
            Ok(ConcreteNotation::Module(catalog.lookup_library(&alias)?))
        }))
    }
}

/// Catalog accessor for one bundle.
#[derive(Debug, Clone)]
pub struct BundleAccessor {
    catalog: VersionCatalog,
    alias: String,
}

impl BundleAccessor {
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl ProviderConvertible for BundleAccessor {
    fn as_provider(&self) -> ProviderNotation {
        let catalog = self.catalog.clone();
        let alias = self.alias.clone();
        let description = format!("libs.bundles.{}", self.alias);
        ProviderNotation::Bundle(Provider::new(description, move || {
            Ok(catalog.lookup_bundle(&alias)?)
        }))
    }
}

impl From<LibraryAccessor> for Notation {
    fn from(accessor: LibraryAccessor) -> Self {
        Self::convertible(accessor)
    }
}

impl From<BundleAccessor> for Notation {
    fn from(accessor: BundleAccessor) -> Self {
        Self::convertible(accessor)
    }
}
