//! The declarations file model.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use super::parser;
use crate::catalog::{CatalogDefinition, VersionCatalog};
use crate::component::{BucketRole, ComponentDependencies};
use crate::core::DepsError;
use crate::dependency::{
    ClassPathNotation, Customizer, ExcludeRule, ModuleCoordinates, customizer,
    require_test_fixtures,
};
use crate::notation::{ConcreteNotation, Notation, ProjectRef};

/// Contents of a declarations file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationsFile {
    /// Label of the component the declarations belong to, e.g. `:app`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub catalog: CatalogDefinition,

    /// `[[declare]]` entries in file order.
    #[serde(default, rename = "declare", skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<Declaration>,
}

/// One `[[declare]]` entry.
///
/// Exactly one of `notation`, `project`, `library`, `bundle`, `lazy` and
/// `builtin` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub bucket: String,

    /// `group:name[:version]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,

    /// Path of a sibling project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Catalog library alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,

    /// Catalog bundle alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,

    /// Coordinates only read when deferred dependencies are resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy: Option<String>,

    /// `build-api`, `test-kit` or `local-groovy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin: Option<String>,

    #[serde(default)]
    pub test_fixtures: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitive: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<ExcludeRule>,
}

/// Which field of a [`Declaration`] names the notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationSource<'a> {
    Notation(&'a str),
    Project(&'a str),
    Library(&'a str),
    Bundle(&'a str),
    Lazy(&'a str),
    Builtin(&'a str),
}

impl DeclarationSource<'_> {
    /// The TOML key this source was read from.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Notation(_) => "notation",
            Self::Project(_) => "project",
            Self::Library(_) => "library",
            Self::Bundle(_) => "bundle",
            Self::Lazy(_) => "lazy",
            Self::Builtin(_) => "builtin",
        }
    }
}

impl DeclarationsFile {
    /// Load and parse a declarations file.
    ///
    /// The file is parsed but not validated; call [`validate`](Self::validate)
    /// or [`apply`](Self::apply).
    ///
    /// # Errors
    ///
    /// - [`DepsError::DeclarationsNotFound`] if `path` does not exist
    /// - [`DepsError::DeclarationsParseError`] for invalid TOML
    pub async fn load(path: &Path) -> Result<Self> {
        let file: Self = parser::parse_file(path).await?;
        debug!(
            "Loaded {} declaration(s) and {} catalog librar(ies) from {}",
            file.declarations.len(),
            file.catalog.libraries.len(),
            path.display()
        );
        Ok(file)
    }

    /// Check every entry without declaring anything.
    ///
    /// Reports the first invalid entry as [`DepsError::InvalidDeclaration`].
    pub fn validate(&self) -> Result<(), DepsError> {
        for (index, declaration) in self.declarations.iter().enumerate() {
            declaration.check(&self.catalog).map_err(|reason| DepsError::InvalidDeclaration {
                index,
                reason,
            })?;
        }
        Ok(())
    }

    /// Validate, then declare every entry in file order.
    ///
    /// Deferred entries are registered, not resolved.
    pub fn apply(&self, deps: &mut ComponentDependencies) -> Result<()> {
        self.validate()?;
        let catalog = VersionCatalog::new(self.catalog.clone());

        for (index, declaration) in self.declarations.iter().enumerate() {
            let role: BucketRole = declaration.bucket.parse()?;
            let notation = declaration
                .to_notation(&catalog)
                .map_err(|reason| DepsError::InvalidDeclaration { index, reason })?;

            deps.add(role, notation, declaration.customizer())
                .with_context(|| format!("Failed to declare entry #{index} ({declaration})"))?;
        }
        Ok(())
    }

    /// A fresh [`ComponentDependencies`] with every entry declared.
    pub fn component(&self) -> Result<ComponentDependencies> {
        let mut deps = ComponentDependencies::new();
        self.apply(&mut deps)?;
        Ok(deps)
    }
}

impl Declaration {
    /// The single notation field that is set.
    pub fn source(&self) -> Result<DeclarationSource<'_>, String> {
        let candidates = [
            self.notation.as_deref().map(DeclarationSource::Notation),
            self.project.as_deref().map(DeclarationSource::Project),
            self.library.as_deref().map(DeclarationSource::Library),
            self.bundle.as_deref().map(DeclarationSource::Bundle),
            self.lazy.as_deref().map(DeclarationSource::Lazy),
            self.builtin.as_deref().map(DeclarationSource::Builtin),
        ];
        let mut present = candidates.into_iter().flatten();

        match (present.next(), present.next()) {
            (Some(source), None) => Ok(source),
            (None, _) => Err("no notation given".to_string()),
            (Some(first), Some(second)) => Err(format!(
                "both '{}' and '{}' are set, only one is allowed",
                first.key(),
                second.key()
            )),
        }
    }

    fn check(&self, catalog: &CatalogDefinition) -> Result<(), String> {
        self.bucket.parse::<BucketRole>().map_err(|error| error.to_string())?;

        let source = self.source()?;
        match source {
            DeclarationSource::Notation(text) => {
                ModuleCoordinates::parse(text).map_err(|error| error.to_string())?;
            }
            DeclarationSource::Project(value) | DeclarationSource::Lazy(value)
                if value.trim().is_empty() =>
            {
                return Err(format!("'{}' is empty", source.key()));
            }
            DeclarationSource::Project(_) | DeclarationSource::Lazy(_) => {}
            DeclarationSource::Library(alias) if !catalog.libraries.contains_key(alias) => {
                return Err(format!("unknown library alias '{alias}'"));
            }
            DeclarationSource::Bundle(alias) if !catalog.bundles.contains_key(alias) => {
                return Err(format!("unknown bundle alias '{alias}'"));
            }
            DeclarationSource::Library(_) | DeclarationSource::Bundle(_) => {}
            DeclarationSource::Builtin(name) => {
                if ClassPathNotation::from_name(name).is_none() {
                    return Err(format!(
                        "unknown builtin '{name}', expected build-api, test-kit or local-groovy"
                    ));
                }
                if self.test_fixtures {
                    return Err(format!("builtin '{name}' has no test fixtures"));
                }
            }
        }
        Ok(())
    }

    fn to_notation(&self, catalog: &VersionCatalog) -> Result<Notation, String> {
        let notation = match self.source()? {
            DeclarationSource::Notation(text) => Notation::from(text),
            DeclarationSource::Project(path) => ProjectRef::new(path).into(),
            DeclarationSource::Library(alias) => catalog.library(alias).into(),
            DeclarationSource::Bundle(alias) => catalog.bundle(alias).into(),
            DeclarationSource::Lazy(text) => {
                let text = text.to_string();
                Notation::deferred(format!("lazy {text}"), move || {
                    Ok(ConcreteNotation::from(text.as_str()))
                })
            }
            DeclarationSource::Builtin(name) => ClassPathNotation::from_name(name)
                .map(Notation::from)
                .ok_or_else(|| format!("unknown builtin '{name}'"))?,
        };
        Ok(notation)
    }

    /// Customizer carrying this entry's metadata, if it has any.
    fn customizer(&self) -> Option<Customizer> {
        if self.because.is_none()
            && self.transitive.is_none()
            && self.exclude.is_empty()
            && !self.test_fixtures
        {
            return None;
        }

        let because = self.because.clone();
        let transitive = self.transitive;
        let excludes = self.exclude.clone();
        let test_fixtures = self.test_fixtures;

        Some(customizer(move |dep| {
            if let Some(reason) = &because {
                dep.because(reason.clone());
            }
            if let Some(transitive) = transitive {
                dep.set_transitive(transitive);
            }
            for rule in &excludes {
                dep.exclude(rule.clone());
            }
            if test_fixtures {
                require_test_fixtures(dep)?;
            }
            Ok(())
        }))
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source() {
            Ok(source) => {
                let value = match source {
                    DeclarationSource::Notation(v)
                    | DeclarationSource::Project(v)
                    | DeclarationSource::Library(v)
                    | DeclarationSource::Bundle(v)
                    | DeclarationSource::Lazy(v)
                    | DeclarationSource::Builtin(v) => v,
                };
                write!(f, "{} {} = \"{}\"", self.bucket, source.key(), value)
            }
            Err(_) => write!(f, "{} <invalid>", self.bucket),
        }
    }
}
