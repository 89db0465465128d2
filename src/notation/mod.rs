//! Dependency notations and their classification.
//!
//! A build author can hand a bucket many different things: a coordinate
//! string, a project reference, a catalog accessor, a deferred value. This
//! module models all of them as one closed enum, [`Notation`], and decides how
//! each one is routed with [`classify`].
//!
//! # Classification
//!
//! Evaluated top to bottom, first match wins:
//!
//! 1. [`Notation::Convertible`] is unwrapped once via
//!    [`ProviderConvertible::as_provider`] and the result is classified.
//! 2. [`Notation::Bundle`], a provider statically typed as producing a
//!    [`Bundle`], is [`Strategy::Bundle`]. Unlike every other provider it is
//!    forced at declaration time.
//! 3. Any other provider is [`Strategy::Deferred`] and is only forced when the
//!    bucket resolves its pending entries.
//! 4. Everything else is [`Strategy::Eager`].

mod provider;

pub use provider::{Provider, ProviderConvertible, ProviderNotation};

use std::fmt;
use std::sync::Arc;

use crate::dependency::{
    Bundle, ClassPathNotation, Dependency, MinimalDependency, ModuleCoordinates,
};

/// Reference to another project of the same build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRef {
    path: String,
}

impl ProjectRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project {}", self.path)
    }
}

/// Reference to a whole dependency bucket.
///
/// Only exists so that passing a bucket where a dependency is expected can be
/// detected and reported; it is never turned into a dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketRef {
    name: String,
}

impl BucketRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BucketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bucket {}", self.name)
    }
}

/// A notation whose value is available now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConcreteNotation {
    /// `group:name[:version]` string
    Coordinates(String),
    /// Already parsed coordinates
    Module(ModuleCoordinates),
    /// A bundle element
    Minimal(MinimalDependency),
    /// A sibling project
    Project(ProjectRef),
    /// Files shipped with the build tool
    ClassPath(ClassPathNotation),
    /// An already created dependency, passed through as is
    Dependency(Dependency),
    /// A whole bucket; always rejected
    Bucket(BucketRef),
}

impl ConcreteNotation {
    /// The bucket this notation refers to, if it is a bucket reference.
    pub fn as_bucket(&self) -> Option<&BucketRef> {
        match self {
            Self::Bucket(bucket) => Some(bucket),
            _ => None,
        }
    }
}

impl fmt::Display for ConcreteNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(s) => f.write_str(s),
            Self::Module(coordinates) => coordinates.fmt(f),
            Self::Minimal(minimal) => minimal.fmt(f),
            Self::Project(project) => project.fmt(f),
            Self::ClassPath(notation) => write!(f, "{notation}()"),
            Self::Dependency(dependency) => dependency.fmt(f),
            Self::Bucket(bucket) => bucket.fmt(f),
        }
    }
}

/// Anything that can be declared against a bucket.
#[derive(Debug, Clone)]
pub enum Notation {
    /// A value available now
    Concrete(ConcreteNotation),
    /// A wrapper that converts to a provider
    Convertible(Arc<dyn ProviderConvertible>),
    /// A provider of a bundle
    Bundle(Provider<Bundle>),
    /// A provider of a single notation
    Deferred(Provider<ConcreteNotation>),
}

impl Notation {
    /// Wrap a provider-convertible value.
    pub fn convertible(value: impl ProviderConvertible + 'static) -> Self {
        Self::Convertible(Arc::new(value))
    }

    /// A deferred notation computed by `compute` when the bucket resolves it.
    pub fn deferred(
        description: impl Into<String>,
        compute: impl Fn() -> anyhow::Result<ConcreteNotation> + Send + Sync + 'static,
    ) -> Self {
        Self::Deferred(Provider::new(description, compute))
    }

    /// Replace a convertible with the provider it converts to.
    ///
    /// Other notations are returned unchanged.
    pub fn unwrap_convertible(self) -> Self {
        match self {
            Self::Convertible(convertible) => convertible.as_provider().into(),
            other => other,
        }
    }

    /// Unwrap a convertible once and pair the notation with its strategy.
    pub fn route(self) -> Route {
        match self {
            Self::Concrete(concrete) => Route::Eager(concrete),
            Self::Convertible(convertible) => match convertible.as_provider() {
                ProviderNotation::Bundle(bundle) => Route::Bundle(bundle),
                ProviderNotation::Single(single) => Route::Deferred(single),
            },
            Self::Bundle(bundle) => Route::Bundle(bundle),
            Self::Deferred(single) => Route::Deferred(single),
        }
    }
}

/// A notation after classification, carrying what its strategy needs.
#[derive(Debug, Clone)]
pub enum Route {
    Eager(ConcreteNotation),
    Bundle(Provider<Bundle>),
    Deferred(Provider<ConcreteNotation>),
}

impl Route {
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Eager(_) => Strategy::Eager,
            Self::Bundle(_) => Strategy::Bundle,
            Self::Deferred(_) => Strategy::Deferred,
        }
    }
}

/// How a notation is routed into a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Create the dependency and append it now.
    Eager,
    /// Force the bundle now and append one dependency per element.
    Bundle,
    /// Register a producer that runs when the bucket resolves pending entries.
    Deferred,
}

/// Decide how `notation` is routed. Total: every notation gets a strategy.
///
/// ```rust
/// use component_deps::notation::{ConcreteNotation, Notation, Provider, Strategy, classify};
///
/// assert_eq!(classify(&Notation::from("g:lib:1.0")), Strategy::Eager);
/// let lazy = Notation::from(Provider::<ConcreteNotation>::of("g:x:3".into()));
/// assert_eq!(classify(&lazy), Strategy::Deferred);
/// ```
pub fn classify(notation: &Notation) -> Strategy {
    match notation {
        Notation::Convertible(convertible) => match convertible.as_provider() {
            ProviderNotation::Bundle(_) => Strategy::Bundle,
            ProviderNotation::Single(_) => Strategy::Deferred,
        },
        Notation::Bundle(_) => Strategy::Bundle,
        Notation::Deferred(_) => Strategy::Deferred,
        Notation::Concrete(_) => Strategy::Eager,
    }
}

impl From<ProviderNotation> for Notation {
    fn from(provider: ProviderNotation) -> Self {
        match provider {
            ProviderNotation::Bundle(bundle) => Self::Bundle(bundle),
            ProviderNotation::Single(single) => Self::Deferred(single),
        }
    }
}

impl From<Provider<Bundle>> for Notation {
    fn from(provider: Provider<Bundle>) -> Self {
        Self::Bundle(provider)
    }
}

impl From<Provider<ConcreteNotation>> for Notation {
    fn from(provider: Provider<ConcreteNotation>) -> Self {
        Self::Deferred(provider)
    }
}

impl From<ConcreteNotation> for Notation {
    fn from(notation: ConcreteNotation) -> Self {
        Self::Concrete(notation)
    }
}

impl From<&str> for ConcreteNotation {
    fn from(coordinates: &str) -> Self {
        Self::Coordinates(coordinates.to_string())
    }
}

impl From<String> for ConcreteNotation {
    fn from(coordinates: String) -> Self {
        Self::Coordinates(coordinates)
    }
}

impl From<ModuleCoordinates> for ConcreteNotation {
    fn from(coordinates: ModuleCoordinates) -> Self {
        Self::Module(coordinates)
    }
}

impl From<MinimalDependency> for ConcreteNotation {
    fn from(minimal: MinimalDependency) -> Self {
        Self::Minimal(minimal)
    }
}

impl From<ProjectRef> for ConcreteNotation {
    fn from(project: ProjectRef) -> Self {
        Self::Project(project)
    }
}

impl From<ClassPathNotation> for ConcreteNotation {
    fn from(notation: ClassPathNotation) -> Self {
        Self::ClassPath(notation)
    }
}

impl From<Dependency> for ConcreteNotation {
    fn from(dependency: Dependency) -> Self {
        Self::Dependency(dependency)
    }
}

impl From<BucketRef> for ConcreteNotation {
    fn from(bucket: BucketRef) -> Self {
        Self::Bucket(bucket)
    }
}

impl From<&str> for Notation {
    fn from(coordinates: &str) -> Self {
        Self::Concrete(coordinates.into())
    }
}

impl From<String> for Notation {
    fn from(coordinates: String) -> Self {
        Self::Concrete(coordinates.into())
    }
}

impl From<ModuleCoordinates> for Notation {
    fn from(coordinates: ModuleCoordinates) -> Self {
        Self::Concrete(coordinates.into())
    }
}

impl From<ProjectRef> for Notation {
    fn from(project: ProjectRef) -> Self {
        Self::Concrete(project.into())
    }
}

impl From<ClassPathNotation> for Notation {
    fn from(notation: ClassPathNotation) -> Self {
        Self::Concrete(notation.into())
    }
}

impl From<Dependency> for Notation {
    fn from(dependency: Dependency) -> Self {
        Self::Concrete(dependency.into())
    }
}

impl From<BucketRef> for Notation {
    fn from(bucket: BucketRef) -> Self {
        Self::Concrete(bucket.into())
    }
}
