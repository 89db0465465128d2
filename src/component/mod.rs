//! Declaring dependencies of a component.
//!
//! [`ComponentDependencies`] owns the four buckets of a JVM-style component
//! and routes every declaration according to
//! [`classify`](crate::notation::classify):
//!
//! | Strategy | What happens at declaration time |
//! |---|---|
//! | `Eager` | the dependency is created and appended |
//! | `Bundle` | the bundle provider is forced and each element appended, in order |
//! | `Deferred` | a producer is registered; nothing is appended |
//!
//! Deferred producers run when [`ComponentDependencies::resolve_pending`] (or
//! [`DependencyBucket::resolve_pending`]) is called.
//!
//! # Examples
//!
//! ```rust
//! use component_deps::component::{BucketRole, ComponentDependencies};
//! use component_deps::notation::{ConcreteNotation, Notation};
//!
//! let mut deps = ComponentDependencies::new();
//! deps.implementation("g:lib:1.0").unwrap();
//! deps.runtime_only(Notation::deferred("x", || Ok(ConcreteNotation::from("g:x:3")))).unwrap();
//!
//! assert_eq!(deps.bucket(BucketRole::RuntimeOnly).len(), 0);
//! deps.resolve_pending().unwrap();
//! assert_eq!(deps.bucket(BucketRole::RuntimeOnly).len(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::bucket::DependencyBucket;
use crate::core::DepsError;
use crate::dependency::{
    Bundle, ClassPathNotation, Customizer, Dependency, DependencyFactory, customizer,
    with_test_fixtures,
};
use crate::notation::{ConcreteNotation, Notation, ProjectRef, Provider, Route};

/// The buckets every component has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketRole {
    /// Needed to compile and at runtime
    Implementation,
    /// Needed to compile only
    CompileOnly,
    /// Needed at runtime only
    RuntimeOnly,
    /// Annotation processors run by the compiler
    AnnotationProcessor,
}

impl BucketRole {
    pub const ALL: [Self; 4] = [
        Self::Implementation,
        Self::CompileOnly,
        Self::RuntimeOnly,
        Self::AnnotationProcessor,
    ];

    /// Default bucket name for this role.
    pub const fn bucket_name(self) -> &'static str {
        match self {
            Self::Implementation => "implementation",
            Self::CompileOnly => "compileOnly",
            Self::RuntimeOnly => "runtimeOnly",
            Self::AnnotationProcessor => "annotationProcessor",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Implementation => 0,
            Self::CompileOnly => 1,
            Self::RuntimeOnly => 2,
            Self::AnnotationProcessor => 3,
        }
    }
}

impl fmt::Display for BucketRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket_name())
    }
}

impl FromStr for BucketRole {
    type Err = DepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|role| role.bucket_name() == s).ok_or_else(|| {
            DepsError::UnknownBucket {
                name: s.to_string(),
            }
        })
    }
}

/// The dependency buckets of one component plus the declaration entry points.
#[derive(Debug)]
pub struct ComponentDependencies {
    buckets: [DependencyBucket; 4],
    factory: DependencyFactory,
}

impl Default for ComponentDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDependencies {
    /// Buckets named after their roles.
    pub fn new() -> Self {
        Self::with_buckets(
            DependencyBucket::new(BucketRole::Implementation.bucket_name()),
            DependencyBucket::new(BucketRole::CompileOnly.bucket_name()),
            DependencyBucket::new(BucketRole::RuntimeOnly.bucket_name()),
            DependencyBucket::new(BucketRole::AnnotationProcessor.bucket_name()),
        )
    }

    /// Use buckets supplied by the owning component, e.g. `testImplementation`.
    pub fn with_buckets(
        implementation: DependencyBucket,
        compile_only: DependencyBucket,
        runtime_only: DependencyBucket,
        annotation_processor: DependencyBucket,
    ) -> Self {
        Self {
            buckets: [implementation, compile_only, runtime_only, annotation_processor],
            factory: DependencyFactory::new(),
        }
    }

    pub fn bucket(&self, role: BucketRole) -> &DependencyBucket {
        &self.buckets[role.index()]
    }

    pub fn bucket_mut(&mut self, role: BucketRole) -> &mut DependencyBucket {
        &mut self.buckets[role.index()]
    }

    /// Hand the populated buckets back to the owner, in [`BucketRole::ALL`] order.
    pub fn into_buckets(self) -> [DependencyBucket; 4] {
        self.buckets
    }

    pub fn implementation(&mut self, notation: impl Into<Notation>) -> anyhow::Result<()> {
        self.add(BucketRole::Implementation, notation, None)
    }

    pub fn implementation_with(
        &mut self,
        notation: impl Into<Notation>,
        configure: impl Fn(&mut Dependency) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> anyhow::Result<()> {
        self.add(BucketRole::Implementation, notation, Some(customizer(configure)))
    }

    pub fn compile_only(&mut self, notation: impl Into<Notation>) -> anyhow::Result<()> {
        self.add(BucketRole::CompileOnly, notation, None)
    }

    pub fn compile_only_with(
        &mut self,
        notation: impl Into<Notation>,
        configure: impl Fn(&mut Dependency) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> anyhow::Result<()> {
        self.add(BucketRole::CompileOnly, notation, Some(customizer(configure)))
    }

    pub fn runtime_only(&mut self, notation: impl Into<Notation>) -> anyhow::Result<()> {
        self.add(BucketRole::RuntimeOnly, notation, None)
    }

    pub fn runtime_only_with(
        &mut self,
        notation: impl Into<Notation>,
        configure: impl Fn(&mut Dependency) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> anyhow::Result<()> {
        self.add(BucketRole::RuntimeOnly, notation, Some(customizer(configure)))
    }

    pub fn annotation_processor(&mut self, notation: impl Into<Notation>) -> anyhow::Result<()> {
        self.add(BucketRole::AnnotationProcessor, notation, None)
    }

    pub fn annotation_processor_with(
        &mut self,
        notation: impl Into<Notation>,
        configure: impl Fn(&mut Dependency) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> anyhow::Result<()> {
        self.add(BucketRole::AnnotationProcessor, notation, Some(customizer(configure)))
    }

    /// Declare `notation` in the bucket for `role`.
    ///
    /// # Errors
    ///
    /// Eager and bundle declarations report failures here. Deferred
    /// declarations report them from [`resolve_pending`](Self::resolve_pending).
    pub fn add(
        &mut self,
        role: BucketRole,
        notation: impl Into<Notation>,
        customizer: Option<Customizer>,
    ) -> anyhow::Result<()> {
        let route = notation.into().route();
        let bucket_name = self.bucket(role).name().to_string();
        debug!("Declaring {:?} notation in '{}'", route.strategy(), bucket_name);

        match route {
            Route::Eager(concrete) => {
                let dependency =
                    create_checked(self.factory, &bucket_name, concrete, customizer.as_ref())?;
                self.bucket_mut(role).add(dependency);
            }
            Route::Bundle(provider) => {
                let dependencies = self.expand_bundle(&provider, customizer.as_ref())?;
                let bucket = self.bucket_mut(role);
                for dependency in dependencies {
                    bucket.add(dependency);
                }
            }
            Route::Deferred(provider) => self.bind_lazy(role, provider, customizer),
        }
        Ok(())
    }

    /// Force a bundle provider and create one dependency per element.
    ///
    /// All elements are validated and created before anything is appended, so
    /// a bad element leaves the bucket untouched.
    fn expand_bundle(
        &self,
        provider: &Provider<Bundle>,
        customizer: Option<&Customizer>,
    ) -> anyhow::Result<Vec<Dependency>> {
        let bundle = provider.get()?;
        debug!("Expanding bundle '{}' with {} element(s)", bundle.alias(), bundle.len());

        for (position, element) in bundle.iter().enumerate() {
            if let Err(error) = element.coordinates().validate() {
                let reason = match error {
                    DepsError::InvalidCoordinates { reason, .. } => reason,
                    other => other.to_string(),
                };
                return Err(DepsError::InvalidBundleElement {
                    bundle: bundle.alias().to_string(),
                    position,
                    reason,
                }
                .into());
            }
        }

        bundle
            .into_iter()
            .map(|element| self.factory.create(element.into(), customizer))
            .collect()
    }

    /// Register a producer that forces `provider` when the bucket resolves.
    fn bind_lazy(
        &mut self,
        role: BucketRole,
        provider: Provider<ConcreteNotation>,
        customizer: Option<Customizer>,
    ) {
        let factory = self.factory;
        let bucket = self.bucket_mut(role);
        let bucket_name = bucket.name().to_string();
        let description = provider.description().to_string();

        bucket.add_later(description, move || {
            let notation = provider.get()?;
            create_checked(factory, &bucket_name, notation, customizer.as_ref())
        });
    }

    /// Run the deferred producers of every bucket.
    ///
    /// Stops at the first failing bucket; returns the number of dependencies produced.
    pub fn resolve_pending(&mut self) -> anyhow::Result<usize> {
        let mut resolved = 0;
        for bucket in &mut self.buckets {
            resolved += bucket.resolve_pending()?;
        }
        debug!("Resolved {} deferred dependencies", resolved);
        Ok(resolved)
    }

    /// A dependency on the build tool's plugin API.
    pub fn build_api(&self) -> Dependency {
        Dependency::class_path(ClassPathNotation::BuildApi)
    }

    /// A dependency on the build tool's functional testing kit.
    pub fn test_kit(&self) -> Dependency {
        Dependency::class_path(ClassPathNotation::TestKit)
    }

    /// A dependency on the Groovy runtime bundled with the build tool.
    pub fn local_groovy(&self) -> Dependency {
        Dependency::class_path(ClassPathNotation::LocalGroovy)
    }

    /// Request the test-fixtures variant of `dependency`.
    ///
    /// See [`with_test_fixtures`]; the result is meant to be declared with
    /// one of the bucket methods.
    pub fn test_fixtures(&self, dependency: Dependency) -> anyhow::Result<Dependency> {
        Ok(with_test_fixtures(dependency)?)
    }

    /// Request the test-fixtures variant of a sibling project.
    pub fn project_test_fixtures(&self, project: &ProjectRef) -> anyhow::Result<Dependency> {
        let dependency = self.factory.create(project.clone().into(), None)?;
        self.test_fixtures(dependency)
    }
}

/// Create a dependency for `bucket_name`, rejecting bucket references first.
fn create_checked(
    factory: DependencyFactory,
    bucket_name: &str,
    notation: ConcreteNotation,
    customizer: Option<&Customizer>,
) -> anyhow::Result<Dependency> {
    if let Some(bucket) = notation.as_bucket() {
        return Err(DepsError::BucketAsDependency {
            bucket: bucket.name().to_string(),
            target: bucket_name.to_string(),
        }
        .into());
    }
    factory.create(notation, customizer)
}

#[cfg(test)]
mod tests;
