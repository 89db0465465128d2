//! Deferred values.
//!
//! A [`Provider`] wraps a computation that is only run when the value is
//! forced with [`Provider::get`]. The element type is part of the provider's
//! type, so a `Provider<Bundle>` is statically known to produce a bundle.
//!
//! Forcing is expected to be cheap and free of side effects besides producing
//! the value; nothing here caches results.

use std::fmt;
use std::sync::Arc;

use super::ConcreteNotation;
use crate::dependency::Bundle;

type Compute<T> = Arc<dyn Fn() -> anyhow::Result<T> + Send + Sync>;

/// A value computed on demand.
pub struct Provider<T> {
    description: String,
    compute: Compute<T>,
}

impl<T: 'static> Provider<T> {
    /// Create a provider from a computation.
    pub fn new(
        description: impl Into<String>,
        compute: impl Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            compute: Arc::new(compute),
        }
    }

    /// A provider of an already known value.
    pub fn of(value: T) -> Self
    where
        T: Clone + fmt::Display + Send + Sync,
    {
        let description = value.to_string();
        Self::new(description, move || Ok(value.clone()))
    }

    /// Force the value.
    pub fn get(&self) -> anyhow::Result<T> {
        (self.compute)()
    }

    /// Derive a provider whose value is computed from this one when forced.
    pub fn map<U: 'static>(
        &self,
        transform: impl Fn(T) -> anyhow::Result<U> + Send + Sync + 'static,
    ) -> Provider<U> {
        let source = Arc::clone(&self.compute);
        Provider {
            description: self.description.clone(),
            compute: Arc::new(move || transform(source()?)),
        }
    }

    /// Human-readable label used in logs.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("description", &self.description).finish_non_exhaustive()
    }
}

/// What a [`ProviderConvertible`] unwraps to.
#[derive(Debug, Clone)]
pub enum ProviderNotation {
    /// A provider statically known to produce a bundle.
    Bundle(Provider<Bundle>),
    /// A provider of a single notation.
    Single(Provider<ConcreteNotation>),
}

/// A value that can stand in for a provider, such as a catalog accessor.
///
/// Conversion yields a provider, never another convertible, so a single
/// unwrap step is always enough.
pub trait ProviderConvertible: fmt::Debug + Send + Sync {
    fn as_provider(&self) -> ProviderNotation;
}
