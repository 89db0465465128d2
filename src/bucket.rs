//! Named dependency buckets.
//!
//! A bucket is an ordered log of entries. Each entry is either a dependency
//! that is already known, or a producer registered with
//! [`DependencyBucket::add_later`] that will yield one when the bucket
//! resolves its pending entries.
//!
//! Resolution is an explicit, synchronous pass
//! ([`DependencyBucket::resolve_pending`]) that runs every producer in
//! registration order and stores its result in the producer's own slot, so
//! the resolved bucket lists dependencies in declaration order with eager and
//! deferred declarations interleaved exactly as they were made.
//!
//! Producers are `FnOnce`: each one runs at most once, and resolving an
//! already resolved bucket does nothing.

use std::fmt;

use tracing::{trace, warn};

use crate::dependency::Dependency;
use crate::notation::BucketRef;

type Producer = Box<dyn FnOnce() -> anyhow::Result<Dependency> + Send + Sync>;

enum Entry {
    Resolved(Dependency),
    Pending { description: String, producer: Producer },
}

/// A named, ordered collection of dependencies belonging to one component.
pub struct DependencyBucket {
    name: String,
    extends_from: Vec<String>,
    entries: Vec<Entry>,
}

impl DependencyBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends_from: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A notation referring to this whole bucket.
    pub fn reference(&self) -> BucketRef {
        BucketRef::new(&self.name)
    }

    /// Make this bucket inherit every dependency of `parent`.
    ///
    /// Only the relation is recorded; walking it is up to whoever resolves the
    /// dependency graph. Self-inheritance and repeated calls are ignored.
    pub fn extend_from(&mut self, parent: &DependencyBucket) {
        if parent.name != self.name && !self.extends_from.contains(&parent.name) {
            trace!("Bucket '{}' now extends '{}'", self.name, parent.name);
            self.extends_from.push(parent.name.clone());
        }
    }

    /// Names of the buckets this one inherits from, in the order they were added.
    pub fn extends_from(&self) -> &[String] {
        &self.extends_from
    }

    /// Append a dependency.
    pub fn add(&mut self, dependency: Dependency) {
        trace!("Adding {} to '{}'", dependency, self.name);
        self.entries.push(Entry::Resolved(dependency));
    }

    /// Register a producer to run when pending entries are resolved.
    ///
    /// Registration never runs the producer.
    pub fn add_later(
        &mut self,
        description: impl Into<String>,
        producer: impl FnOnce() -> anyhow::Result<Dependency> + Send + Sync + 'static,
    ) {
        let description = description.into();
        trace!("Registering deferred '{}' on '{}'", description, self.name);
        self.entries.push(Entry::Pending {
            description,
            producer: Box::new(producer),
        });
    }

    /// Resolved dependencies in declaration order. Pending entries are skipped.
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Resolved(dependency) => Some(dependency),
            Entry::Pending { .. } => None,
        })
    }

    /// Number of resolved dependencies.
    pub fn len(&self) -> usize {
        self.dependencies().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of producers not yet run.
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|entry| matches!(entry, Entry::Pending { .. })).count()
    }

    /// Run every pending producer in registration order.
    ///
    /// Returns how many dependencies were produced. A failing producer is
    /// consumed and dropped, its error returned unchanged, and the producers
    /// after it stay pending.
    pub fn resolve_pending(&mut self) -> anyhow::Result<usize> {
        let mut resolved = 0;
        let mut entries = std::mem::take(&mut self.entries).into_iter();

        while let Some(entry) = entries.next() {
            match entry {
                Entry::Resolved(dependency) => self.entries.push(Entry::Resolved(dependency)),
                Entry::Pending { description, producer } => match producer() {
                    Ok(dependency) => {
                        trace!(
                            "Resolved deferred '{}' on '{}' to {}",
                            description, self.name, dependency
                        );
                        self.entries.push(Entry::Resolved(dependency));
                        resolved += 1;
                    }
                    Err(error) => {
                        warn!("Deferred '{}' on '{}' failed: {}", description, self.name, error);
                        self.entries.extend(entries);
                        return Err(error);
                    }
                },
            }
        }

        Ok(resolved)
    }
}

impl fmt::Debug for DependencyBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyBucket")
            .field("name", &self.name)
            .field("extends_from", &self.extends_from)
            .field("dependencies", &self.dependencies().collect::<Vec<_>>())
            .field("pending", &self.pending_count())
            .finish()
    }
}
