//! Resolution of dotted paths against the entity store

use crate::convention::{ArtifactPath, ReferenceConvention};
use crate::store::EntityStore;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use xdef_model::Reference;

/// Outcome of resolving a batch of dotted paths
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolutions {
    outcomes: HashMap<ArtifactPath, Option<Reference>>,
}

impl Resolutions {
    /// Reference for `path`, if it was looked up and resolved
    #[inline]
    #[must_use]
    pub fn get(&self, path: &ArtifactPath) -> Option<&Reference> {
        self.outcomes.get(path)?.as_ref()
    }

    /// Paths that were looked up and did not resolve, sorted
    #[must_use]
    pub fn unresolved(&self) -> Vec<ArtifactPath> {
        let mut paths: Vec<_> = self
            .outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_none())
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }

    /// Number of distinct paths looked up
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True if nothing was looked up
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl FromIterator<(ArtifactPath, Option<Reference>)> for Resolutions {
    fn from_iter<I: IntoIterator<Item = (ArtifactPath, Option<Reference>)>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Turns dotted paths into references when the target entry exists
pub struct ReferenceResolver<'a> {
    convention: &'a ReferenceConvention,
    store: &'a dyn EntityStore,
}

impl<'a> ReferenceResolver<'a> {
    /// Resolver reading from `store`
    #[must_use]
    pub fn new(convention: &'a ReferenceConvention, store: &'a dyn EntityStore) -> Self {
        Self { convention, store }
    }

    /// Naming convention in use
    #[inline]
    #[must_use]
    pub fn convention(&self) -> &ReferenceConvention {
        self.convention
    }

    /// Dotted path in `text`, if it has the reference shape
    #[inline]
    #[must_use]
    pub fn parse_path(&self, text: &str) -> Option<ArtifactPath> {
        self.convention.parse_path(text)
    }

    /// Reference for `path` if its collection exists and holds the entry
    ///
    /// Never fails: a missing collection or entry yields `None` and the
    /// caller keeps the literal text.
    pub async fn resolve(&self, path: &ArtifactPath) -> Option<Reference> {
        let collection = self.convention.collection_id(path);
        let Some(artifact) = self.store.get(&collection).await else {
            tracing::debug!(%path, %collection, "reference collection not found");
            return None;
        };
        if artifact.value().get_path(&self.convention.entry_field(path)).is_none() {
            tracing::debug!(%path, %collection, "reference entry not found in collection");
            return None;
        }
        Some(Reference::new(self.convention.target(path)))
    }

    /// Resolve every distinct path, at most `concurrency` lookups at a time
    ///
    /// Returns once every lookup has completed.
    pub async fn resolve_all<I>(&self, paths: I, concurrency: usize) -> Resolutions
    where
        I: IntoIterator<Item = ArtifactPath>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<_> = paths.into_iter().filter(|p| seen.insert(p.clone())).collect();
        if unique.is_empty() {
            return Resolutions::default();
        }

        let outcomes = stream::iter(unique)
            .map(|path| async move {
                let outcome = self.resolve(&path).await;
                (path, outcome)
            })
            .buffer_unordered(concurrency.max(1))
            .collect::<HashMap<_, _>>()
            .await;
        let outcomes = Resolutions { outcomes };

        tracing::debug!(
            candidates = outcomes.len(),
            unresolved = outcomes.unresolved().len(),
            "resolved reference candidates"
        );
        outcomes
    }
}
