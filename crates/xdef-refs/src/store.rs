//! Read-only access to fetched artifacts

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use xdef_model::{Artifact, ElemPath};

/// Async key → artifact lookup
///
/// Implementations are owned by the surrounding tool; the codec only reads.
/// A lookup that fails for any reason reports `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Artifact with the given fully qualified id
    async fn get(&self, id: &ElemPath) -> Option<Arc<Artifact>>;
}

/// Entity store held in memory
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    artifacts: DashMap<ElemPath, Arc<Artifact>>,
}

impl InMemoryEntityStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an artifact, returning the previous one
    pub fn insert(&self, artifact: Artifact) -> Option<Arc<Artifact>> {
        self.artifacts.insert(artifact.id().clone(), Arc::new(artifact))
    }

    /// Remove an artifact
    pub fn remove(&self, id: &ElemPath) -> Option<Arc<Artifact>> {
        self.artifacts.remove(id).map(|(_, artifact)| artifact)
    }

    /// Number of artifacts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// True if the store holds nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FromIterator<Artifact> for InMemoryEntityStore {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        let store = Self::new();
        for artifact in iter {
            store.insert(artifact);
        }
        store
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn get(&self, id: &ElemPath) -> Option<Arc<Artifact>> {
        self.artifacts.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xdef_model::Value;

    fn artifact(name: &str) -> Artifact {
        let id: ElemPath = format!("netsuite.translationcollection.instance.{name}")
            .parse()
            .unwrap();
        Artifact::new(id, "translationcollection", Value::empty_object())
    }

    #[tokio::test]
    async fn insert_get_remove() {
        let store = InMemoryEntityStore::new();
        assert!(store.is_empty());

        let a = artifact("custcollectiontranslations_a");
        let id = a.id().clone();
        assert!(store.insert(a.clone()).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).await.as_deref(), Some(&a));

        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn collect_from_iterator() {
        let store: InMemoryEntityStore = ["custcollectiontranslations_a", "custcollectiontranslations_b"]
            .into_iter()
            .map(artifact)
            .collect();
        assert_eq!(store.len(), 2);
    }
}
