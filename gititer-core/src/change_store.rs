//! Typed access to the per-repository iteration state.

use crate::error::Result;
use crate::models::{non_empty, PendingChangeSet, RepositoryId};
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

pub const DEFAULT_NAMESPACE: &str = "gititer";

/// A storage key bound to the type of value stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKey<T> {
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> StoreKey<T> {
    fn new(key: String) -> Self {
        Self {
            key,
            _value: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl StoreKey<Option<String>> {
    /// Workspace-wide fallback message used while repositories are being seeded.
    pub fn initial_message(namespace: &str) -> Self {
        Self::new(format!("{namespace}:initial_message"))
    }

    pub fn iteration_message(namespace: &str, repo: &RepositoryId) -> Self {
        Self::new(format!("{namespace}:iteration_message_{repo}"))
    }
}

impl StoreKey<PendingChangeSet> {
    pub fn iteration_index(namespace: &str, repo: &RepositoryId) -> Self {
        Self::new(format!("{namespace}:iteration_index_{repo}"))
    }
}

/// Persistent mapping from repository to (pending change set, iteration message).
pub struct ChangeStore<S> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> ChangeStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Missing keys and stored `null` both read back as the default.
    pub fn get<T: DeserializeOwned + Default>(&self, key: &StoreKey<T>) -> Result<T> {
        match self.store.get_raw(key.as_str())? {
            Some(raw) => Ok(serde_json::from_str::<Option<T>>(&raw)?.unwrap_or_default()),
            None => Ok(T::default()),
        }
    }

    pub fn update<T: Serialize>(&self, key: &StoreKey<T>, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.put_raw(key.as_str(), &raw)
    }

    pub fn pending_changes(&self, repo: &RepositoryId) -> Result<PendingChangeSet> {
        self.get(&StoreKey::iteration_index(&self.namespace, repo))
    }

    pub fn set_pending_changes(
        &self,
        repo: &RepositoryId,
        changes: &PendingChangeSet,
    ) -> Result<()> {
        self.update(&StoreKey::iteration_index(&self.namespace, repo), changes)
    }

    pub fn iteration_message(&self, repo: &RepositoryId) -> Result<Option<String>> {
        let message = self.get(&StoreKey::iteration_message(&self.namespace, repo))?;
        Ok(message.and_then(non_empty))
    }

    /// An empty `message` clears it.
    pub fn set_iteration_message(&self, repo: &RepositoryId, message: &str) -> Result<()> {
        self.update(
            &StoreKey::iteration_message(&self.namespace, repo),
            &Some(message.to_string()),
        )
    }

    pub fn initial_message(&self) -> Result<Option<String>> {
        let message = self.get(&StoreKey::initial_message(&self.namespace))?;
        Ok(message.and_then(non_empty))
    }

    pub fn set_initial_message(&self, message: Option<&str>) -> Result<()> {
        self.update(
            &StoreKey::initial_message(&self.namespace),
            &message.map(str::to_string),
        )
    }
}
