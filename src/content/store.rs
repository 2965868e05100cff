//! The content store boundary.
//!
//! A [`ContentStore`] is a read-only provider of raw entries, one collection
//! at a time. The index and query layers never assume anything about where
//! entries come from: [`FsStore`](super::FsStore) reads markdown files,
//! [`MemoryStore`] holds entries in memory.

use std::future::Future;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{CollectionKey, Entry};
use crate::error::StoreError;

/// Read-only access to raw content entries.
///
/// Implementations own any timeout or retry policy; callers propagate errors
/// untouched.
pub trait ContentStore: Send + Sync {
    /// All entries of a collection, in store order.
    fn get_collection(
        &self,
        key: CollectionKey,
    ) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send;

    /// Point lookup of a single entry.
    fn get_entry(
        &self,
        key: CollectionKey,
        id: &str,
    ) -> impl Future<Output = Result<Option<Entry>, StoreError>> + Send;

    /// Entries of a collection matching `predicate`, in store order.
    fn get_collection_where<P>(
        &self,
        key: CollectionKey,
        predicate: P,
    ) -> impl Future<Output = Result<Vec<Entry>, StoreError>> + Send
    where
        P: Fn(&Entry) -> bool + Send,
    {
        async move {
            let entries = self.get_collection(key).await?;
            Ok(entries.into_iter().filter(|entry| predicate(entry)).collect())
        }
    }
}

/// In-memory content store.
///
/// Entries keep their insertion order within a collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<FxHashMap<CollectionKey, Vec<Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, grouping them by collection.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let store = Self::new();
        for entry in entries {
            store.insert(entry);
        }
        store
    }

    /// Append an entry, replacing any entry with the same id in the same
    /// collection.
    pub fn insert(&self, entry: Entry) {
        let mut collections = self.collections.write();
        let entries = collections.entry(entry.collection()).or_default();
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    pub fn len(&self) -> usize {
        self.collections.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for MemoryStore {
    async fn get_collection(&self, key: CollectionKey) -> Result<Vec<Entry>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_entry(&self, key: CollectionKey, id: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(&key)
            .and_then(|entries| entries.iter().find(|e| e.id == id).cloned()))
    }
}
