//! Entry index: every entry of every collection, by id and by route.
//!
//! # Architecture
//!
//! ```text
//! ContentStore ──► get_collection() × 11 (concurrent)
//!                         │
//!                         ▼
//!                 EntriesIndex::build()
//!                   ├── route_for()   route + slug of routable entries
//!                   ├── by_id         every entry
//!                   └── by_route      routable entries only
//!                         │
//!                         ▼
//!                 IndexCache (single build, shared by reference)
//! ```
//!
//! Ids are unique across the whole store and routes are unique among
//! routable entries; a collision fails the build.

mod cache;
pub mod routing;

pub use cache::IndexCache;
pub use routing::{EntryRoute, HOME_PATH, locale_prefix, route_for};

use std::sync::Arc;

use futures::future::try_join_all;
use rustc_hash::FxHashMap;

use crate::{
    config::SiteConfig,
    content::{CollectionKey, ContentStore, Entry, Reference},
    error::{ContentError, Result},
    log,
};

/// An entry together with its derived location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEntry {
    pub entry: Entry,
    /// Set for routable collections only.
    pub route: Option<String>,
    pub slug: Option<String>,
}

impl IndexedEntry {
    pub fn new(entry: Entry, config: &SiteConfig) -> Self {
        let (route, slug) = match route_for(&entry, config) {
            Some(EntryRoute { route, slug }) => (Some(route), Some(slug)),
            None => (None, None),
        };
        Self { entry, route, slug }
    }

    pub fn title(&self) -> &str {
        self.entry.data.title()
    }
}

/// How a missing or mismatched reference is reported.
///
/// Direct lookups ask for an identity and must fail loudly; references
/// embedded in entry data may point at removed entries and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// `EntryNotFound` / `CollectionMismatch` errors.
    Strict,
    /// Missing or mismatched targets resolve to nothing.
    Lenient,
}

/// Lookup maps over every entry of the store.
#[derive(Debug, Default)]
pub struct EntriesIndex {
    by_id: FxHashMap<String, Arc<IndexedEntry>>,
    by_route: FxHashMap<String, Arc<IndexedEntry>>,
}

impl EntriesIndex {
    /// Fetch every collection concurrently and index the result.
    ///
    /// Store errors propagate untouched.
    pub async fn load<S: ContentStore>(store: &S, config: &SiteConfig) -> Result<Self> {
        let collections =
            try_join_all(CollectionKey::ALL.map(|key| store.get_collection(key))).await?;
        let index = Self::build(collections.into_iter().flatten(), config)?;
        log!("index"; "indexed {} entries, {} routes", index.len(), index.route_count());
        Ok(index)
    }

    /// Index entries, computing routes from `config`.
    pub fn build(entries: impl IntoIterator<Item = Entry>, config: &SiteConfig) -> Result<Self> {
        let mut index = Self::default();

        for entry in entries {
            let indexed = Arc::new(IndexedEntry::new(entry, config));

            if let Some(route) = &indexed.route {
                if let Some(existing) = index.by_route.get(route) {
                    return Err(ContentError::DuplicateRoute {
                        route: route.clone(),
                        first: existing.entry.id.clone(),
                        second: indexed.entry.id.clone(),
                    });
                }
                index.by_route.insert(route.clone(), Arc::clone(&indexed));
            }

            let id = indexed.entry.id.clone();
            if let Some(existing) = index.by_id.get(&id) {
                return Err(ContentError::DuplicateId {
                    id,
                    first: existing.entry.collection(),
                    second: indexed.entry.collection(),
                });
            }
            index.by_id.insert(id, indexed);
        }

        Ok(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&IndexedEntry> {
        self.by_id.get(id).map(Arc::as_ref)
    }

    pub fn by_route(&self, route: &str) -> Option<&IndexedEntry> {
        self.by_route.get(route).map(Arc::as_ref)
    }

    /// Look up `id`, expecting it to belong to `collection`.
    ///
    /// This is the [`Resolution::Strict`] policy: `EntryNotFound` when
    /// nothing has this id, `CollectionMismatch` when another collection
    /// owns it.
    pub fn get(&self, collection: CollectionKey, id: &str) -> Result<&IndexedEntry> {
        let found = self.by_id(id).ok_or_else(|| ContentError::EntryNotFound {
            collection,
            id: id.to_owned(),
        })?;
        if found.entry.collection() != collection {
            return Err(ContentError::CollectionMismatch {
                id: id.to_owned(),
                requested: collection,
                actual: found.entry.collection(),
            });
        }
        Ok(found)
    }

    /// Look up `id` under `policy`; only `Strict` ever fails.
    pub fn resolve(
        &self,
        collection: CollectionKey,
        id: &str,
        policy: Resolution,
    ) -> Result<Option<&IndexedEntry>> {
        match (self.get(collection, id), policy) {
            (Ok(found), _) => Ok(Some(found)),
            (Err(err), Resolution::Strict) => Err(err),
            (Err(_), Resolution::Lenient) => Ok(None),
        }
    }

    /// Resolve an embedded reference; dangling references yield `None`.
    pub fn resolve_reference(&self, reference: &Reference) -> Option<&IndexedEntry> {
        self.resolve(reference.collection, &reference.id, Resolution::Lenient)
            .ok()
            .flatten()
    }

    /// Every indexed entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexedEntry> {
        self.by_id.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn route_count(&self) -> usize {
        self.by_route.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MemoryStore, fixtures};
    use crate::error::StoreError;
    use std::collections::HashSet;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.i18n.locales = vec!["en".into(), "fr".into()];
        config
    }

    fn entries() -> Vec<Entry> {
        vec![
            fixtures::page("en/home", "Home"),
            fixtures::page("fr/home", "Accueil"),
            fixtures::index_page("fr/blog", "Blog"),
            fixtures::post("fr/article", "Article", "2024-01-01"),
            fixtures::tag("en/rust", "Rust"),
            fixtures::author("jane", "Jane"),
            fixtures::bookmark("rust-book", "The Book", "2024-01-01"),
        ]
    }

    #[test]
    fn test_build_indexes_by_id_and_route() {
        let index = EntriesIndex::build(entries(), &config()).unwrap();

        assert_eq!(index.len(), 7);
        assert_eq!(index.route_count(), 5);
        assert_eq!(index.by_route("/").unwrap().title(), "Home");
        assert_eq!(index.by_route("/fr").unwrap().title(), "Accueil");
        assert_eq!(index.by_route("/fr/blog/article").unwrap().entry.id, "fr/article");
        assert_eq!(index.by_id("fr/article").unwrap().slug.as_deref(), Some("article"));
    }

    #[test]
    fn test_non_routable_entries_only_by_id() {
        let index = EntriesIndex::build(entries(), &config()).unwrap();

        let author = index.by_id("jane").unwrap();
        assert_eq!(author.route, None);
        assert_eq!(author.slug, None);
        assert!(index.by_id("rust-book").is_some());
    }

    #[test]
    fn test_ids_and_routes_are_unique() {
        let index = EntriesIndex::build(entries(), &config()).unwrap();

        let ids: HashSet<_> = index.entries().map(|e| e.entry.id.as_str()).collect();
        assert_eq!(ids.len(), index.len());
        let routes: Vec<_> = index.entries().filter_map(|e| e.route.as_deref()).collect();
        let unique: HashSet<_> = routes.iter().collect();
        assert_eq!(unique.len(), routes.len());
    }

    #[test]
    fn test_duplicate_id_across_collections_fails() {
        let err = EntriesIndex::build(
            [
                fixtures::post("en/rust", "Rust post", "2024-01-01"),
                fixtures::tag("en/rust", "Rust"),
            ],
            &config(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ContentError::DuplicateId {
                first: CollectionKey::BlogPosts,
                second: CollectionKey::Tags,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_route_fails() {
        let err = EntriesIndex::build(
            [
                fixtures::page("en/blog/hello", "Page"),
                fixtures::post("en/hello", "Post", "2024-01-01"),
            ],
            &config(),
        )
        .unwrap_err();

        assert!(matches!(err, ContentError::DuplicateRoute { ref route, .. } if route == "/blog/hello"));
    }

    #[test]
    fn test_resolution_policies() {
        let index = EntriesIndex::build(entries(), &config()).unwrap();

        let found = index.resolve(CollectionKey::Tags, "en/rust", Resolution::Strict).unwrap();
        assert_eq!(found.unwrap().title(), "Rust");

        let missing = index.resolve(CollectionKey::Tags, "en/go", Resolution::Strict);
        assert!(matches!(missing, Err(ContentError::EntryNotFound { .. })));
        let mismatch = index.resolve(CollectionKey::BlogPosts, "en/rust", Resolution::Strict);
        assert!(matches!(
            mismatch,
            Err(ContentError::CollectionMismatch {
                requested: CollectionKey::BlogPosts,
                actual: CollectionKey::Tags,
                ..
            })
        ));

        assert!(index.resolve(CollectionKey::Tags, "en/go", Resolution::Lenient).unwrap().is_none());
        assert!(
            index
                .resolve(CollectionKey::BlogPosts, "en/rust", Resolution::Lenient)
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_load_from_store() {
        let store = MemoryStore::from_entries(entries());
        let index = EntriesIndex::load(&store, &config()).await.unwrap();
        assert_eq!(index.len(), 7);
    }

    struct FailingStore;

    impl ContentStore for FailingStore {
        async fn get_collection(&self, _: CollectionKey) -> Result<Vec<Entry>, StoreError> {
            Err(StoreError::Task("disk unavailable".into()))
        }

        async fn get_entry(&self, _: CollectionKey, _: &str) -> Result<Option<Entry>, StoreError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let err = EntriesIndex::load(&FailingStore, &config()).await.unwrap_err();
        assert!(matches!(err, ContentError::Store(StoreError::Task(_))));
    }
}
