//! The composition root: a content store, its configuration and the caches
//! built over it.
//!
//! Both indexes are built on first use and shared until [`Site::invalidate`].

use std::sync::Arc;

use crate::{
    config::SiteConfig,
    content::{CollectionKey, ContentStore, Entry},
    error::Result,
    index::{EntriesIndex, IndexCache},
    log,
    pageable::{self, EnrichedPage, RelatedOptions},
    query::{Format, FormattedEntry, QueryEngine, QueryOptions, QueryResult},
    routes::{self, Crumb, RouteIndex},
};

pub struct Site<S> {
    store: S,
    config: SiteConfig,
    entries: IndexCache<EntriesIndex>,
    routes: IndexCache<RouteIndex>,
}

impl<S: ContentStore> Site<S> {
    pub fn new(store: S, config: SiteConfig) -> Self {
        Self {
            store,
            config,
            entries: IndexCache::new(),
            routes: IndexCache::new(),
        }
    }

    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    fn production(&self) -> bool {
        self.config.build.mode.is_production()
    }

    /// The entries index, built once; a failed build is retried on the next
    /// call.
    pub async fn entries_index(&self) -> Result<Arc<EntriesIndex>> {
        self.entries
            .get_or_try_build(|| EntriesIndex::load(&self.store, &self.config))
            .await
    }

    pub async fn route_index(&self) -> Result<Arc<RouteIndex>> {
        let index = self.entries_index().await?;
        let production = self.production();
        self.routes
            .get_or_try_build(|| async move {
                let routes = RouteIndex::build(&index, production);
                log!("routes"; "indexed {} routes", routes.len());
                Ok(routes)
            })
            .await
    }

    /// Drop both indexes; the next query rebuilds them from the store.
    pub fn invalidate(&self) {
        self.entries.invalidate();
        self.routes.invalidate();
        log!("index"; "cache cleared");
    }

    pub async fn query_collection(
        &self,
        key: CollectionKey,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        self.query_collections(&[key], options).await
    }

    pub async fn query_collections(
        &self,
        keys: &[CollectionKey],
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        let index = self.entries_index().await?;
        QueryEngine::new(&self.store, &index, self.production())
            .query_collections(keys, options)
            .await
    }

    pub async fn query_entry(
        &self,
        collection: CollectionKey,
        id: &str,
        locale: Option<&str>,
        format: Format,
    ) -> Result<FormattedEntry> {
        let index = self.entries_index().await?;
        QueryEngine::new(&self.store, &index, self.production())
            .query_entry(collection, id, locale, format)
    }

    pub async fn breadcrumb(&self, route: &str, pagination_label: Option<&str>) -> Result<Vec<Crumb>> {
        let index = self.entries_index().await?;
        Ok(routes::breadcrumb(&index, &self.config, route, pagination_label))
    }

    pub async fn add_related_items_to_page(
        &self,
        entry: &Entry,
        options: RelatedOptions,
    ) -> Result<EnrichedPage> {
        let index = self.entries_index().await?;
        let engine = QueryEngine::new(&self.store, &index, self.production());
        pageable::add_related_items_to_page(&engine, entry, options).await
    }

    /// Raw entry by identity, for callers that need the unformatted data.
    pub async fn entry(&self, collection: CollectionKey, id: &str) -> Result<Entry> {
        let index = self.entries_index().await?;
        Ok(index.get(collection, id)?.entry.clone())
    }
}
