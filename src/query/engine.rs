//! Query Engine.
//!
//! # Pipeline
//!
//! ```text
//! get_collection_where() × N   drafts dropped first in production
//!          │ (concurrent, merged in request order)
//!          ▼
//! locale filter ──► tag locale swap ──► id / reference filters
//!          │
//!          ▼
//! stable sort ──► total ──► after / first ──► format
//! ```

use futures::future::try_join_all;
use serde::Serialize;

use super::{
    Format, QueryOptions,
    format::{FormattedEntry, format_entry, update_entry_tags_for_locale},
};
use crate::{
    content::{CollectionKey, ContentStore, Entry},
    error::Result,
    index::EntriesIndex,
};

/// A page of formatted entries and the number of matches before paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub entries: Vec<FormattedEntry>,
    pub total: usize,
}

/// Answers queries against a store and an entries index built from it.
#[derive(Debug)]
pub struct QueryEngine<'a, S> {
    store: &'a S,
    index: &'a EntriesIndex,
    production: bool,
}

impl<'a, S: ContentStore> QueryEngine<'a, S> {
    /// `production` drops drafts from every collection query.
    pub const fn new(store: &'a S, index: &'a EntriesIndex, production: bool) -> Self {
        Self {
            store,
            index,
            production,
        }
    }

    pub const fn index(&self) -> &'a EntriesIndex {
        self.index
    }

    pub async fn query_collection(
        &self,
        key: CollectionKey,
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        self.query_collections(&[key], options).await
    }

    /// Query the union of several collections with one filter, order and
    /// page.
    pub async fn query_collections(
        &self,
        keys: &[CollectionKey],
        options: &QueryOptions,
    ) -> Result<QueryResult> {
        let mut entries = self.fetch(keys).await?;
        let filter = &options.filter;

        entries.retain(|entry| filter.matches_locale(entry));
        if let Some(locale) = &filter.locale {
            for entry in &mut entries {
                update_entry_tags_for_locale(entry, locale, self.index);
            }
        }
        entries.retain(|entry| filter.matches_references(entry));

        options.sort(&mut entries);
        let total = entries.len();
        let entries = options
            .paginate(entries)
            .iter()
            .map(|entry| format_entry(entry, options.format, self.index))
            .collect();

        Ok(QueryResult { entries, total })
    }

    /// Fetch one entry by identity; drafts are not filtered.
    ///
    /// Fails with `EntryNotFound` when nothing has this id and with
    /// `CollectionMismatch` when it belongs to another collection.
    pub fn query_entry(
        &self,
        collection: CollectionKey,
        id: &str,
        locale: Option<&str>,
        format: Format,
    ) -> Result<FormattedEntry> {
        let mut entry = self.index.get(collection, id)?.entry.clone();
        if let Some(locale) = locale {
            update_entry_tags_for_locale(&mut entry, locale, self.index);
        }
        Ok(format_entry(&entry, format, self.index))
    }

    /// Raw entries of `keys`, in request order, drafts already gone in
    /// production.
    async fn fetch(&self, keys: &[CollectionKey]) -> Result<Vec<Entry>> {
        let mut unique = keys.to_vec();
        dedup_in_order(&mut unique);

        let production = self.production;
        let collections = try_join_all(unique.into_iter().map(|key| {
            self.store
                .get_collection_where(key, move |entry| !(production && entry.data.is_draft()))
        }))
        .await?;
        Ok(collections.into_iter().flatten().collect())
    }
}

fn dedup_in_order(keys: &mut Vec<CollectionKey>) {
    let mut seen = Vec::with_capacity(keys.len());
    keys.retain(|key| {
        let fresh = !seen.contains(key);
        seen.push(*key);
        fresh
    });
}
