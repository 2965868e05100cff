//! Listing pages and their related entries.
//!
//! | Collection         | Pageable                    | Related entries                       |
//! |--------------------|-----------------------------|---------------------------------------|
//! | `blog.categories`  | always                      | `blog.posts` in this category         |
//! | `tags`             | always                      | every tagged collection with this tag |
//! | `index.pages`      | if the id names a listing   | the named collection(s), same locale  |
//! | `pages`            | if the id names a listing   | the named collection(s), same locale  |
//! | anything else      | never                       |                                       |
//!
//! A listing name is the entry path (no locale, no collection segment) with
//! `/` replaced by `.`, so `en/index.pages/blog/posts` lists `blog.posts`. `home` lists [`HOME_LISTING`].

use serde::Serialize;

use crate::{
    content::{CollectionKey, ContentStore, Entry, HOME_LISTING, TAGGED_COLLECTIONS},
    error::{ContentError, Result},
    index::HOME_PATH,
    query::{Format, FormattedEntry, OrderBy, QueryEngine, QueryOptions, format_entry},
};

/// Listing names an index page or page may carry.
const LISTING_NAMES: &[&str] = &[
    "blog.categories",
    "blog.posts",
    "blogroll",
    "bookmarks",
    "guides",
    "home",
    "notes",
    "projects",
    "tags",
];

/// The collection(s) shown on a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    One(CollectionKey),
    Many(&'static [CollectionKey]),
}

impl Listing {
    pub fn keys(&self) -> &[CollectionKey] {
        match self {
            Self::One(key) => std::slice::from_ref(key),
            Self::Many(keys) => keys,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Related {
    pub collection: Listing,
    pub entries: Vec<FormattedEntry>,
    pub total: usize,
}

/// A listing page with its related entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedPage {
    #[serde(flatten)]
    pub page: FormattedEntry,
    pub related: Related,
}

/// Format and pagination of [`add_related_items_to_page`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelatedOptions {
    pub format: Format,
    pub first: Option<usize>,
    pub after: usize,
}

fn listing_name(entry: &Entry) -> String {
    entry.path().replace('/', ".")
}

pub fn is_pageable_entry(entry: &Entry) -> bool {
    match entry.collection() {
        CollectionKey::BlogCategories | CollectionKey::Tags => true,
        CollectionKey::IndexPages | CollectionKey::Pages => {
            LISTING_NAMES.contains(&listing_name(entry).as_str())
        }
        CollectionKey::Authors
        | CollectionKey::BlogPosts
        | CollectionKey::Blogroll
        | CollectionKey::Bookmarks
        | CollectionKey::Guides
        | CollectionKey::Notes
        | CollectionKey::Projects => false,
    }
}

/// The collection(s) listed by an index page or page.
pub fn displayed_collections(entry: &Entry) -> Result<Listing> {
    if !matches!(entry.collection(), CollectionKey::IndexPages | CollectionKey::Pages) {
        return Err(ContentError::NotPageable {
            collection: entry.collection(),
            id: entry.id.clone(),
        });
    }

    let name = listing_name(entry);
    if name == HOME_PATH {
        return Ok(Listing::Many(HOME_LISTING));
    }

    let key: CollectionKey = name.parse().map_err(|_| ContentError::NoListing {
        id: entry.id.clone(),
        name: name.clone(),
    })?;
    if !key.has_listing() {
        return Err(ContentError::NotListable(key));
    }
    Ok(Listing::One(key))
}

/// Attach the related entries of a pageable entry, newest first.
///
/// Entries that are not pageable fail with `NotPageable`, `NoListing` or
/// `NotListable`; check [`is_pageable_entry`] first.
pub async fn add_related_items_to_page<S: ContentStore>(
    engine: &QueryEngine<'_, S>,
    entry: &Entry,
    options: RelatedOptions,
) -> Result<EnrichedPage> {
    let mut query = QueryOptions::new()
        .order_by(OrderBy::latest())
        .after(options.after)
        .format(options.format);
    if let Some(first) = options.first {
        query = query.first(first);
    }

    let (listing, query) = match entry.collection() {
        CollectionKey::BlogCategories => (
            Listing::One(CollectionKey::BlogPosts),
            query.categories([entry.id.as_str()]),
        ),
        CollectionKey::Tags => (
            Listing::Many(TAGGED_COLLECTIONS),
            query.tags([entry.id.as_str()]),
        ),
        CollectionKey::IndexPages | CollectionKey::Pages => {
            let listing = displayed_collections(entry)?;
            let query = match &entry.locale {
                Some(locale) => query.locale(locale.as_str()),
                None => query,
            };
            (listing, query)
        }
        collection @ (CollectionKey::Authors
        | CollectionKey::BlogPosts
        | CollectionKey::Blogroll
        | CollectionKey::Bookmarks
        | CollectionKey::Guides
        | CollectionKey::Notes
        | CollectionKey::Projects) => {
            return Err(ContentError::NotPageable {
                collection,
                id: entry.id.clone(),
            });
        }
    };

    let result = engine.query_collections(listing.keys(), &query).await?;
    Ok(EnrichedPage {
        page: format_entry(entry, options.format, engine.index()),
        related: Related {
            collection: listing,
            entries: result.entries,
            total: result.total,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{
        MemoryStore,
        fixtures::{self, EntryFixture},
    };
    use crate::index::EntriesIndex;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.i18n.locales = vec!["en".into(), "fr".into()];
        config
    }

    #[test]
    fn test_pageable_collections() {
        assert!(is_pageable_entry(&fixtures::category("en/tech", "Tech")));
        assert!(is_pageable_entry(&fixtures::tag("en/rust", "Rust")));
        assert!(is_pageable_entry(&fixtures::index_page("en/blog/posts", "Posts")));
        assert!(is_pageable_entry(&fixtures::index_page("en/index.pages/blog/posts", "Posts")));
        assert!(is_pageable_entry(&fixtures::page("fr/home", "Accueil")));
        assert!(!is_pageable_entry(&fixtures::page("en/about", "About")));
        assert!(!is_pageable_entry(&fixtures::post("en/hello", "Hello", "2024-01-01")));
        assert!(!is_pageable_entry(&fixtures::author("jane", "Jane")));
    }

    #[test]
    fn test_home_lists_fixed_collections_in_order() {
        let listing = displayed_collections(&fixtures::index_page("en/home", "Home")).unwrap();
        let names: Vec<_> = listing.keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["blog.posts", "blogroll", "bookmarks", "guides", "projects"]);
        assert_eq!(
            serde_json::to_value(listing).unwrap(),
            serde_json::json!(["blog.posts", "blogroll", "bookmarks", "guides", "projects"])
        );
    }

    #[test]
    fn test_listing_from_nested_id() {
        let listing = displayed_collections(&fixtures::index_page("fr/blog/posts", "Articles"));
        assert_eq!(listing.unwrap(), Listing::One(CollectionKey::BlogPosts));
        let json = serde_json::to_value(Listing::One(CollectionKey::Guides)).unwrap();
        assert_eq!(json, "guides");
    }

    #[test]
    fn test_listing_errors() {
        let unknown = displayed_collections(&fixtures::page("en/about", "About"));
        assert!(matches!(unknown, Err(ContentError::NoListing { ref name, .. }) if name == "about"));

        let recursive = displayed_collections(&fixtures::index_page("en/authors", "Authors"));
        assert!(matches!(recursive, Err(ContentError::NotListable(CollectionKey::Authors))));

        let wrong = displayed_collections(&fixtures::tag("en/rust", "Rust"));
        assert!(matches!(wrong, Err(ContentError::NotPageable { .. })));
    }

    fn content() -> Vec<Entry> {
        vec![
            fixtures::index_page("en/home", "Home"),
            fixtures::index_page("fr/blog/posts", "Articles"),
            fixtures::category("en/tech", "Tech"),
            fixtures::tag("en/rust", "Rust"),
            fixtures::post("en/old", "Old", "2024-01-01")
                .with_meta(|m| m.category = Some("en/tech".into()))
                .tagged(&["en/rust"]),
            fixtures::post("en/new", "New", "2024-05-01")
                .with_meta(|m| m.category = Some("en/tech".into())),
            fixtures::post("fr/article", "Article", "2024-03-01"),
            fixtures::bookmark("book", "Book", "2024-02-01").tagged(&["en/rust"]),
            fixtures::guide("en/setup", "Setup", "2024-04-01"),
            fixtures::note("en/til", "TIL", "2024-06-01"),
        ]
    }

    async fn enrich(id: &str, options: RelatedOptions) -> Result<EnrichedPage> {
        let entries = content();
        let index = EntriesIndex::build(entries.clone(), &config()).unwrap();
        let store = MemoryStore::from_entries(entries);
        let engine = QueryEngine::new(&store, &index, false);
        let page = index.by_id(id).unwrap().entry.clone();
        add_related_items_to_page(&engine, &page, options).await
    }

    fn related_ids(page: &EnrichedPage) -> Vec<&str> {
        page.related.entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_category_lists_its_posts() {
        let page = enrich("en/tech", RelatedOptions::default()).await.unwrap();
        assert_eq!(page.related.collection, Listing::One(CollectionKey::BlogPosts));
        assert_eq!(related_ids(&page), ["en/new", "en/old"]);
        assert_eq!(page.page.title, "Tech");
    }

    #[tokio::test]
    async fn test_tag_lists_every_tagged_collection() {
        let page = enrich("en/rust", RelatedOptions::default()).await.unwrap();
        assert_eq!(page.related.collection, Listing::Many(TAGGED_COLLECTIONS));
        assert_eq!(related_ids(&page), ["book", "en/old"]);
    }

    #[tokio::test]
    async fn test_home_lists_same_locale_and_locale_free() {
        let page = enrich("en/home", RelatedOptions::default()).await.unwrap();
        // notes are not part of the home listing, fr/article is another locale
        assert_eq!(related_ids(&page), ["en/new", "en/setup", "book", "en/old"]);
        assert_eq!(page.related.total, 4);
    }

    #[tokio::test]
    async fn test_related_pagination() {
        let options = RelatedOptions {
            first: Some(1),
            after: 1,
            ..Default::default()
        };
        let page = enrich("en/home", options).await.unwrap();
        assert_eq!(related_ids(&page), ["en/setup"]);
        assert_eq!(page.related.total, 4);
    }

    #[tokio::test]
    async fn test_nested_index_page() {
        let page = enrich("fr/blog/posts", RelatedOptions::default()).await.unwrap();
        assert_eq!(related_ids(&page), ["fr/article"]);
    }

    #[tokio::test]
    async fn test_not_pageable_entry_fails() {
        let err = enrich("en/setup", RelatedOptions::default()).await.unwrap_err();
        assert!(matches!(err, ContentError::NotPageable { .. }));
    }

    #[tokio::test]
    async fn test_serialized_page_is_flat() {
        let page = enrich("en/tech", RelatedOptions::default()).await.unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["title"], "Tech");
        assert_eq!(json["related"]["collection"], "blog.posts");
        assert_eq!(json["related"]["total"], 2);
    }
}
