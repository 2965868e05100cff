//! Route Index and breadcrumbs.
//!
//! # Breadcrumbs
//!
//! ```text
//! /fr/blog/article          /blog/post
//!   │                         │
//!   ├── /fr       Accueil     ├── /           Home      (root crumb)
//!   ├── /fr/blog  Blog        ├── /blog       Blog
//!   └── /fr/blog/article      └── /blog/post  Post
//! ```
//!
//! Prefixes that no entry owns are skipped, and so are drafts in production,
//! matching the Route Index. A localized route starts at its locale segment;
//! any other route starts at `/`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{config::SiteConfig, index::EntriesIndex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteIndexItem {
    pub route: String,
    pub id: String,
    pub locale: Option<String>,
    pub title: String,
}

/// Every route of the site, ordered by route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteIndex {
    items: BTreeMap<String, RouteIndexItem>,
}

impl RouteIndex {
    /// Collect the routes of every routable entry. Drafts are left out in
    /// production; a repeated route keeps the last entry seen.
    pub fn build(index: &EntriesIndex, production: bool) -> Self {
        let mut items = BTreeMap::new();
        for indexed in index.entries() {
            let entry = &indexed.entry;
            if !entry.collection().is_routable() || (production && entry.data.is_draft()) {
                continue;
            }
            let Some(route) = &indexed.route else {
                continue;
            };
            items.insert(
                route.clone(),
                RouteIndexItem {
                    route: route.clone(),
                    id: entry.id.clone(),
                    locale: entry.locale.clone(),
                    title: indexed.title().to_owned(),
                },
            );
        }
        Self { items }
    }

    pub fn get(&self, route: &str) -> Option<&RouteIndexItem> {
        self.items.get(route)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteIndexItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub url: String,
}

/// `/a/b/` -> `/a/b`, `` -> `/`
fn normalize(route: &str) -> &str {
    match route.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Cumulative prefixes of a route, with `/` first unless the route starts
/// with a configured locale.
fn prefixes(route: &str, config: &SiteConfig) -> Vec<String> {
    let segments: Vec<_> = route.split('/').filter(|s| !s.is_empty()).collect();
    let localized = segments.first().is_some_and(|first| config.i18n.is_known(first));

    let mut prefixes = Vec::with_capacity(segments.len() + 1);
    if !localized {
        prefixes.push("/".to_owned());
    }
    let mut current = String::new();
    for segment in segments {
        current.push('/');
        current.push_str(segment);
        prefixes.push(current.clone());
    }
    prefixes
}

/// Breadcrumb of `route`, plus a trailing crumb labelled `pagination_label`
/// that points at `route` as given.
pub fn breadcrumb(
    index: &EntriesIndex,
    config: &SiteConfig,
    route: &str,
    pagination_label: Option<&str>,
) -> Vec<Crumb> {
    let production = config.build.mode.is_production();
    let mut crumbs: Vec<_> = prefixes(normalize(route), config)
        .into_iter()
        .filter_map(|prefix| {
            let indexed = index.by_route(&prefix)?;
            if production && indexed.entry.data.is_draft() {
                return None;
            }
            Some(Crumb {
                label: indexed.title().to_owned(),
                url: prefix,
            })
        })
        .collect();

    if let Some(label) = pagination_label {
        crumbs.push(Crumb {
            label: label.to_owned(),
            url: route.to_owned(),
        });
    }
    crumbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use crate::content::{
        Entry,
        fixtures::{self, EntryFixture},
    };

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.i18n.locales = vec!["en".into(), "fr".into()];
        config
    }

    fn index(entries: Vec<Entry>) -> EntriesIndex {
        EntriesIndex::build(entries, &config()).unwrap()
    }

    fn crumb(label: &str, url: &str) -> Crumb {
        Crumb {
            label: label.into(),
            url: url.into(),
        }
    }

    #[test]
    fn test_root_breadcrumb() {
        let index = index(vec![fixtures::page("en/home", "Home")]);
        assert_eq!(breadcrumb(&index, &config(), "/", None), [crumb("Home", "/")]);
    }

    #[test]
    fn test_localized_breadcrumb() {
        let index = index(vec![
            fixtures::page("fr/home", "Accueil"),
            fixtures::index_page("fr/blog", "Blog"),
            fixtures::post("fr/article", "Article", "2024-01-01"),
        ]);

        assert_eq!(
            breadcrumb(&index, &config(), "/fr/blog/article", None),
            [
                crumb("Accueil", "/fr"),
                crumb("Blog", "/fr/blog"),
                crumb("Article", "/fr/blog/article"),
            ]
        );
    }

    #[test]
    fn test_pagination_crumb_uses_original_route() {
        let index = index(vec![
            fixtures::page("en/home", "Home"),
            fixtures::index_page("en/blog", "Blog"),
            fixtures::post("en/post", "Post", "2024-01-01"),
        ]);

        let crumbs = breadcrumb(&index, &config(), "/blog/post/", Some("Page 2"));
        assert_eq!(
            crumbs,
            [
                crumb("Home", "/"),
                crumb("Blog", "/blog"),
                crumb("Post", "/blog/post"),
                crumb("Page 2", "/blog/post/"),
            ]
        );
    }

    #[test]
    fn test_unresolved_prefixes_are_skipped() {
        let index = index(vec![
            fixtures::page("en/home", "Home"),
            fixtures::tag("en/rust", "Rust"),
        ]);

        let crumbs = breadcrumb(&index, &config(), "/tags/rust", None);
        assert_eq!(crumbs, [crumb("Home", "/"), crumb("Rust", "/tags/rust")]);
    }

    #[test]
    fn test_draft_crumbs_hidden_in_production() {
        let index = index(vec![
            fixtures::page("en/home", "Home"),
            fixtures::index_page("en/blog", "Blog").draft(),
            fixtures::post("en/post", "Post", "2024-01-01"),
        ]);

        let mut production = config();
        production.build.mode = BuildMode::Production;
        assert_eq!(
            breadcrumb(&index, &production, "/blog/post", None),
            [crumb("Home", "/"), crumb("Post", "/blog/post")]
        );
        assert_eq!(breadcrumb(&index, &config(), "/blog/post", None).len(), 3);
    }

    #[test]
    fn test_unknown_routes() {
        let index = index(vec![fixtures::page("en/home", "Home")]);
        assert_eq!(breadcrumb(&index, &config(), "/nowhere", None), [crumb("Home", "/")]);
        assert!(breadcrumb(&index, &config(), "/fr/nowhere", None).is_empty());
    }

    #[test]
    fn test_route_index() {
        let index = index(vec![
            fixtures::page("en/home", "Home"),
            fixtures::post("fr/article", "Article", "2024-01-01"),
            fixtures::guide("en/wip", "WIP", "2024-01-01").draft(),
            fixtures::author("jane", "Jane"),
            fixtures::bookmark("book", "Book", "2024-01-01"),
        ]);

        let routes = RouteIndex::build(&index, false);
        let all: Vec<_> = routes.iter().map(|item| item.route.as_str()).collect();
        assert_eq!(all, ["/", "/fr/blog/article", "/guides/wip"]);
        let article = routes.get("/fr/blog/article").unwrap();
        assert_eq!(article.id, "fr/article");
        assert_eq!(article.locale.as_deref(), Some("fr"));
        assert_eq!(article.title, "Article");

        let production = RouteIndex::build(&index, true);
        assert_eq!(production.len(), 2);
        assert!(production.get("/guides/wip").is_none());
    }
}
