//! `[routes]` section configuration.
//!
//! Path segment placed between the locale prefix and the slug of each
//! collection with detail pages. Pages and index pages route directly under
//! the locale prefix and take no segment.

use super::defaults;
use crate::content::CollectionKey;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[routes]` section in folio.toml.
///
/// # Example
/// ```toml
/// [routes]
/// blog_posts = "blog"              # /fr/blog/article
/// blog_categories = "blog/categories"
/// tags = "topics"                  # /topics/rust
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RoutesConfig {
    #[serde(default = "defaults::routes::blog_posts")]
    #[educe(Default = defaults::routes::blog_posts())]
    pub blog_posts: String,

    #[serde(default = "defaults::routes::blog_categories")]
    #[educe(Default = defaults::routes::blog_categories())]
    pub blog_categories: String,

    #[serde(default = "defaults::routes::tags")]
    #[educe(Default = defaults::routes::tags())]
    pub tags: String,

    #[serde(default = "defaults::routes::guides")]
    #[educe(Default = defaults::routes::guides())]
    pub guides: String,

    #[serde(default = "defaults::routes::notes")]
    #[educe(Default = defaults::routes::notes())]
    pub notes: String,

    #[serde(default = "defaults::routes::projects")]
    #[educe(Default = defaults::routes::projects())]
    pub projects: String,
}

impl RoutesConfig {
    /// Segment for a collection, `None` for pages, index pages and
    /// collections without routes.
    pub fn segment(&self, key: CollectionKey) -> Option<&str> {
        let segment = match key {
            CollectionKey::BlogPosts => &self.blog_posts,
            CollectionKey::BlogCategories => &self.blog_categories,
            CollectionKey::Tags => &self.tags,
            CollectionKey::Guides => &self.guides,
            CollectionKey::Notes => &self.notes,
            CollectionKey::Projects => &self.projects,
            CollectionKey::Pages
            | CollectionKey::IndexPages
            | CollectionKey::Authors
            | CollectionKey::Blogroll
            | CollectionKey::Bookmarks => return None,
        };
        Some(segment.trim_matches('/'))
    }
}
