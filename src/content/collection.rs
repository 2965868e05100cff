//! The closed set of content collections and their static partitions.
//!
//! | Collection        | Localized | Routable | Listable |
//! |-------------------|-----------|----------|----------|
//! | `pages`           | yes       | yes      | no       |
//! | `index.pages`     | yes       | yes      | no       |
//! | `blog.posts`      | yes       | yes      | yes      |
//! | `blog.categories` | yes       | yes      | yes      |
//! | `tags`            | yes       | yes      | yes      |
//! | `guides`          | yes       | yes      | yes      |
//! | `notes`           | yes       | yes      | yes      |
//! | `projects`        | yes       | yes      | yes      |
//! | `bookmarks`       | no        | no       | yes      |
//! | `blogroll`        | no        | no       | yes      |
//! | `authors`         | no        | no       | no       |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Identifies a content collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollectionKey {
    #[serde(rename = "authors")]
    Authors,
    #[serde(rename = "blog.categories")]
    BlogCategories,
    #[serde(rename = "blog.posts")]
    BlogPosts,
    #[serde(rename = "blogroll")]
    Blogroll,
    #[serde(rename = "bookmarks")]
    Bookmarks,
    #[serde(rename = "guides")]
    Guides,
    #[serde(rename = "index.pages")]
    IndexPages,
    #[serde(rename = "notes")]
    Notes,
    #[serde(rename = "pages")]
    Pages,
    #[serde(rename = "projects")]
    Projects,
    #[serde(rename = "tags")]
    Tags,
}

/// Collections listed on the home page, in display order.
pub const HOME_LISTING: &[CollectionKey] = &[
    CollectionKey::BlogPosts,
    CollectionKey::Blogroll,
    CollectionKey::Bookmarks,
    CollectionKey::Guides,
    CollectionKey::Projects,
];

/// Collections whose entries carry `tags` references.
pub const TAGGED_COLLECTIONS: &[CollectionKey] = &[
    CollectionKey::BlogPosts,
    CollectionKey::Blogroll,
    CollectionKey::Bookmarks,
    CollectionKey::Guides,
    CollectionKey::Notes,
    CollectionKey::Projects,
];

impl CollectionKey {
    pub const ALL: [Self; 11] = [
        Self::Authors,
        Self::BlogCategories,
        Self::BlogPosts,
        Self::Blogroll,
        Self::Bookmarks,
        Self::Guides,
        Self::IndexPages,
        Self::Notes,
        Self::Pages,
        Self::Projects,
        Self::Tags,
    ];

    /// Name used in config files, directory names and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authors => "authors",
            Self::BlogCategories => "blog.categories",
            Self::BlogPosts => "blog.posts",
            Self::Blogroll => "blogroll",
            Self::Bookmarks => "bookmarks",
            Self::Guides => "guides",
            Self::IndexPages => "index.pages",
            Self::Notes => "notes",
            Self::Pages => "pages",
            Self::Projects => "projects",
            Self::Tags => "tags",
        }
    }

    /// Whether entries of this collection get their own page and route.
    pub const fn is_routable(self) -> bool {
        !matches!(self, Self::Authors | Self::Blogroll | Self::Bookmarks)
    }

    /// Whether entry ids carry a `{locale}/` prefix.
    pub const fn is_localized(self) -> bool {
        !matches!(self, Self::Authors | Self::Blogroll | Self::Bookmarks)
    }

    /// Whether an index page may list this collection.
    pub const fn has_listing(self) -> bool {
        !matches!(self, Self::Authors | Self::IndexPages | Self::Pages)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ContentError::UnknownCollection(s.to_owned()))
    }
}
