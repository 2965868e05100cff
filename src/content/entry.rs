//! Content entries and their per-collection payloads.
//!
//! An [`Entry`] never stores its collection separately: the collection is
//! the discriminant of [`EntryData`], so payload shape and collection cannot
//! disagree.

use std::{collections::BTreeMap, fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::CollectionKey;

// ============================================================================
// Timestamp
// ============================================================================

/// A publication or update date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 with an offset
/// (normalized to UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub const fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    pub const fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// `YYYY-MM-DD`, as used by sitemaps.
    pub fn ymd(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date.and_time(chrono::NaiveTime::MIN)));
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self(datetime));
        }
        DateTime::parse_from_rfc3339(s).map(|dt| Self(dt.naive_utc()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.time() == chrono::NaiveTime::MIN {
            write!(f, "{}", self.0.format("%Y-%m-%d"))
        } else {
            write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Shared payload pieces
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub nofollow: bool,
    #[serde(default)]
    pub noindex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Meta block of pages, index pages, categories and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageMeta {
    pub published_on: Timestamp,
    pub updated_on: Option<Timestamp>,
    #[serde(default)]
    pub is_draft: bool,
}

/// Meta block of blog posts, guides, notes and projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticleMeta {
    pub published_on: Timestamp,
    pub updated_on: Option<Timestamp>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub authors: Vec<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Meta block of bookmarks and blogroll entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkMeta {
    pub published_on: Timestamp,
    pub updated_on: Option<Timestamp>,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ============================================================================
// Per-collection payloads
// ============================================================================

/// `pages`, `index.pages` and `blog.categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub seo: Option<Seo>,
    pub cover: Option<Image>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub seo: Option<Seo>,
    pub meta: PageMeta,
    /// Same tag in other locales: `locale -> tag id`.
    #[serde(default)]
    pub i18n: BTreeMap<String, String>,
}

/// `blog.posts`, `guides` and `notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArticleData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub seo: Option<Seo>,
    pub cover: Option<Image>,
    pub meta: ArticleMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub seo: Option<Seo>,
    pub cover: Option<Image>,
    pub repository: Option<String>,
    pub meta: ArticleMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookmarkData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub meta: LinkMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogrollData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub feed: Option<String>,
    pub meta: LinkMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthorData {
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_website_owner: bool,
    pub website: Option<String>,
    pub avatar: Option<Image>,
    #[serde(default)]
    pub description: String,
}

/// Collection-specific payload of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryData {
    Author(AuthorData),
    BlogCategory(PageData),
    BlogPost(ArticleData),
    Blogroll(BlogrollData),
    Bookmark(BookmarkData),
    Guide(ArticleData),
    IndexPage(PageData),
    Note(ArticleData),
    Page(PageData),
    Project(ProjectData),
    Tag(TagData),
}

impl EntryData {
    /// Deserialize a raw front matter table into the payload of `collection`.
    pub fn from_table(collection: CollectionKey, table: toml::Table) -> Result<Self, toml::de::Error> {
        Ok(match collection {
            CollectionKey::Authors => Self::Author(table.try_into()?),
            CollectionKey::BlogCategories => Self::BlogCategory(table.try_into()?),
            CollectionKey::BlogPosts => Self::BlogPost(table.try_into()?),
            CollectionKey::Blogroll => Self::Blogroll(table.try_into()?),
            CollectionKey::Bookmarks => Self::Bookmark(table.try_into()?),
            CollectionKey::Guides => Self::Guide(table.try_into()?),
            CollectionKey::IndexPages => Self::IndexPage(table.try_into()?),
            CollectionKey::Notes => Self::Note(table.try_into()?),
            CollectionKey::Pages => Self::Page(table.try_into()?),
            CollectionKey::Projects => Self::Project(table.try_into()?),
            CollectionKey::Tags => Self::Tag(table.try_into()?),
        })
    }

    pub const fn collection(&self) -> CollectionKey {
        match self {
            Self::Author(_) => CollectionKey::Authors,
            Self::BlogCategory(_) => CollectionKey::BlogCategories,
            Self::BlogPost(_) => CollectionKey::BlogPosts,
            Self::Blogroll(_) => CollectionKey::Blogroll,
            Self::Bookmark(_) => CollectionKey::Bookmarks,
            Self::Guide(_) => CollectionKey::Guides,
            Self::IndexPage(_) => CollectionKey::IndexPages,
            Self::Note(_) => CollectionKey::Notes,
            Self::Page(_) => CollectionKey::Pages,
            Self::Project(_) => CollectionKey::Projects,
            Self::Tag(_) => CollectionKey::Tags,
        }
    }

    /// Display title; the name for authors.
    pub fn title(&self) -> &str {
        match self {
            Self::Author(d) => &d.name,
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => &d.title,
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => &d.title,
            Self::Blogroll(d) => &d.title,
            Self::Bookmark(d) => &d.title,
            Self::Project(d) => &d.title,
            Self::Tag(d) => &d.title,
        }
    }

    pub fn description(&self) -> Option<&str> {
        let description = match self {
            Self::Author(d) => &d.description,
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => &d.description,
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => &d.description,
            Self::Blogroll(d) => &d.description,
            Self::Bookmark(d) => &d.description,
            Self::Project(d) => &d.description,
            Self::Tag(d) => &d.description,
        };
        (!description.is_empty()).then_some(description.as_str())
    }

    pub const fn seo(&self) -> Option<&Seo> {
        match self {
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => d.seo.as_ref(),
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => d.seo.as_ref(),
            Self::Project(d) => d.seo.as_ref(),
            Self::Tag(d) => d.seo.as_ref(),
            Self::Author(_) | Self::Blogroll(_) | Self::Bookmark(_) => None,
        }
    }

    /// Cover image; the avatar for authors.
    pub const fn cover(&self) -> Option<&Image> {
        match self {
            Self::Author(d) => d.avatar.as_ref(),
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => d.cover.as_ref(),
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => d.cover.as_ref(),
            Self::Project(d) => d.cover.as_ref(),
            Self::Blogroll(_) | Self::Bookmark(_) | Self::Tag(_) => None,
        }
    }

    /// Link to somewhere outside the site, for entries without a page.
    pub fn external_url(&self) -> Option<&str> {
        match self {
            Self::Author(d) => d.website.as_deref(),
            Self::Blogroll(d) => Some(&d.url),
            Self::Bookmark(d) => Some(&d.url),
            _ => None,
        }
    }

    pub const fn published_on(&self) -> Option<Timestamp> {
        match self {
            Self::Author(_) => None,
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => Some(d.meta.published_on),
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => Some(d.meta.published_on),
            Self::Blogroll(d) => Some(d.meta.published_on),
            Self::Bookmark(d) => Some(d.meta.published_on),
            Self::Project(d) => Some(d.meta.published_on),
            Self::Tag(d) => Some(d.meta.published_on),
        }
    }

    pub const fn updated_on(&self) -> Option<Timestamp> {
        match self {
            Self::Author(_) => None,
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => d.meta.updated_on,
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => d.meta.updated_on,
            Self::Blogroll(d) => d.meta.updated_on,
            Self::Bookmark(d) => d.meta.updated_on,
            Self::Project(d) => d.meta.updated_on,
            Self::Tag(d) => d.meta.updated_on,
        }
    }

    pub const fn is_draft(&self) -> bool {
        match self {
            Self::Author(_) => false,
            Self::BlogCategory(d) | Self::IndexPage(d) | Self::Page(d) => d.meta.is_draft,
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => d.meta.is_draft,
            Self::Blogroll(d) => d.meta.is_draft,
            Self::Bookmark(d) => d.meta.is_draft,
            Self::Project(d) => d.meta.is_draft,
            Self::Tag(d) => d.meta.is_draft,
        }
    }

    /// Ids of referenced authors.
    pub fn authors(&self) -> &[String] {
        match self {
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => &d.meta.authors,
            Self::Project(d) => &d.meta.authors,
            _ => &[],
        }
    }

    /// Id of the referenced blog category.
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => d.meta.category.as_deref(),
            Self::Project(d) => d.meta.category.as_deref(),
            _ => None,
        }
    }

    /// Ids of referenced tags.
    pub fn tags(&self) -> &[String] {
        match self {
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => &d.meta.tags,
            Self::Project(d) => &d.meta.tags,
            Self::Blogroll(d) => &d.meta.tags,
            Self::Bookmark(d) => &d.meta.tags,
            _ => &[],
        }
    }

    /// Mutable tag ids, `None` for collections without tags.
    pub fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => Some(&mut d.meta.tags),
            Self::Project(d) => Some(&mut d.meta.tags),
            Self::Blogroll(d) => Some(&mut d.meta.tags),
            Self::Bookmark(d) => Some(&mut d.meta.tags),
            _ => None,
        }
    }

    /// Cross-locale siblings of a tag.
    pub const fn translations(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Tag(d) => Some(&d.i18n),
            _ => None,
        }
    }

    /// Visit every reference id, including tag translations, mutably.
    pub fn for_each_reference_mut(&mut self, mut f: impl FnMut(CollectionKey, &mut String)) {
        fn article(meta: &mut ArticleMeta, f: &mut impl FnMut(CollectionKey, &mut String)) {
            meta.authors.iter_mut().for_each(|id| f(CollectionKey::Authors, id));
            if let Some(id) = meta.category.as_mut() {
                f(CollectionKey::BlogCategories, id);
            }
            meta.tags.iter_mut().for_each(|id| f(CollectionKey::Tags, id));
        }

        match self {
            Self::BlogPost(d) | Self::Guide(d) | Self::Note(d) => article(&mut d.meta, &mut f),
            Self::Project(d) => article(&mut d.meta, &mut f),
            Self::Blogroll(d) => d.meta.tags.iter_mut().for_each(|id| f(CollectionKey::Tags, id)),
            Self::Bookmark(d) => d.meta.tags.iter_mut().for_each(|id| f(CollectionKey::Tags, id)),
            Self::Tag(d) => d.i18n.values_mut().for_each(|id| f(CollectionKey::Tags, id)),
            Self::Author(_) | Self::BlogCategory(_) | Self::IndexPage(_) | Self::Page(_) => {}
        }
    }

    /// Every reference held by this payload.
    pub fn references(&self) -> impl Iterator<Item = Reference> + '_ {
        let authors = self
            .authors()
            .iter()
            .map(|id| Reference::new(CollectionKey::Authors, id));
        let category = self
            .category()
            .map(|id| Reference::new(CollectionKey::BlogCategories, id));
        let tags = self.tags().iter().map(|id| Reference::new(CollectionKey::Tags, id));
        authors.chain(category).chain(tags)
    }
}

// ============================================================================
// Entry
// ============================================================================

/// A pointer to an entry of another collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub collection: CollectionKey,
    pub id: String,
}

impl Reference {
    pub fn new(collection: CollectionKey, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }
}

/// The atomic content unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique across the whole store; `{locale}/...` for localized collections.
    pub id: String,
    pub locale: Option<String>,
    pub data: EntryData,
    /// Raw markdown body, shared between clones.
    pub body: Option<Arc<str>>,
}

impl Entry {
    /// Create an entry, taking the locale from the first id segment for
    /// localized collections.
    pub fn new(id: impl Into<String>, data: EntryData) -> Self {
        let id = id.into();
        let locale = data
            .collection()
            .is_localized()
            .then(|| id.split_once('/').map(|(locale, _)| locale.to_owned()))
            .flatten();
        Self {
            id,
            locale,
            data,
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Arc<str>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub const fn collection(&self) -> CollectionKey {
        self.data.collection()
    }

    /// Id without its `{locale}/` prefix and its `{collection}/` segment.
    pub fn path(&self) -> &str {
        let rest = match &self.locale {
            Some(locale) => self
                .id
                .strip_prefix(locale.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(&self.id),
            None => &self.id,
        };
        rest.strip_prefix(self.collection().as_str())
            .and_then(|path| path.strip_prefix('/'))
            .unwrap_or(rest)
    }

    /// Last segment of the id.
    pub fn slug(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}
