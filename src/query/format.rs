//! Reference resolution and output projection of entries.
//!
//! Reference fields of raw entries hold bare ids. Formatting replaces them
//! with small denormalized previews looked up in the [`EntriesIndex`];
//! references to entries that no longer exist are dropped.

use std::sync::Arc;

use serde::Serialize;

use super::Format;
use crate::{
    content::{CollectionKey, Entry, EntryData, Image, Reference, Seo, Timestamp},
    index::EntriesIndex,
    toc::{Heading, HeadingNode, build_toc, extract_headings},
};

/// Title and location of a referenced entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: String,
    pub title: String,
    pub route: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorPreview {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub avatar: Option<Image>,
    pub is_website_owner: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedMeta {
    pub published_on: Option<Timestamp>,
    pub updated_on: Option<Timestamp>,
    pub is_draft: bool,
    /// Empty in preview format.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<AuthorPreview>,
    pub category: Option<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Link>,
}

/// Lazy access to the markdown body of a full-format entry.
///
/// Rendering is left to the caller; the handle only shares the raw source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHandle {
    body: Arc<str>,
}

impl ContentHandle {
    pub fn new(body: Arc<str>) -> Self {
        Self { body }
    }

    pub fn raw(&self) -> &str {
        &self.body
    }

    pub fn headings(&self) -> Vec<Heading> {
        extract_headings(&self.body)
    }

    pub fn toc(&self) -> Vec<HeadingNode> {
        build_toc(&self.headings())
    }
}

/// An entry with its references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedEntry {
    pub collection: CollectionKey,
    pub id: String,
    pub locale: Option<String>,
    pub route: Option<String>,
    pub slug: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// The route for entries with a page, the external url otherwise.
    pub url: Option<String>,
    pub cover: Option<Image>,
    pub meta: FormattedMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(skip)]
    pub content: Option<ContentHandle>,
}

impl FormattedEntry {
    pub fn headings(&self) -> Vec<Heading> {
        self.content.as_ref().map(ContentHandle::headings).unwrap_or_default()
    }
}

/// Resolve the references of `entry` and project it to `format`.
///
/// Pure: the same entry, format and index always give the same output.
pub fn format_entry(entry: &Entry, format: Format, index: &EntriesIndex) -> FormattedEntry {
    let data = &entry.data;
    let indexed = index.by_id(&entry.id);
    let route = indexed.and_then(|indexed| indexed.route.clone());
    let slug = indexed.and_then(|indexed| indexed.slug.clone());
    let url = route
        .clone()
        .or_else(|| data.external_url().map(str::to_owned));

    let full = format == Format::Full;
    let authors = if full {
        data.authors()
            .iter()
            .filter_map(|id| author_preview(index, id))
            .collect()
    } else {
        Vec::new()
    };

    let meta = FormattedMeta {
        published_on: data.published_on(),
        updated_on: data.updated_on(),
        is_draft: data.is_draft(),
        authors,
        category: data
            .category()
            .and_then(|id| link(index, &Reference::new(CollectionKey::BlogCategories, id))),
        tags: data
            .tags()
            .iter()
            .filter_map(|id| link(index, &Reference::new(CollectionKey::Tags, id)))
            .collect(),
    };

    FormattedEntry {
        collection: entry.collection(),
        id: entry.id.clone(),
        locale: entry.locale.clone(),
        route,
        slug,
        title: data.title().to_owned(),
        description: data.description().map(str::to_owned),
        url,
        cover: data.cover().cloned(),
        meta,
        seo: full.then(|| data.seo().cloned()).flatten(),
        content: full
            .then(|| entry.body.clone().map(ContentHandle::new))
            .flatten(),
    }
}

fn link(index: &EntriesIndex, reference: &Reference) -> Option<Link> {
    let target = index.resolve_reference(reference)?;
    Some(Link {
        id: target.entry.id.clone(),
        title: target.title().to_owned(),
        route: target.route.clone(),
    })
}

fn author_preview(index: &EntriesIndex, id: &str) -> Option<AuthorPreview> {
    let target = index.resolve_reference(&Reference::new(CollectionKey::Authors, id))?;
    let EntryData::Author(author) = &target.entry.data else {
        return None;
    };
    Some(AuthorPreview {
        id: target.entry.id.clone(),
        name: author.name.clone(),
        website: author.website.clone(),
        avatar: author.avatar.clone(),
        is_website_owner: author.is_website_owner,
    })
}

/// Swap every tag reference to its sibling in `locale`, when the tag has
/// one that exists; other tags are kept as they are.
pub fn update_entry_tags_for_locale(entry: &mut Entry, locale: &str, index: &EntriesIndex) {
    let Some(tags) = entry.data.tags_mut() else {
        return;
    };

    for tag in tags.iter_mut() {
        let Some(current) = index.resolve_reference(&Reference::new(CollectionKey::Tags, tag.as_str()))
        else {
            continue;
        };
        if current.entry.locale.as_deref() == Some(locale) {
            continue;
        }
        let sibling = current
            .entry
            .data
            .translations()
            .and_then(|translations| translations.get(locale))
            .filter(|id| {
                index
                    .resolve_reference(&Reference::new(CollectionKey::Tags, id.as_str()))
                    .is_some()
            });
        if let Some(sibling) = sibling {
            *tag = sibling.clone();
        }
    }
}
