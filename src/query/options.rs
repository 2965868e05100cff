//! Filter, ordering and pagination options of a query.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::content::Entry;

/// Output projection of formatted entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Listing projection: no seo, no author expansion, no content handle.
    #[default]
    Preview,
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

/// Data field a query can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderKey {
    PublishedOn,
    UpdatedOn,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub key: OrderKey,
    pub order: Order,
}

impl OrderBy {
    pub const fn new(key: OrderKey, order: Order) -> Self {
        Self { key, order }
    }

    /// Newest first, the order of every listing.
    pub const fn latest() -> Self {
        Self::new(OrderKey::PublishedOn, Order::Desc)
    }

    /// Compare two entries; a missing value is the smallest.
    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        let ordering = match self.key {
            OrderKey::PublishedOn => a.data.published_on().cmp(&b.data.published_on()),
            OrderKey::UpdatedOn => a.data.updated_on().cmp(&b.data.updated_on()),
            OrderKey::Title => a.data.title().cmp(b.data.title()),
        };
        match self.order {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    }
}

/// `where` clause of a query. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub locale: Option<String>,
    pub ids: Vec<String>,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl Filter {
    /// Entries without a locale pass any locale filter.
    pub fn matches_locale(&self, entry: &Entry) -> bool {
        match (&self.locale, &entry.locale) {
            (Some(wanted), Some(locale)) => wanted == locale,
            _ => true,
        }
    }

    /// Id and reference filters. A collection without the filtered field
    /// never matches a non-empty filter on it.
    pub fn matches_references(&self, entry: &Entry) -> bool {
        let data = &entry.data;
        (self.ids.is_empty() || self.ids.contains(&entry.id))
            && intersects(&self.authors, data.authors())
            && (self.categories.is_empty()
                || data
                    .category()
                    .is_some_and(|category| self.categories.iter().any(|c| c == category)))
            && intersects(&self.tags, data.tags())
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.matches_locale(entry) && self.matches_references(entry)
    }
}

fn intersects(wanted: &[String], present: &[String]) -> bool {
    wanted.is_empty() || present.iter().any(|id| wanted.contains(id))
}

/// Options of `query_collection`, built fluently:
///
/// ```ignore
/// let options = QueryOptions::new()
///     .locale("fr")
///     .tags(["fr/rust"])
///     .order_by(OrderBy::latest())
///     .first(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub filter: Filter,
    pub order_by: Option<OrderBy>,
    /// Page size; everything when unset.
    pub first: Option<usize>,
    /// Number of entries to skip.
    pub after: usize,
    pub format: Format,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.filter.locale = Some(locale.into());
        self
    }

    pub fn ids<I: Into<String>>(mut self, ids: impl IntoIterator<Item = I>) -> Self {
        self.filter.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn authors<I: Into<String>>(mut self, authors: impl IntoIterator<Item = I>) -> Self {
        self.filter.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn categories<I: Into<String>>(mut self, categories: impl IntoIterator<Item = I>) -> Self {
        self.filter.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn tags<I: Into<String>>(mut self, tags: impl IntoIterator<Item = I>) -> Self {
        self.filter.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub const fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub const fn first(mut self, first: usize) -> Self {
        self.first = Some(first);
        self
    }

    pub const fn after(mut self, after: usize) -> Self {
        self.after = after;
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Stable sort by `order_by`; a no-op when unset.
    pub fn sort(&self, entries: &mut [Entry]) {
        if let Some(order_by) = &self.order_by {
            entries.sort_by(|a, b| order_by.compare(a, b));
        }
    }

    /// Apply `after` / `first` to an already sorted list.
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        let take = self.first.unwrap_or(usize::MAX);
        items.into_iter().skip(self.after).take(take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures::{self, EntryFixture};

    #[test]
    fn test_missing_updated_on_sorts_smallest() {
        let updated = fixtures::post("en/a", "A", "2024-01-01")
            .with_meta(|m| m.updated_on = Some("2024-03-01".parse().unwrap()));
        let never = fixtures::post("en/b", "B", "2024-02-01");

        let asc = OrderBy::new(OrderKey::UpdatedOn, Order::Asc);
        assert_eq!(asc.compare(&never, &updated), Ordering::Less);
        let desc = OrderBy::new(OrderKey::UpdatedOn, Order::Desc);
        assert_eq!(desc.compare(&never, &updated), Ordering::Greater);
    }

    #[test]
    fn test_author_has_no_publication_date() {
        let author = fixtures::author("jane", "Jane");
        let post = fixtures::post("en/a", "A", "2024-01-01");
        let asc = OrderBy::new(OrderKey::PublishedOn, Order::Asc);
        assert_eq!(asc.compare(&author, &post), Ordering::Less);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut entries = vec![
            fixtures::post("en/first", "First", "2024-01-01"),
            fixtures::post("en/newer", "Newer", "2024-06-01"),
            fixtures::post("en/second", "Second", "2024-01-01"),
        ];
        QueryOptions::new()
            .order_by(OrderBy::latest())
            .sort(&mut entries);

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["en/newer", "en/first", "en/second"]);
    }

    #[test]
    fn test_sort_by_title() {
        let mut entries = vec![
            fixtures::guide("en/b", "Borrowing", "2024-01-01"),
            fixtures::guide("en/a", "Async", "2024-01-01"),
        ];
        QueryOptions::new()
            .order_by(OrderBy::new(OrderKey::Title, Order::Asc))
            .sort(&mut entries);
        assert_eq!(entries[0].data.title(), "Async");
    }

    #[test]
    fn test_locale_filter_passes_locale_free_entries() {
        let filter = QueryOptions::new().locale("fr").filter;
        assert!(filter.matches(&fixtures::post("fr/a", "A", "2024-01-01")));
        assert!(!filter.matches(&fixtures::post("en/a", "A", "2024-01-01")));
        assert!(filter.matches(&fixtures::bookmark("book", "Book", "2024-01-01")));
    }

    #[test]
    fn test_reference_filters_intersect() {
        let post = fixtures::post("en/a", "A", "2024-01-01")
            .tagged(&["en/rust", "en/web"])
            .with_meta(|m| {
                m.authors = vec!["jane".into()];
                m.category = Some("en/tech".into());
            });

        assert!(QueryOptions::new().tags(["en/web", "en/go"]).filter.matches(&post));
        assert!(!QueryOptions::new().tags(["en/go"]).filter.matches(&post));
        assert!(QueryOptions::new().authors(["jane"]).filter.matches(&post));
        assert!(QueryOptions::new().categories(["en/tech"]).filter.matches(&post));
        assert!(!QueryOptions::new().categories(["en/life"]).filter.matches(&post));
        assert!(QueryOptions::new().ids(["en/a"]).filter.matches(&post));
        assert!(!QueryOptions::new().ids(["en/b"]).filter.matches(&post));
    }

    #[test]
    fn test_absent_field_never_matches() {
        let tag = fixtures::tag("en/rust", "Rust");
        assert!(!QueryOptions::new().tags(["en/rust"]).filter.matches(&tag));
        assert!(!QueryOptions::new().categories(["en/tech"]).filter.matches(&tag));
    }

    #[test]
    fn test_paginate() {
        let options = QueryOptions::new().after(1).first(2);
        assert_eq!(options.paginate(vec![1, 2, 3, 4]), [2, 3]);
        assert_eq!(QueryOptions::new().after(5).paginate(vec![1, 2]), Vec::<i32>::new());
        assert_eq!(QueryOptions::new().paginate(vec![1, 2]), [1, 2]);
    }
}
