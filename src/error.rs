//! Error types for the content layer.
//!
//! Three families, never collapsed into one another:
//!
//! - **not found**: an identity was explicitly requested and nothing matches
//!   (`EntryNotFound`, `CollectionMismatch`)
//! - **usage**: the caller asked for something the content model does not
//!   allow (`UnknownCollection`, `NotPageable`, `NoListing`, `NotListable`)
//! - **upstream**: the content store failed (`Store`), or the content itself
//!   breaks the uniqueness invariants (`DuplicateId`, `DuplicateRoute`)
//!
//! Dangling references inside entry data are not errors; the formatter drops
//! them (see [`Resolution::Lenient`](crate::index::Resolution)).

use std::path::PathBuf;

use thiserror::Error;

use crate::content::CollectionKey;

/// Errors raised by the index, query and pageable layers.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    #[error("no entry with id `{id}` in collection `{collection}`")]
    EntryNotFound { collection: CollectionKey, id: String },

    #[error("entry `{id}` was requested from `{requested}` but belongs to `{actual}`")]
    CollectionMismatch {
        id: String,
        requested: CollectionKey,
        actual: CollectionKey,
    },

    #[error("entry `{id}` of collection `{collection}` cannot list related entries")]
    NotPageable { collection: CollectionKey, id: String },

    #[error("entry `{id}` maps to listing `{name}` which is not a collection")]
    NoListing { id: String, name: String },

    #[error("collection `{0}` cannot be listed")]
    NotListable(CollectionKey),

    #[error("id `{id}` is used by both `{first}` and `{second}`")]
    DuplicateId {
        id: String,
        first: CollectionKey,
        second: CollectionKey,
    },

    #[error("route `{route}` is claimed by both `{first}` and `{second}`")]
    DuplicateRoute {
        route: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by content store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("missing `+++` front matter in `{0}`")]
    MissingFrontMatter(PathBuf),

    #[error("invalid front matter in `{0}`")]
    FrontMatter(PathBuf, #[source] toml::de::Error),

    #[error("`{path}`: locale `{locale}` is not configured")]
    UnknownLocale { path: PathBuf, locale: String },

    #[error("id `{0}` does not name a file inside its collection")]
    InvalidId(String),

    #[error("content store task failed: {0}")]
    Task(String),
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
