//! Querying collections and formatting entries.
//!
//! | Operation                       | Errors                                   |
//! |---------------------------------|------------------------------------------|
//! | `QueryEngine::query_collection` | store failures                           |
//! | `QueryEngine::query_entry`      | `EntryNotFound`, `CollectionMismatch`    |
//! | `format_entry`                  | none, dangling references are dropped    |

mod engine;
mod format;
mod options;

pub use engine::{QueryEngine, QueryResult};
pub use format::{
    AuthorPreview, ContentHandle, FormattedEntry, FormattedMeta, Link, format_entry,
    update_entry_tags_for_locale,
};
pub use options::{Filter, Format, Order, OrderBy, OrderKey, QueryOptions};
