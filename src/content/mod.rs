//! Content model and content stores.
//!
//! ```text
//! content/
//! ├── pages/en/home.md           id "en/home"        route "/"
//! ├── pages/fr/home.md           id "fr/home"        route "/fr"
//! ├── index.pages/en/blog.md     id "en/blog"        route "/blog"
//! ├── blog.posts/en/hello.md     id "en/hello"       route "/blog/hello"
//! ├── tags/en/rust.md            id "en/rust"        route "/tags/rust"
//! ├── authors/jane.md            id "jane"           (no route)
//! └── bookmarks/rust-book.md     id "rust-book"      (no route)
//! ```

mod collection;
mod entry;
mod fs;
mod store;

pub use collection::{CollectionKey, HOME_LISTING, TAGGED_COLLECTIONS};
pub use entry::{
    ArticleData, ArticleMeta, AuthorData, BlogrollData, BookmarkData, Entry, EntryData, Image,
    LinkMeta, PageData, PageMeta, ProjectData, Reference, Seo, TagData, Timestamp,
};
pub use fs::FsStore;
pub use store::{ContentStore, MemoryStore};
