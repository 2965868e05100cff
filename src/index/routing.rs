//! Route computation for routable entries.
//!
//! | Collection            | Id             | Route (default `en`) |
//! |-----------------------|----------------|----------------------|
//! | `pages`               | `en/home`      | `/`                  |
//! | `pages`               | `fr/home`      | `/fr`                |
//! | `pages`               | `en/about`     | `/about`             |
//! | `index.pages`         | `fr/blog`      | `/fr/blog`           |
//! | `blog.posts`          | `fr/article`   | `/fr/blog/article`   |
//! | `tags`                | `en/rust`      | `/tags/rust`         |
//! | `authors`, `bookmarks`, `blogroll` | any | none              |
//!
//! A `{collection}/` segment after the locale (`en/tags/rust`) is ignored.

use crate::{config::SiteConfig, content::Entry};

/// Path of the page that maps to the bare locale prefix.
pub const HOME_PATH: &str = "home";

/// Computed location of a routable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRoute {
    pub route: String,
    pub slug: String,
}

/// `""` for the default locale (and locale-free entries), `/{locale}` otherwise.
pub fn locale_prefix(locale: Option<&str>, config: &SiteConfig) -> String {
    match locale {
        Some(locale) if !config.i18n.is_default(locale) => format!("/{locale}"),
        _ => String::new(),
    }
}

/// Compute the route of an entry, `None` for collections without pages.
pub fn route_for(entry: &Entry, config: &SiteConfig) -> Option<EntryRoute> {
    let key = entry.collection();
    if !key.is_routable() {
        return None;
    }

    let prefix = locale_prefix(entry.locale.as_deref(), config);
    let slug = entry.slug().to_owned();

    let route = match config.routes.segment(key) {
        None if entry.path() == HOME_PATH => {
            if prefix.is_empty() {
                "/".to_owned()
            } else {
                prefix
            }
        }
        None => format!("{prefix}/{}", entry.path()),
        Some("") => format!("{prefix}/{slug}"),
        Some(segment) => format!("{prefix}/{segment}/{slug}"),
    };

    Some(EntryRoute { route, slug })
}
