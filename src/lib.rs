//! Folio - content index and query layer for multi-locale static sites.
//!
//! ```text
//! ContentStore ──► EntriesIndex ──► QueryEngine ──► pageable listings
//!                       │                │
//!                       │                └──► format_entry (references resolved)
//!                       ▼
//!                  RouteIndex ──► breadcrumbs, sitemap
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod index;
pub mod logger;
pub mod pageable;
pub mod query;
pub mod routes;
pub mod site;
pub mod toc;
pub mod utils;

pub use error::{ContentError, Result, StoreError};
pub use site::Site;
