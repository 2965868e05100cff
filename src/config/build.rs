//! `[build]` section configuration.
//!
//! Content location, output location, build mode and sitemap settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which kind of build the content is queried for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Drafts are listed (default).
    #[default]
    Development,
    /// Drafts are excluded from every query and from the route index.
    Production,
}

impl BuildMode {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// `[build]` section in folio.toml.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"
/// output = "public"
/// mode = "production"
///
/// [build.sitemap]
/// enable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory (one sub-directory per collection).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Development or production.
    #[serde(default)]
    pub mode: BuildMode,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// `[build.sitemap]` section.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Enable sitemap generation.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub enable: bool,

    /// Output path, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,
}
