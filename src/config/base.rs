//! `[base]` section configuration.
//!
//! Site identity used by generated files.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in folio.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "My Site"
/// url = "https://example.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title.
    #[serde(default = "defaults::base::title")]
    #[educe(Default = defaults::base::title())]
    pub title: String,

    /// Base URL for absolute links in the sitemap.
    /// Required when `[build.sitemap].enable = true`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,
}

impl BaseConfig {
    /// Base URL without trailing slash, empty when unset.
    pub fn url_root(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }
}
