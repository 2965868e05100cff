//! Sitemap generation.
//!
//! Lists every route of the Route Index for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::{config::SiteConfig, index::EntriesIndex, log, routes::RouteIndex};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

// ============================================================================
// Public API
// ============================================================================

/// Write the sitemap if enabled in config, returning where it went.
pub fn build_sitemap(
    config: &SiteConfig,
    routes: &RouteIndex,
    index: &EntriesIndex,
) -> Result<Option<PathBuf>> {
    if !config.build.sitemap.enable {
        return Ok(None);
    }
    let sitemap = Sitemap::from_routes(config, routes, index);
    sitemap.write(config).map(Some)
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (optional, YYYY-MM-DD format)
    lastmod: Option<String>,
}

impl Sitemap {
    /// One URL per route; lastmod is the update date, else the publication
    /// date.
    fn from_routes(config: &SiteConfig, routes: &RouteIndex, index: &EntriesIndex) -> Self {
        let base = config.base.url_root();

        let urls = routes
            .iter()
            .map(|item| {
                let data = index.by_id(&item.id).map(|indexed| &indexed.entry.data);
                UrlEntry {
                    loc: format!("{base}{}", item.route),
                    lastmod: data
                        .and_then(|data| data.updated_on().or(data.published_on()))
                        .map(|date| date.ymd()),
                }
            })
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to output file.
    fn write(self, config: &SiteConfig) -> Result<PathBuf> {
        let sitemap_path = config.sitemap_path();
        let count = self.urls.len();
        let xml = self.into_xml();

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&sitemap_path, xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{} urls -> {}", count, sitemap_path.display());
        Ok(sitemap_path)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
