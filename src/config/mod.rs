//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                       |
//! |-------------|-----------------------------------------------|
//! | `[base]`    | Site metadata (title, url)                    |
//! | `[build]`   | Content/output paths, build mode, sitemap     |
//! | `[i18n]`    | Default locale and accepted locales           |
//! | `[routes]`  | Route segments of collections with pages      |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Site"
//! url = "https://example.com"
//!
//! [build]
//! content = "content"
//! mode = "production"
//!
//! [i18n]
//! default_locale = "en"
//! locales = ["en", "fr"]
//!
//! [routes]
//! blog_posts = "blog"
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod i18n;
mod routes;

pub use base::BaseConfig;
pub use build::{BuildConfig, BuildMode, SitemapConfig};
pub use error::ConfigError;
pub use i18n::I18nConfig;
pub use routes::RoutesConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Locales
    #[serde(default)]
    pub i18n: I18nConfig,

    /// Route segments
    #[serde(default)]
    pub routes: RoutesConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `folio.toml` from the CLI root (defaults when absent), apply CLI
    /// overrides and validate for the requested command.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate_for(&cli.command)?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Absolute path of the sitemap file.
    pub fn sitemap_path(&self) -> PathBuf {
        self.build.output.join(&self.build.sitemap.path)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        if cli.production {
            self.build.mode = BuildMode::Production;
        }

        let root = Self::normalize_path(&root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.root = Some(root);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate settings shared by every command.
    pub fn validate(&self) -> Result<()> {
        if self.i18n.locales.is_empty() {
            bail!(ConfigError::Validation("[i18n.locales] must not be empty".into()));
        }

        if !self.i18n.is_known(&self.i18n.default_locale) {
            bail!(ConfigError::DefaultLocale {
                default: self.i18n.default_locale.clone(),
                locales: self.i18n.locales.clone(),
            });
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        Ok(())
    }

    /// Validate settings required by a specific command.
    pub fn validate_for(&self, command: &Commands) -> Result<()> {
        self.validate()?;

        if let Commands::Sitemap = command {
            if !self.build.sitemap.enable {
                bail!(ConfigError::Validation(
                    "[build.sitemap.enable] is false".into()
                ));
            }
            if self.base.url.is_none() {
                bail!(ConfigError::Validation(
                    "[base.url] is required for sitemap generation".into()
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
