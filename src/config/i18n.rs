//! `[i18n]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[i18n]` section in folio.toml.
///
/// Routes of the default locale carry no locale prefix.
///
/// # Example
/// ```toml
/// [i18n]
/// default_locale = "en"
/// locales = ["en", "fr"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct I18nConfig {
    #[serde(default = "defaults::i18n::default_locale")]
    #[educe(Default = defaults::i18n::default_locale())]
    pub default_locale: String,

    #[serde(default = "defaults::i18n::locales")]
    #[educe(Default = defaults::i18n::locales())]
    pub locales: Vec<String>,
}

impl I18nConfig {
    pub fn is_default(&self, locale: &str) -> bool {
        self.default_locale == locale
    }

    pub fn is_known(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }
}
