//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn title() -> String {
        "Folio".into()
    }

    pub fn url() -> Option<String> {
        None
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [i18n] Section Defaults
// ============================================================================

pub mod i18n {
    pub fn default_locale() -> String {
        "en".into()
    }

    pub fn locales() -> Vec<String> {
        vec![default_locale()]
    }
}

// ============================================================================
// [routes] Section Defaults
// ============================================================================

pub mod routes {
    pub fn blog_posts() -> String {
        "blog".into()
    }

    pub fn blog_categories() -> String {
        "blog/categories".into()
    }

    pub fn tags() -> String {
        "tags".into()
    }

    pub fn guides() -> String {
        "guides".into()
    }

    pub fn notes() -> String {
        "notes".into()
    }

    pub fn projects() -> String {
        "projects".into()
    }
}
