//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Configuration is plain
//! pass-through for rendering (title, tagline, footer markup, attribution
//! link, UI language, base path, custom CSS); none of it is computed by the
//! core. There is exactly one config per run; it is loaded in `main` and
//! threaded explicitly through every render call, never stored in a global.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Topics"              # Site title
//! tagline = ""                  # Subtitle under the title (plain text)
//! footer = ""                   # Footer markup, inserted verbatim (trusted HTML)
//! language = "en"               # UI language: "en" or "fr"
//! base_path = ""                # Prefix for sub-path deployment, e.g. "/faq"
//! custom_css = ""               # Path to a stylesheet referenced by generated sites
//! all_label = ""                # Override for the flat-mode pseudo-category label
//!
//! [attribution]
//! label = ""                    # Source attribution link text
//! url = ""                      # Source attribution link target
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. Unknown
//! keys are rejected to catch typos early.

use crate::locale::Lang;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, shown in the header and the document title.
    pub title: String,
    /// Tagline under the title. Plain text.
    pub tagline: String,
    /// Footer markup, trusted HTML inserted verbatim.
    pub footer: String,
    /// Default UI language; a request's Accept-Language can override it.
    pub language: Lang,
    /// URL prefix when deployed under a sub-path (e.g. "/faq"). Empty for
    /// root deployment. Must start with "/" and not end with one.
    pub base_path: String,
    /// Path to a custom stylesheet. Generated sites reference it with a
    /// `<link>`; empty means inline styles only.
    pub custom_css: String,
    /// Override for the flat-mode pseudo-category label. Empty picks the
    /// localized default.
    pub all_label: String,
    /// Source attribution link rendered in the footer area.
    pub attribution: Attribution,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Attribution {
    pub label: String,
    pub url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Topics".to_string(),
            tagline: String::new(),
            footer: String::new(),
            language: Lang::En,
            base_path: String::new(),
            custom_css: String::new(),
            all_label: String::new(),
            attribution: Attribution::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.is_empty() {
            if !self.base_path.starts_with('/') {
                return Err(ConfigError::Validation(
                    "base_path must start with '/'".into(),
                ));
            }
            if self.base_path.ends_with('/') {
                return Err(ConfigError::Validation(
                    "base_path must not end with '/'".into(),
                ));
            }
        }
        if !self.attribution.url.is_empty() && self.attribution.label.is_empty() {
            return Err(ConfigError::Validation(
                "attribution.url is set but attribution.label is empty".into(),
            ));
        }
        Ok(())
    }

    /// The flat-mode pseudo-category label: configured override or the
    /// localized default.
    pub fn all_label(&self, lang: Lang) -> &str {
        if self.all_label.is_empty() {
            crate::locale::strings(lang).all_topics
        } else {
            &self.all_label
        }
    }
}

/// Default config file name, looked up in the working directory when no
/// `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Load configuration.
///
/// An explicit path must exist and parse. With no explicit path, the
/// default file is used when present, otherwise stock defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    let path = match explicit {
        Some(p) => p,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(SiteConfig::default());
            }
            default
        }
    };
    let raw = fs::read_to_string(path)?;
    let config: SiteConfig = toml::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

/// A stock `config.toml` with every option documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    r#"# topical site configuration
# All options are optional - defaults shown below.

# Site title, shown in the header and the document title.
title = "Topics"

# Tagline under the title. Plain text.
tagline = ""

# Footer markup, inserted verbatim (trusted HTML).
footer = ""

# UI language: "en" or "fr". Server mode lets a request's
# Accept-Language header override this default.
language = "en"

# URL prefix when deployed under a sub-path, e.g. "/faq".
# Must start with "/" and not end with one. Empty for root deployment.
base_path = ""

# Path to a custom stylesheet referenced by generated sites.
# Empty means inline styles only.
custom_css = ""

# Override for the label grouping all topics when none has a category.
# Empty picks the localized default ("All topics" / "Tous les sujets").
all_label = ""

# Source attribution link rendered in the footer area.
[attribution]
label = ""
url = ""
"#
    .to_string()
}
