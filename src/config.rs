use crate::i18n::DEFAULT_LOCALE;
use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Locale selection
    /// Host-directed locale; wins over the tracked default when non-empty
    pub locale: Option<String>,
    pub default_locale: String,

    // Locale string loader
    /// Origin serving `/site-assets/shared/strings.<locale>.json`
    pub strings_base_url: Option<String>,
    pub load_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Locale selection
            locale: std::env::var("LOCALE")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            default_locale: std::env::var("DEFAULT_LOCALE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),

            // Locale string loader
            strings_base_url: std::env::var("LOCALE_STRINGS_URL")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| value.trim_end_matches('/').to_string()),
            load_attempts: match std::env::var("LOCALE_LOAD_ATTEMPTS") {
                Ok(value) => value
                    .parse()
                    .with_context(|| format!("LOCALE_LOAD_ATTEMPTS is not a number: {}", value))?,
                Err(_) => 3,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: None,
            default_locale: DEFAULT_LOCALE.to_string(),
            strings_base_url: None,
            load_attempts: 3,
        }
    }
}
