//! Locale string loader: fetches site-specific strings for the current
//! locale and registers them.
//!
//! Failures never reach the caller as errors. They are logged and the
//! registry is left exactly as it was.

use crate::config::Config;
use crate::i18n::{TranslationRegistry, TranslationTree};
use crate::retry::{with_retry_if, RetryConfig};
use chrono::{Local, NaiveDate};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info};

/// Why a locale string document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url} is not a valid strings document: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl LoadError {
    /// Network failures, 429 and 5xx responses are worth retrying; other
    /// statuses and malformed documents are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::Request { .. } => true,
            LoadError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            LoadError::Parse { .. } => false,
        }
    }
}

/// URL of the strings document for `locale`, cache-busted by `date`.
pub fn strings_url(base_url: &str, locale: &str, date: NaiveDate) -> String {
    format!(
        "{}/site-assets/shared/strings.{}.json?r={}",
        base_url.trim_end_matches('/'),
        locale,
        date.format("%Y%m%d")
    )
}

async fn fetch_strings(client: &reqwest::Client, url: &str) -> Result<TranslationTree, LoadError> {
    let response = client.get(url).send().await.map_err(|source| LoadError::Request {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }

    response
        .json::<TranslationTree>()
        .await
        .map_err(|source| LoadError::Parse {
            url: url.to_string(),
            source,
        })
}

/// Fetch the strings document for the registry's current locale and
/// register it.
pub async fn load_locale_strings(
    client: &reqwest::Client,
    registry: &TranslationRegistry,
    base_url: &str,
    retry: &RetryConfig,
) -> Result<(), LoadError> {
    let locale = registry.get_locale();
    let url = strings_url(base_url, &locale, Local::now().date_naive());

    let strings = with_retry_if(
        retry,
        &format!("Locale strings ({})", locale),
        || fetch_strings(client, &url),
        LoadError::is_retryable,
    )
    .await?;

    registry.register_translations(&locale, strings);
    info!("Loaded locale strings for {}", locale);
    Ok(())
}

/// Prepare `registry` from `config` and load site strings if configured.
///
/// Returns `true` when strings were loaded. A failed load is logged and
/// leaves the registry unchanged.
pub async fn init(client: &reqwest::Client, registry: &TranslationRegistry, config: &Config) -> bool {
    registry.set_locale(&config.default_locale);
    registry.set_locale_override(config.locale.clone());

    let Some(base_url) = config.strings_base_url.as_deref() else {
        info!("LOCALE_STRINGS_URL not set, skipping locale string load");
        return false;
    };

    let retry = RetryConfig::locale_strings(config.load_attempts);
    match load_locale_strings(client, registry, base_url, &retry).await {
        Ok(()) => true,
        Err(e) => {
            error!("Localized strings failed to load: {}", e);
            false
        }
    }
}
