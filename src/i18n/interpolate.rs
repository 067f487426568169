//! Named placeholder substitution for translated strings.
//!
//! Templates use `%(name)s` markers. Every marker must have a binding;
//! an unbound marker is an error rather than being left in place or
//! silently dropped.

use crate::i18n::LocaleError;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// Cached placeholder pattern
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"%\(([A-Za-z0-9_]+)\)s").unwrap())
}

/// Check whether `template` contains any placeholder markers.
pub fn has_placeholders(template: &str) -> bool {
    placeholder_regex().is_match(template)
}

/// Substitute every `%(name)s` marker in `template` with its binding.
///
/// # Returns
/// * `Ok(String)` with all markers replaced
/// * `Err(LocaleError::MissingBinding)` naming the first unbound marker
pub fn interpolate(
    template: &str,
    bindings: &BTreeMap<String, String>,
) -> Result<String, LocaleError> {
    if !has_placeholders(template) {
        return Ok(template.to_string());
    }

    if let Some(unbound) = placeholder_regex()
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .find(|name| !bindings.contains_key(name))
    {
        return Err(LocaleError::MissingBinding {
            name: unbound,
            template: template.to_string(),
        });
    }

    let rendered = placeholder_regex().replace_all(template, |cap: &Captures| {
        bindings.get(&cap[1]).cloned().unwrap_or_default()
    });

    Ok(rendered.into_owned())
}
