//! Error type for the translation core.

use thiserror::Error;

/// Errors raised by the translation core.
///
/// Missing keys are not errors: they resolve to the missing-translation
/// sentinel string instead.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// A `%(name)s` placeholder had no matching binding
    #[error("missing interpolation binding '{name}' for \"{template}\"")]
    MissingBinding { name: String, template: String },

    /// A key filter was given an invalid regular expression
    #[error("invalid key filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
