//! Diagnostic search over registered translations.
//!
//! Used by tooling to answer "which keys render this text?". Nothing in
//! the resolution path depends on it.

use crate::i18n::tree::TranslationTree;
use crate::i18n::LocaleError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Test applied to each leaf value.
#[derive(Clone)]
pub enum KeyPredicate {
    /// Case-insensitive substring match
    Contains(String),

    /// Regular expression match
    Pattern(Regex),

    /// Arbitrary test
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),

    /// Matches when any inner predicate matches
    Any(Vec<KeyPredicate>),
}

impl KeyPredicate {
    pub fn contains(needle: impl Into<String>) -> Self {
        KeyPredicate::Contains(needle.into())
    }

    /// Compile `pattern` into a regex predicate.
    pub fn pattern(pattern: &str) -> Result<Self, LocaleError> {
        Ok(KeyPredicate::Pattern(Regex::new(pattern)?))
    }

    pub fn custom(test: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        KeyPredicate::Custom(Arc::new(test))
    }

    pub fn any(predicates: Vec<KeyPredicate>) -> Self {
        KeyPredicate::Any(predicates)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            KeyPredicate::Contains(needle) => {
                value.to_lowercase().contains(&needle.to_lowercase())
            }
            KeyPredicate::Pattern(regex) => regex.is_match(value),
            KeyPredicate::Custom(test) => test(value),
            KeyPredicate::Any(predicates) => predicates.iter().any(|p| p.matches(value)),
        }
    }
}

impl fmt::Debug for KeyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPredicate::Contains(needle) => f.debug_tuple("Contains").field(needle).finish(),
            KeyPredicate::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            KeyPredicate::Custom(_) => f.write_str("Custom(..)"),
            KeyPredicate::Any(predicates) => f.debug_tuple("Any").field(predicates).finish(),
        }
    }
}

/// Keep only the leaves of `tree` whose value matches `predicate`.
///
/// Containers left with no matching leaves are dropped. Returns `None` when
/// nothing matched.
pub fn filter_tree(tree: &TranslationTree, predicate: &KeyPredicate) -> Option<TranslationTree> {
    match tree {
        TranslationTree::Leaf(value) => predicate
            .matches(value)
            .then(|| TranslationTree::Leaf(value.clone())),
        TranslationTree::Node(children) => {
            let kept: BTreeMap<String, TranslationTree> = children
                .iter()
                .filter_map(|(key, child)| Some((key.clone(), filter_tree(child, predicate)?)))
                .collect();
            (!kept.is_empty()).then_some(TranslationTree::Node(kept))
        }
    }
}

/// Search every locale's tree, keyed by locale at the top level.
pub fn find_locale_keys(
    translations: &BTreeMap<String, TranslationTree>,
    predicate: &KeyPredicate,
) -> Option<TranslationTree> {
    filter_tree(&TranslationTree::Node(translations.clone()), predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_data() -> BTreeMap<String, TranslationTree> {
        let mut data = BTreeMap::new();
        data.insert(
            "en".to_string(),
            TranslationTree::from(json!({
                "course": {"title": "Course Title", "empty": "Nothing here"},
                "nav": {"home": "Home", "back": "Back to course"}
            })),
        );
        data.insert(
            "ru".to_string(),
            TranslationTree::from(json!({"nav": {"home": "Главная"}})),
        );
        data
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let found = find_locale_keys(&registry_data(), &KeyPredicate::contains("COURSE")).unwrap();
        assert_eq!(
            found,
            TranslationTree::from(json!({
                "en": {"course": {"title": "Course Title"}, "nav": {"back": "Back to course"}}
            }))
        );
    }

    #[test]
    fn test_pattern_predicate() {
        let predicate = KeyPredicate::pattern("^Home$").unwrap();
        let found = find_locale_keys(&registry_data(), &predicate).unwrap();
        assert_eq!(found, TranslationTree::from(json!({"en": {"nav": {"home": "Home"}}})));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(matches!(
            KeyPredicate::pattern("("),
            Err(LocaleError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_custom_and_any_predicates() {
        let predicate = KeyPredicate::any(vec![
            KeyPredicate::custom(|value| value.chars().any(|c| !c.is_ascii())),
            KeyPredicate::contains("nothing"),
        ]);
        let found = find_locale_keys(&registry_data(), &predicate).unwrap();
        assert_eq!(
            found,
            TranslationTree::from(json!({
                "en": {"course": {"empty": "Nothing here"}},
                "ru": {"nav": {"home": "Главная"}}
            }))
        );
    }

    #[test]
    fn test_no_match_is_none() {
        assert!(find_locale_keys(&registry_data(), &KeyPredicate::contains("zzz")).is_none());
    }
}
