//! Resolvers: key → localized string, with scoping and override chains.
//!
//! A [`Resolver`] is either a direct view over a [`TranslationRegistry`]
//! (optionally bound to a scope prefix) or the composition of two
//! resolvers where the most recently added one wins unless it is missing
//! the key. Resolvers are immutable and cheap to clone; composing never
//! changes the inputs.
//!
//! ```rust,ignore
//! let registry = Arc::new(TranslationRegistry::new());
//! let t = Resolver::new(registry.clone());
//!
//! let defaults = TranslationTree::from(json!({"link1": "hello"}));
//! let contact = t.scoped("course.contact-info", Some(&defaults));
//!
//! assert_eq!(contact.get("link1")?, "hello");
//! ```

use crate::i18n::interpolate::interpolate;
use crate::i18n::registry::TranslationRegistry;
use crate::i18n::scope::ScopePath;
use crate::i18n::tree::{flatten, TranslationTree};
use crate::i18n::LocaleError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of every missing-translation sentinel.
pub const MISSING_PREFIX: &str = "missing translation: ";

/// The sentinel returned for a key with no value.
pub fn missing_translation(locale: &str, path: &str) -> String {
    format!("{}{}.{}", MISSING_PREFIX, locale, path)
}

/// Check whether a resolved string is a missing-value sentinel.
///
/// Matches any string starting with "missing", ignoring case.
pub fn is_missing_value(value: &str) -> bool {
    value
        .get(..7)
        .is_some_and(|head| head.eq_ignore_ascii_case("missing"))
}

/// Options for a single translation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Scope prefix for the key (only honoured by unscoped resolvers)
    pub scope: Option<String>,

    /// Returned (after interpolation) when the key has no value
    pub fallback: Option<String>,

    /// Values for `%(name)s` placeholders
    pub bindings: BTreeMap<String, String>,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Bind a placeholder value.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.bindings.insert(name.into(), value.to_string());
        self
    }
}

enum ResolverKind {
    Direct {
        registry: Arc<TranslationRegistry>,
        scope: ScopePath,
    },
    Override {
        base: Resolver,
        top: Resolver,
    },
}

/// Resolves translation keys to strings.
#[derive(Clone)]
pub struct Resolver {
    kind: Arc<ResolverKind>,
}

impl Resolver {
    /// The top-level, unscoped resolver over `registry`.
    pub fn new(registry: Arc<TranslationRegistry>) -> Self {
        Self::direct(registry, ScopePath::default())
    }

    fn direct(registry: Arc<TranslationRegistry>, scope: ScopePath) -> Self {
        Self {
            kind: Arc::new(ResolverKind::Direct { registry, scope }),
        }
    }

    /// Bound scope of a direct resolver; `None` for a composed one.
    pub fn scope(&self) -> Option<&ScopePath> {
        match &*self.kind {
            ResolverKind::Direct { scope, .. } => Some(scope),
            ResolverKind::Override { .. } => None,
        }
    }

    /// Resolve `key` with `options`.
    ///
    /// # Returns
    /// * `Ok(value)` with placeholders substituted when the key exists
    /// * `Ok(fallback)` when the key is absent and a fallback was given
    /// * `Ok("missing translation: <locale>.<path>")` otherwise
    /// * `Err` when the value has a placeholder with no binding
    pub fn translate(&self, key: &str, options: &TranslateOptions) -> Result<String, LocaleError> {
        match &*self.kind {
            ResolverKind::Direct { registry, scope } => {
                translate_direct(registry, scope, key, options)
            }
            ResolverKind::Override { base, top } => {
                if !top.is_missing(key) {
                    top.translate(key, options)
                } else if !base.is_missing(key) {
                    base.translate(key, options)
                } else {
                    Ok(format!(
                        "{}, {}",
                        base.translate(key, options)?,
                        top.translate(key, options)?
                    ))
                }
            }
        }
    }

    /// Resolve `key` with no options.
    pub fn get(&self, key: &str) -> Result<String, LocaleError> {
        self.translate(key, &TranslateOptions::default())
    }

    /// Check whether `key` has no value through this resolver.
    ///
    /// A value whose interpolation fails is present: the failure comes from
    /// a real template lacking bindings.
    pub fn is_missing(&self, key: &str) -> bool {
        match &*self.kind {
            ResolverKind::Direct { .. } => match self.get(key) {
                Ok(value) => is_missing_value(&value),
                Err(_) => false,
            },
            ResolverKind::Override { base, top } => base.is_missing(key) && top.is_missing(key),
        }
    }

    /// Compose with `top`, which takes precedence wherever it has a value.
    pub fn override_with(&self, top: &Resolver) -> Resolver {
        compose(self, top)
    }

    /// A resolver for the deeper scope `scope` under this one.
    ///
    /// When `defaults` is given, every default whose full path is missing at
    /// this moment is registered for the current locale. Keys that already
    /// have a value are never touched, and nothing is re-checked later.
    ///
    /// On a composed resolver both sides are scoped and recomposed in the
    /// same order.
    pub fn scoped(&self, scope: &str, defaults: Option<&TranslationTree>) -> Resolver {
        match &*self.kind {
            ResolverKind::Direct {
                registry,
                scope: bound,
            } => scoped_direct(registry, bound.join(&ScopePath::parse(scope)), defaults),
            ResolverKind::Override { base, top } => {
                compose(&base.scoped(scope, defaults), &top.scoped(scope, defaults))
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            ResolverKind::Direct { scope, .. } => f
                .debug_struct("Resolver")
                .field("scope", &scope.to_string())
                .finish(),
            ResolverKind::Override { base, top } => f
                .debug_struct("Override")
                .field("base", base)
                .field("top", top)
                .finish(),
        }
    }
}

/// Compose `base` and `top`: `top` wins unless it is missing the key, then
/// `base`; when both are missing both sentinels are returned joined by
/// `", "`.
pub fn compose(base: &Resolver, top: &Resolver) -> Resolver {
    Resolver {
        kind: Arc::new(ResolverKind::Override {
            base: base.clone(),
            top: top.clone(),
        }),
    }
}

fn translate_direct(
    registry: &TranslationRegistry,
    bound: &ScopePath,
    key: &str,
    options: &TranslateOptions,
) -> Result<String, LocaleError> {
    let scope = if bound.is_empty() {
        options
            .scope
            .as_deref()
            .map(ScopePath::parse)
            .unwrap_or_default()
    } else {
        bound.clone()
    };

    let path = scope.qualify(key);
    let locale = registry.get_locale();

    match registry.lookup(&locale, &path) {
        Some(value) => interpolate(&value, &options.bindings),
        None => match options.fallback.as_deref() {
            Some(fallback) => interpolate(fallback, &options.bindings),
            None => {
                debug!("No translation for {}.{}", locale, path);
                Ok(missing_translation(&locale, &path))
            }
        },
    }
}

fn scoped_direct(
    registry: &Arc<TranslationRegistry>,
    scope: ScopePath,
    defaults: Option<&TranslationTree>,
) -> Resolver {
    if !scope.is_namespaced() {
        warn!("\"{}\" is a bad locale scope (\"key\" path prefix)", scope);
    }

    if let Some(defaults) = defaults {
        seed_defaults(registry, &scope, defaults);
    }

    Resolver::direct(registry.clone(), scope)
}

/// Register each default whose full path has no value yet.
fn seed_defaults(registry: &TranslationRegistry, scope: &ScopePath, defaults: &TranslationTree) {
    let seeded = registry.seed_missing(flatten(defaults, &scope.to_string()));

    if seeded > 0 {
        debug!("Seeded {} default translations under {}", seeded, scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tree(value: serde_json::Value) -> TranslationTree {
        TranslationTree::from(value)
    }

    fn setup() -> (Arc<TranslationRegistry>, Resolver) {
        let registry = Arc::new(TranslationRegistry::new());
        let t = Resolver::new(registry.clone());
        (registry, t)
    }

    // ==================== Sentinel Tests ====================

    #[test]
    fn test_is_missing_value() {
        assert!(is_missing_value("missing translation: en.a"));
        assert!(is_missing_value("MISSING thing"));
        assert!(!is_missing_value("present"));
        assert!(!is_missing_value("miss"));
        assert!(!is_missing_value(""));
    }

    #[test]
    fn test_is_missing_value_non_ascii_does_not_panic() {
        assert!(!is_missing_value("привет мир"));
    }

    // ==================== translate Tests ====================

    #[test]
    fn test_translate_top_level() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"foo": "bar"})));
        assert_eq!(t.get("foo").unwrap(), "bar");
    }

    #[test]
    fn test_translate_missing_returns_sentinel() {
        let (_registry, t) = setup();
        assert_eq!(t.get("a.b").unwrap(), "missing translation: en.a.b");
    }

    #[test]
    fn test_translate_uses_option_scope() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"x": {"y": {"k": "v"}}})));
        let options = TranslateOptions::new().with_scope("x.y");
        assert_eq!(t.translate("k", &options).unwrap(), "v");
    }

    #[test]
    fn test_translate_interpolates_bindings() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"fig": "Figure %(index)s"})));
        let options = TranslateOptions::new().with("index", 3);
        assert_eq!(t.translate("fig", &options).unwrap(), "Figure 3");
    }

    #[test]
    fn test_translate_unbound_placeholder_errors() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"fig": "Figure %(index)s"})));
        assert!(t.get("fig").is_err());
    }

    #[test]
    fn test_translate_uses_current_locale() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"hi": "hello"})));
        registry.register_translations("ru", tree(json!({"hi": "привет"})));
        registry.set_locale_override(Some("ru".to_string()));

        assert_eq!(t.get("hi").unwrap(), "привет");
        assert_eq!(t.get("nope").unwrap(), "missing translation: ru.nope");
    }

    #[test]
    fn test_fallback_used_only_when_absent() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"a": "value"})));
        let options = TranslateOptions::new().with_fallback("dude!");

        assert_eq!(t.translate("a", &options).unwrap(), "value");
        assert_eq!(t.translate("b", &options).unwrap(), "dude!");
    }

    #[test]
    fn test_container_path_is_missing() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"a": {"b": "c"}})));
        assert!(t.is_missing("a"));
    }

    // ==================== is_missing Tests ====================

    #[test]
    fn test_is_missing_true_and_false() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"here": "yes"})));
        assert!(!t.is_missing("here"));
        assert!(t.is_missing("gone"));
    }

    #[test]
    fn test_is_missing_treats_interpolation_error_as_present() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"tpl": "Hi %(name)s"})));
        assert!(!t.is_missing("tpl"));
    }

    // ==================== scoped Tests ====================

    #[test]
    fn test_scoped_prefixes_key() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"a": {"b": {"foo": "baz"}}, "foo": "bar"})));
        let scoped = t.scoped("a.b", None);

        assert_eq!(scoped.get("foo").unwrap(), "baz");
        assert_eq!(t.get("foo").unwrap(), "bar");
        assert!(!scoped.is_missing("foo"));
    }

    #[test]
    fn test_scoped_ignores_option_scope() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"a": {"b": {"k": "scoped"}}, "other": {"k": "x"}})));
        let scoped = t.scoped("a.b", None);
        let options = TranslateOptions::new().with_scope("other");
        assert_eq!(scoped.translate("k", &options).unwrap(), "scoped");
    }

    #[test]
    fn test_scoped_seeds_defaults() {
        let (_registry, t) = setup();
        let scoped = t.scoped("a.b", Some(&tree(json!({"baz": {"foodoo": "bar"}}))));

        assert_eq!(scoped.get("baz.foodoo").unwrap(), "bar");
        assert_eq!(t.get("a.b.baz.foodoo").unwrap(), "bar");
    }

    #[test]
    fn test_scoped_defaults_never_overwrite_existing() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"a": {"b": {"k": "localized"}}})));
        let scoped = t.scoped("a.b", Some(&tree(json!({"k": "default", "other": "o"}))));

        assert_eq!(scoped.get("k").unwrap(), "localized");
        assert_eq!(scoped.get("other").unwrap(), "o");
    }

    #[test]
    fn test_scoped_defaults_seed_into_current_locale() {
        let (registry, t) = setup();
        registry.set_locale("de");
        t.scoped("a.b", Some(&tree(json!({"k": "v"}))));

        assert_eq!(registry.lookup("de", "a.b.k").as_deref(), Some("v"));
        assert_eq!(registry.lookup("en", "a.b.k"), None);
    }

    #[test]
    fn test_rescoping_with_same_defaults_performs_no_mutation() {
        let (registry, t) = setup();
        let defaults = tree(json!({"x": "1", "y": {"z": "2"}}));
        t.scoped("a.b", Some(&defaults));

        let events = Arc::new(AtomicUsize::new(0));
        let counter = events.clone();
        registry.add_change_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        t.scoped("a.b", Some(&defaults));
        assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scoped_missing_sentinel_includes_scope() {
        let (_registry, t) = setup();
        let scoped = t.scoped("nti-lib-locale.test.scope", Some(&tree(json!({"baz": {"foodoo": "bar"}}))));
        assert_eq!(
            scoped.get("does.not.exist").unwrap(),
            "missing translation: en.nti-lib-locale.test.scope.does.not.exist"
        );
    }

    #[test]
    fn test_nested_scoping_concatenates() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"a": {"b": {"c": {"d": "deep"}}}})));

        let grouped_left = t.scoped("a.b", None).scoped("c", None);
        let grouped_right = t.scoped("a.b.c", None);

        assert_eq!(grouped_left.scope(), grouped_right.scope());
        assert_eq!(grouped_left.get("d").unwrap(), "deep");
    }

    #[test]
    fn test_bad_scope_still_resolves() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"bare": {"k": "v"}})));
        assert_eq!(t.scoped("bare", None).get("k").unwrap(), "v");
    }

    // ==================== Override Tests ====================

    fn override_fixture() -> (Arc<TranslationRegistry>, Resolver, Resolver) {
        let (registry, t) = setup();
        let base = t.scoped(
            "tests.override.base",
            Some(&tree(json!({"baseOnly": "base only", "both": "base both"}))),
        );
        let top = t.scoped(
            "tests.override.top",
            Some(&tree(json!({"topOnly": "top only", "both": "top both"}))),
        );
        (registry, base, top)
    }

    #[test]
    fn test_override_precedence() {
        let (_registry, base, top) = override_fixture();
        let composed = base.override_with(&top);

        assert_eq!(composed.get("baseOnly").unwrap(), "base only");
        assert_eq!(composed.get("topOnly").unwrap(), "top only");
        assert_eq!(composed.get("both").unwrap(), "top both");
    }

    #[test]
    fn test_override_both_missing_joins_sentinels() {
        let (_registry, base, top) = override_fixture();
        let composed = base.override_with(&top);

        assert_eq!(
            composed.get("none").unwrap(),
            "missing translation: en.tests.override.base.none, \
             missing translation: en.tests.override.top.none"
        );
        assert!(composed.is_missing("none"));
        assert!(!composed.is_missing("baseOnly"));
        assert!(!composed.is_missing("topOnly"));
    }

    #[test]
    fn test_override_leaves_inputs_untouched() {
        let (_registry, base, top) = override_fixture();
        let _composed = base.override_with(&top);

        assert_eq!(base.get("both").unwrap(), "base both");
        assert_eq!(top.get("both").unwrap(), "top both");
        assert!(base.is_missing("topOnly"));
    }

    #[test]
    fn test_override_chain_is_right_biased() {
        let (registry, base, top) = override_fixture();
        let t = Resolver::new(registry);
        let third = t.scoped(
            "tests.override.third",
            Some(&tree(json!({"thirdOnly": "third only", "both": "third both"}))),
        );

        let chained = base.override_with(&top).override_with(&third);

        assert_eq!(chained.get("both").unwrap(), "third both");
        assert_eq!(chained.get("baseOnly").unwrap(), "base only");
        assert_eq!(chained.get("topOnly").unwrap(), "top only");
        assert_eq!(chained.get("thirdOnly").unwrap(), "third only");
    }

    #[test]
    fn test_override_scoped_applies_to_both_sides() {
        let (registry, t) = setup();
        registry.register_translations(
            "en",
            tree(json!({
                "app": {"base": {"form": {"title": "Base", "hint": "base hint"}}},
                "site": {"top": {"form": {"title": "Site"}}}
            })),
        );

        let composed = t.scoped("app.base", None).override_with(&t.scoped("site.top", None));
        let form = composed.scoped("form", None);

        assert_eq!(form.get("title").unwrap(), "Site");
        assert_eq!(form.get("hint").unwrap(), "base hint");
    }

    #[test]
    fn test_override_passes_bindings_through() {
        let (registry, t) = setup();
        registry.register_translations("en", tree(json!({"p": {"q": {"n": "%(count)s items"}}})));
        let composed = t.scoped("x.y", None).override_with(&t.scoped("p.q", None));

        let options = TranslateOptions::new().with("count", 2);
        assert_eq!(composed.translate("n", &options).unwrap(), "2 items");
    }
}
