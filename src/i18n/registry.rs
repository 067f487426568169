//! Translation registry: the store of locale → translation tree.
//!
//! All reads and the merge performed by [`TranslationRegistry::register_translations`]
//! go through a single `RwLock`, so a reader never observes a half-merged
//! tree. Change listeners run after the lock is released.

use crate::i18n::notifier::{ChangeListener, ChangeNotifier, ListenerId};
use crate::i18n::resolver::is_missing_value;
use crate::i18n::tree::{self, TranslationTree};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Locale used until something else is selected.
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug)]
struct RegistryState {
    /// Locale tracked by the registry itself
    locale: String,

    /// Locale supplied by the host; wins over `locale` when non-empty
    locale_override: Option<String>,

    /// Translation tree per locale
    translations: BTreeMap<String, TranslationTree>,
}

impl RegistryState {
    fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            locale_override: None,
            translations: BTreeMap::new(),
        }
    }

    fn current_locale(&self) -> &str {
        match self.locale_override.as_deref() {
            Some(locale) if !locale.is_empty() => locale,
            _ => &self.locale,
        }
    }
}

/// Store of translation trees keyed by locale.
///
/// Create one with [`TranslationRegistry::new`] and share it behind an
/// `Arc`; resolvers are views over it and never own it. A lazily created
/// process-wide instance is available from [`TranslationRegistry::global`].
#[derive(Debug)]
pub struct TranslationRegistry {
    state: RwLock<RegistryState>,
    notifier: ChangeNotifier,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<Arc<TranslationRegistry>> = OnceLock::new();

impl TranslationRegistry {
    /// Create an empty registry tracking [`DEFAULT_LOCALE`].
    pub fn new() -> Self {
        Self::with_locale(DEFAULT_LOCALE)
    }

    /// Create an empty registry tracking `locale`.
    pub fn with_locale(locale: &str) -> Self {
        Self {
            state: RwLock::new(RegistryState::new(locale)),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Get the process-wide registry.
    ///
    /// Initialized empty on first call; every later call returns the same
    /// instance.
    pub fn global() -> Arc<TranslationRegistry> {
        REGISTRY
            .get_or_init(|| Arc::new(TranslationRegistry::new()))
            .clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drop all translations and listeners and go back to the default locale.
    pub fn reset(&self) {
        *self.write() = RegistryState::new(DEFAULT_LOCALE);
        self.notifier.clear();
        debug!("Translation registry reset");
    }

    /// The current locale.
    ///
    /// The host override is used when it is set and non-empty; otherwise the
    /// locale tracked by the registry.
    pub fn get_locale(&self) -> String {
        self.read().current_locale().to_string()
    }

    /// Change the tracked locale and notify listeners.
    pub fn set_locale(&self, locale: &str) {
        self.write().locale = locale.to_string();
        info!("Locale set to {}", locale);
        self.notifier.notify(locale);
    }

    /// Set or clear the host-provided locale override.
    pub fn set_locale_override(&self, locale: Option<String>) {
        self.write().locale_override = locale;
    }

    /// Deep-merge `data` into the tree for `locale`, then notify listeners.
    ///
    /// Existing leaves are only replaced by leaves at the same path in
    /// `data`; containers are unioned.
    pub fn register_translations(&self, locale: &str, data: TranslationTree) {
        {
            let mut state = self.write();
            state
                .translations
                .entry(locale.to_string())
                .or_insert_with(TranslationTree::new)
                .merge(data);
        }
        debug!("Registered translations for {}", locale);

        // Lock released: listeners may read or register again.
        self.notifier.notify(locale);
    }

    /// Register each `(path, value)` whose path has no value in the current
    /// locale.
    ///
    /// The check and the merge happen under one write guard, so a string
    /// registered concurrently is never replaced by a default. Listeners are
    /// notified once per seeded entry after the guard is released. Returns
    /// the number of entries seeded.
    pub fn seed_missing<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let (locale, seeded) = {
            let mut state = self.write();
            let locale = state.current_locale().to_string();

            let missing: Vec<(String, String)> = entries
                .into_iter()
                .filter(|(path, _)| !has_value(state.translations.get(&locale), path))
                .collect();

            if !missing.is_empty() {
                let root = state
                    .translations
                    .entry(locale.clone())
                    .or_insert_with(TranslationTree::new);
                for (path, value) in &missing {
                    root.merge(tree::gen(path, value.as_str()));
                }
            }

            (locale, missing.len())
        };

        for _ in 0..seeded {
            self.notifier.notify(&locale);
        }
        seeded
    }

    /// The leaf string at `path` for `locale`, if there is one.
    pub fn lookup(&self, locale: &str, path: &str) -> Option<String> {
        let state = self.read();
        let root = state.translations.get(locale)?;
        tree::lookup(path, root)?.as_leaf().map(str::to_string)
    }

    /// Clone of the subtree (or leaf) at `path` in the current locale.
    pub fn available_translations(&self, path: &str) -> Option<TranslationTree> {
        let state = self.read();
        let root = state.translations.get(state.current_locale())?;
        tree::lookup(path, root).cloned()
    }

    /// Clone of every locale's translation tree.
    pub fn snapshot(&self) -> BTreeMap<String, TranslationTree> {
        self.read().translations.clone()
    }

    /// Locales that have translations registered.
    pub fn locales(&self) -> Vec<String> {
        self.read().translations.keys().cloned().collect()
    }

    /// Subscribe to registration events.
    pub fn add_change_listener(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> ListenerId {
        let listener: ChangeListener = Arc::new(listener);
        self.notifier.subscribe(listener)
    }

    /// Stop delivering events to a subscription.
    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

/// `true` when `path` holds a leaf that is not a missing-value sentinel.
fn has_value(root: Option<&TranslationTree>, path: &str) -> bool {
    root.and_then(|root| tree::lookup(path, root))
        .and_then(TranslationTree::as_leaf)
        .is_some_and(|value| !is_missing_value(value))
}

impl Default for TranslationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
