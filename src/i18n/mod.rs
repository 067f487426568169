//! Internationalization (i18n) core: translation registry, resolvers and
//! locale-aware formatting.
//!
//! # Architecture
//!
//! - `tree`: Translation trees and dotted-path utilities (`flatten`, `traverse`, `gen`)
//! - `scope`: Dotted scope paths used to prefix keys
//! - `registry`: Locale → translation tree store with change notification
//! - `notifier`: Ordered, synchronous change listeners
//! - `resolver`: Key resolution, scoping, default seeding and override chains
//! - `interpolate`: `%(name)s` placeholder substitution
//! - `currency`: Localized money strings
//! - `find_keys`: Diagnostic search over registered translations
//!
//! # Example
//!
//! ```rust,ignore
//! use scoped_locale::i18n::{Resolver, TranslationRegistry, TranslationTree};
//!
//! let registry = Arc::new(TranslationRegistry::new());
//! let t = Resolver::new(registry.clone());
//!
//! let editor = t.scoped("nti-content.editor", Some(&defaults));
//! let title = editor.get("figureTitle")?;
//!
//! // Site strings win where they exist, package defaults elsewhere
//! let site = t.scoped("site.editor", None);
//! let text = editor.override_with(&site).get("figureTitle")?;
//! ```

mod currency;
mod error;
mod find_keys;
mod interpolate;
mod notifier;
mod registry;
mod resolver;
mod scope;
mod tree;

pub use currency::{
    get_localized_currency_string, DEFAULT_CURRENCY, DEFAULT_FORMAT_LOCALE, MAX_SIGNIFICANT_DIGITS,
};
pub use error::LocaleError;
pub use find_keys::{filter_tree, find_locale_keys, KeyPredicate};
pub use interpolate::{has_placeholders, interpolate};
pub use notifier::{ChangeListener, ChangeNotifier, ListenerId};
pub use registry::{TranslationRegistry, DEFAULT_LOCALE};
pub use resolver::{
    compose, is_missing_value, missing_translation, Resolver, TranslateOptions, MISSING_PREFIX,
};
pub use scope::ScopePath;
pub use tree::{flatten, gen, lookup, segments, traverse, TranslationTree, SEPARATOR};
