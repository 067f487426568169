//! Locale-aware money formatting.
//!
//! Numbers are rendered by ICU4X with its compiled CLDR data, so grouping,
//! separators and minimum grouping digits follow the locale (`$12,34,567`
//! in en-IN, `1234 €` in es-ES). Amounts keep at most 10 significant
//! digits with no padded fraction. Only the currency symbol and its
//! placement come from the small tables below.

use fixed_decimal::FixedDecimal;
use icu::decimal::{options::FixedDecimalFormatterOptions, FixedDecimalFormatter};
use icu::locid::Locale;
use std::str::FromStr;
use tracing::debug;
use writeable::Writeable;

/// Currency applied by callers that do not choose one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Locale used for formatting when none is given.
pub const DEFAULT_FORMAT_LOCALE: &str = "en-US";

/// Significant digits kept when formatting.
pub const MAX_SIGNIFICANT_DIGITS: i16 = 10;

const NBSP: &str = "\u{a0}";

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    /// `$123`
    Before,
    /// `€ 123`
    BeforeSpaced,
    /// `123 €`
    After,
}

/// Symbol placement in the CLDR currency pattern for `locale`.
fn symbol_position(locale: &Locale) -> SymbolPosition {
    let region = locale.id.region.as_ref().map(|region| region.as_str());

    match (locale.id.language.as_str(), region) {
        ("pt", Some("PT")) => SymbolPosition::After,
        ("nl" | "pt", _) => SymbolPosition::BeforeSpaced,
        (
            "bg" | "cs" | "da" | "de" | "es" | "et" | "fi" | "fr" | "hr" | "hu" | "is" | "it"
            | "lt" | "lv" | "nb" | "nn" | "no" | "pl" | "ro" | "ru" | "sk" | "sl" | "sr" | "sv"
            | "tr" | "uk" | "vi",
            _,
        ) => SymbolPosition::After,
        _ => SymbolPosition::Before,
    }
}

/// Display symbol for an ISO 4217 code in `language`; unknown codes
/// display as the code. `None` for something that is not a currency code.
fn currency_symbol(code: &str, language: &str) -> Option<String> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let code = code.to_ascii_uppercase();
    let symbol = match (code.as_str(), language) {
        ("SEK", "sv") | ("NOK", "nb" | "nn" | "no") | ("DKK", "da") => "kr",
        ("USD", _) => "$",
        ("EUR", _) => "€",
        ("GBP", _) => "£",
        ("JPY", _) => "¥",
        ("RUB", "ru") => "₽",
        ("INR", _) => "₹",
        ("KRW", _) => "₩",
        ("CNY", _) => "CN¥",
        ("CAD", _) => "CA$",
        ("AUD", _) => "A$",
        _ => return Some(code),
    };

    Some(symbol.to_string())
}

/// `value` as a decimal rounded half away from zero to
/// [`MAX_SIGNIFICANT_DIGITS`], without trailing zeros.
fn to_decimal(value: f64) -> Option<FixedDecimal> {
    // f64 Display never uses exponent notation, so subnormals parse too.
    let mut decimal = FixedDecimal::from_str(&value.to_string()).ok()?;
    let position = decimal.nonzero_magnitude_start() - (MAX_SIGNIFICANT_DIGITS - 1);
    decimal.half_expand(position);
    decimal.trim_end();
    Some(decimal)
}

/// The locale-formatted absolute value of `amount`.
fn format_number(amount: f64, locale: &Locale) -> Option<String> {
    let formatter =
        FixedDecimalFormatter::try_new(&locale.into(), FixedDecimalFormatterOptions::default())
            .map_err(|e| debug!("No decimal format for {}: {}", locale, e))
            .ok()?;

    let decimal = to_decimal(amount.abs())?;
    Some(formatter.format(&decimal).write_to_string().into_owned())
}

/// Localize a monetary amount into a string such as `"$123"` or `"1.234 £"`.
///
/// # Arguments
/// * `amount` - Amount or price value
/// * `currency` - ISO 4217 currency code ("USD", "GBP")
/// * `locale` - BCP 47 locale to format for; [`DEFAULT_FORMAT_LOCALE`] when `None`
///
/// # Returns
/// * `None` when there is no amount, or it is zero or NaN
/// * the plain amount when no currency is given
/// * `"<amount> <currency>"` when the locale or code cannot be formatted
/// * the localized currency string otherwise
pub fn get_localized_currency_string(
    amount: Option<f64>,
    currency: Option<&str>,
    locale: Option<&str>,
) -> Option<String> {
    let amount = amount.filter(|value| *value != 0.0 && !value.is_nan())?;

    let currency = match currency {
        Some(code) if !code.is_empty() => code,
        _ => return Some(amount.to_string()),
    };

    let tag = locale.unwrap_or(DEFAULT_FORMAT_LOCALE);
    match format_currency(amount, currency, tag) {
        Some(formatted) => Some(formatted),
        None => {
            debug!("No currency format for {} in {}", currency, tag);
            Some(format!("{} {}", amount, currency))
        }
    }
}

fn format_currency(amount: f64, currency: &str, tag: &str) -> Option<String> {
    if !amount.is_finite() {
        return None;
    }

    let locale: Locale = tag.replace('_', "-").parse().ok()?;
    let symbol = currency_symbol(currency, locale.id.language.as_str())?;
    let number = format_number(amount, &locale)?;
    let sign = if amount < 0.0 { "-" } else { "" };

    let formatted = match symbol_position(&locale) {
        SymbolPosition::Before if symbol.chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("{}{}{}{}", sign, symbol, NBSP, number)
        }
        SymbolPosition::Before => format!("{}{}{}", sign, symbol, number),
        SymbolPosition::BeforeSpaced => format!("{}{}{}{}", sign, symbol, NBSP, number),
        SymbolPosition::After => format!("{}{}{}{}", sign, number, NBSP, symbol),
    };

    Some(formatted)
}
