//! Price extraction from unstructured page text.
//!
//! A single pattern captures an optional currency marker, a numeric amount
//! with thousands separators, and an optional trailing ISO code. Currency
//! resolution prefers the trailing code, then the symbol prefix, then the
//! caller's default.

use crate::currency;
use crate::price::models::{DetectedPrice, Money};
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::trace;

const DEFAULT_CURRENCY: &str = "USD";

// Optional prefix (up to two alpha chars before a symbol, or a bare
// multi-char symbol), amount with comma groups and 0-2 decimals, optional
// trailing ISO code.
static PRICE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:([A-Z]{0,2}[$€£¥₹₺₱₫฿₽]|CHF|Rp|zł)\s*)?([\d,]+(?:\.\d{0,2})?)(?:\s*([A-Z]{3})\b)?")
        .unwrap()
});

/// Extracts the first price from a text fragment, defaulting bare amounts
/// to USD. Returns `None` when no numeric price is present.
pub fn parse(text: &str) -> Option<DetectedPrice> {
    parse_with_default(text, DEFAULT_CURRENCY)
}

/// Extracts the first price from a text fragment, defaulting bare amounts
/// to the given currency.
pub fn parse_with_default(text: &str, default_currency: &str) -> Option<DetectedPrice> {
    let caps = PRICE_PATTERN.captures(text)?;

    let raw_amount = caps.get(2)?.as_str();
    let amount: f64 = raw_amount.replace(',', "").parse().ok()?;

    // Trailing ISO code wins over the symbol prefix; bare numbers fall
    // back to the caller's default.
    let code = if let Some(suffix) = caps.get(3) {
        suffix.as_str().to_string()
    } else if let Some(prefix) = caps.get(1) {
        match currency::code_for_symbol(prefix.as_str()) {
            Some(code) => code.to_string(),
            None => default_currency.to_uppercase(),
        }
    } else {
        default_currency.to_uppercase()
    };

    let matched = caps.get(0).map(|m| m.as_str().trim()).unwrap_or(raw_amount);
    trace!("Matched '{}' as {} {}", matched, code, amount);

    Some(DetectedPrice::new(Money::new(amount, code), matched))
}

/// Scans text fragments in document order and returns the first successful
/// parse. This is the fallback-scan policy: ordering is decided here, not
/// in `parse`.
pub fn scan<'a, I>(fragments: I) -> Option<DetectedPrice>
where
    I: IntoIterator<Item = &'a str>,
{
    scan_with_default(fragments, DEFAULT_CURRENCY)
}

/// Like [`scan`], with an explicit default currency for bare amounts.
pub fn scan_with_default<'a, I>(fragments: I, default_currency: &str) -> Option<DetectedPrice>
where
    I: IntoIterator<Item = &'a str>,
{
    fragments.into_iter().find_map(|text| parse_with_default(text, default_currency))
}
