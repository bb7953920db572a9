//! Data models for detected prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An amount in a specific currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    /// Amount, never negative
    pub amount: f64,
    /// ISO 4217 currency code (uppercase)
    pub currency: String,
}

impl Money {
    /// Creates a new amount. Negative inputs clamp to zero and currency
    /// codes are uppercased.
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self { amount: amount.max(0.0), currency: currency.into().to_uppercase() }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// A price extracted from page text, with the matched fragment kept for
/// observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedPrice {
    /// The parsed amount and currency
    pub money: Money,
    /// The exact text the pattern matched
    pub matched_text: String,
    /// When the detection happened
    pub detected_at: DateTime<Utc>,
}

impl DetectedPrice {
    /// Creates a detection stamped with the current time.
    pub fn new(money: Money, matched_text: impl Into<String>) -> Self {
        Self { money, matched_text: matched_text.into(), detected_at: Utc::now() }
    }
}
