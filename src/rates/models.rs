//! Rate table model shared by providers, cache, and converter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which step of the resolution chain produced a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    /// Fresh in-memory cache hit
    Cache,
    /// Primary network source
    Primary,
    /// Secondary network source
    Secondary,
    /// Durable snapshot of unknown age
    Snapshot,
    /// Compiled-in defaults, the terminal fallback
    #[default]
    BuiltIn,
}

impl std::fmt::Display for RateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RateOrigin::Cache => "cache",
            RateOrigin::Primary => "primary",
            RateOrigin::Secondary => "secondary",
            RateOrigin::Snapshot => "snapshot",
            RateOrigin::BuiltIn => "built-in",
        };
        write!(f, "{}", label)
    }
}

/// A snapshot of multipliers relative to a base currency.
///
/// Consumers never mutate a table; refreshes produce new ones, so holders
/// of old snapshots are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// The currency the multipliers are relative to
    pub base: String,
    /// Currency code to multiplier; `rates[base]` is implicitly 1
    pub rates: HashMap<String, f64>,
    /// When the table was captured
    pub captured_at: DateTime<Utc>,
    /// Which chain step produced it
    #[serde(default)]
    pub origin: RateOrigin,
}

impl RateTable {
    /// Creates a table captured now.
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>, origin: RateOrigin) -> Self {
        Self { base: base.into().to_uppercase(), rates, captured_at: Utc::now(), origin }
    }

    /// Returns the multiplier for a code, treating the base as 1.
    pub fn rate(&self, code: &str) -> Option<f64> {
        if code == self.base {
            return Some(1.0);
        }
        self.rates.get(code).copied()
    }

    /// True when the capture time is older than `max_age`.
    pub fn is_stale(&self, max_age: chrono::Duration) -> bool {
        Utc::now() - self.captured_at > max_age
    }
}
