//! Savings history display command.

use crate::arbitrage::SavingsHistory;
use crate::config::Config;
use crate::format::Formatter;
use anyhow::Result;

/// Renders the recorded savings history.
pub fn run_history(config: &Config) -> Result<String> {
    let history = SavingsHistory::new(super::open_store(config)?);
    run_history_with(&history, config)
}

/// Like [`run_history`], with an injected history (for testing).
pub fn run_history_with(history: &SavingsHistory, config: &Config) -> Result<String> {
    Ok(Formatter::new(config.format).format_history(&history.load()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::SavingsRecord;
    use crate::config::OutputFormat;
    use crate::price::Money;
    use crate::rates::MemoryStore;
    use chrono::Utc;
    use std::sync::Arc;

    fn make_record(site: &str) -> SavingsRecord {
        SavingsRecord {
            id: "1".to_string(),
            site: site.to_string(),
            original_price: Money::new(15.99, "USD"),
            saved_amount: 783.3,
            saved_currency: "INR".to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_history_empty() {
        let history = SavingsHistory::new(Arc::new(MemoryStore::new()));
        let output = run_history_with(&history, &Config::default()).unwrap();
        assert!(output.contains("No savings recorded yet."));
    }

    #[test]
    fn test_history_lists_records() {
        let history = SavingsHistory::new(Arc::new(MemoryStore::new()));
        history.record(make_record("netflix")).unwrap();
        history.record(make_record("spotify")).unwrap();

        let output = run_history_with(&history, &Config::default()).unwrap();
        assert!(output.contains("netflix"));
        assert!(output.contains("spotify"));
        assert!(output.contains("Total: 2 records"));
    }

    #[test]
    fn test_history_json() {
        let history = SavingsHistory::new(Arc::new(MemoryStore::new()));
        history.record(make_record("netflix")).unwrap();

        let mut config = Config::default();
        config.format = OutputFormat::Json;

        let output = run_history_with(&history, &config).unwrap();
        let parsed: Vec<SavingsRecord> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
