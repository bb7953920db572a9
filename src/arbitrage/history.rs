//! Bounded durable log of applied savings.

use crate::arbitrage::models::{SavingsRecord, SavingsReport};
use crate::rates::SnapshotStore;
use crate::sites::Site;
use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum records kept; the oldest are evicted beyond this.
pub const HISTORY_CAPACITY: usize = 100;

const HISTORY_KEY: &str = "savings_history";

/// Append-mostly savings history on top of the snapshot store.
pub struct SavingsHistory {
    store: Arc<dyn SnapshotStore>,
}

impl SavingsHistory {
    /// Creates a history over a store.
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Loads all records, oldest first. Missing or corrupt history reads
    /// as empty.
    pub fn load(&self) -> Vec<SavingsRecord> {
        let Some(raw) = self.store.get(HISTORY_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring corrupt savings history: {}", e);
                Vec::new()
            }
        }
    }

    /// Appends a record, evicting the oldest entries beyond capacity.
    pub fn record(&self, record: SavingsRecord) -> Result<()> {
        let mut records = self.load();
        records.push(record);

        if records.len() > HISTORY_CAPACITY {
            let excess = records.len() - HISTORY_CAPACITY;
            records.drain(..excess);
        }

        let json = serde_json::to_string(&records).context("Failed to encode savings history")?;
        self.store.set(HISTORY_KEY, &json)
    }

    /// Records the best option of a report, if any. Returns whether a
    /// record was written.
    pub fn record_best(&self, site: Option<Site>, report: &SavingsReport) -> Result<bool> {
        let Some(best) = report.best() else {
            debug!("No best option; nothing to record");
            return Ok(false);
        };

        let now = Utc::now();
        self.record(SavingsRecord {
            id: now.timestamp_millis().to_string(),
            site: site.map(|s| s.id().to_string()).unwrap_or_else(|| "unknown".to_string()),
            original_price: best.original_price.clone(),
            saved_amount: best.net_savings,
            saved_currency: best.target_currency.clone(),
            recorded_at: now,
        })?;
        Ok(true)
    }
}
