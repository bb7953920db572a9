//! Rate resolution chain: cache, network sources, snapshot, built-in.
//!
//! `get_rates` always returns a usable table. Network and storage failures
//! are logged and swallowed; the compiled-in default table is the terminal
//! fallback and never fails.

use crate::rates::models::{RateOrigin, RateTable};
use crate::rates::providers::RateSource;
use crate::rates::store::SnapshotStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How long a cached table stays fresh.
pub const CACHE_MAX_AGE_HOURS: i64 = 24;

// Static fallback multipliers relative to USD, used when every other
// resolution step has failed.
const DEFAULT_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("JPY", 110.0),
    ("AUD", 1.35),
    ("CAD", 1.25),
    ("CHF", 0.92),
    ("CNY", 6.45),
    ("INR", 74.5),
    ("BRL", 5.25),
    ("MXN", 20.0),
    ("TRY", 8.5),
    ("ARS", 98.0),
    ("PHP", 50.0),
    ("IDR", 14350.0),
];

/// Read seam for consumers of rate tables; lets the savings engine run
/// against fakes in tests.
#[async_trait]
pub trait RateLookup: Send + Sync {
    /// Resolves a rate table for the base currency.
    async fn get_rates(&self, base: &str) -> Result<RateTable>;
}

/// Owns the cache, the ordered network sources, and the snapshot store.
///
/// Constructed explicitly and passed to the calculator; there is no
/// process-wide instance.
pub struct RateService {
    sources: Vec<Box<dyn RateSource>>,
    store: Arc<dyn SnapshotStore>,
    cache: RwLock<HashMap<String, RateTable>>,
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    max_age: chrono::Duration,
}

impl RateService {
    /// Creates a service over ordered sources (primary first) and a
    /// snapshot store. Fails if the built-in default table is empty,
    /// since that would break the terminal fallback guarantee.
    pub fn new(sources: Vec<Box<dyn RateSource>>, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        anyhow::ensure!(
            !DEFAULT_RATES.is_empty(),
            "built-in default rate table is empty; refusing to start"
        );
        Ok(Self {
            sources,
            store,
            cache: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            max_age: chrono::Duration::hours(CACHE_MAX_AGE_HOURS),
        })
    }

    /// Resolves a table through the chain: fresh cache, network sources in
    /// order, stored snapshot of any age, built-in defaults.
    pub async fn get_rates(&self, base: &str) -> Result<RateTable> {
        let key = base.to_uppercase();

        if let Some(table) = self.cached_fresh(&key) {
            debug!("Rate cache hit for {}", key);
            return Ok(table);
        }

        // Single-flight: concurrent misses for the same base share one
        // fetch. Laggards re-check the cache once the winner finishes.
        let gate = self.gate_for(&key).await;
        let _guard = gate.lock().await;

        if let Some(table) = self.cached_fresh(&key) {
            debug!("Rate cache populated while waiting for {}", key);
            return Ok(table);
        }

        self.resolve(&key).await
    }

    /// Forces resolution from the network chain, ignoring any fresh cache
    /// entry. Still de-duplicates concurrent refreshes.
    pub async fn refresh_rates(&self, base: &str) -> Result<RateTable> {
        let key = base.to_uppercase();
        let gate = self.gate_for(&key).await;
        let _guard = gate.lock().await;
        self.resolve(&key).await
    }

    /// Seeds the in-memory cache with a known table.
    pub fn prime_cache(&self, table: RateTable) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(table.base.clone(), table);
        }
    }

    fn cached_fresh(&self, key: &str) -> Option<RateTable> {
        let cache = self.cache.read().ok()?;
        let table = cache.get(key)?;
        if table.is_stale(self.max_age) {
            debug!("Cached rates for {} are stale", key);
            return None;
        }
        Some(table.clone())
    }

    async fn gate_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut gates = self.inflight.lock().await;
        gates.entry(key.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }

    async fn resolve(&self, key: &str) -> Result<RateTable> {
        for source in &self.sources {
            match source.fetch(key).await {
                Ok(table) => {
                    info!("Resolved {} rates via {}", key, source.name());
                    self.remember(&table);
                    return Ok(table);
                }
                Err(e) => {
                    warn!("Rate source {} failed for {}: {:#}", source.name(), key, e);
                }
            }
        }

        if let Some(table) = self.load_snapshot(key) {
            warn!(
                "All rate sources failed for {}; using snapshot captured {}",
                key, table.captured_at
            );
            return Ok(table);
        }

        info!("No rates available for {}; falling back to built-in defaults", key);
        Ok(builtin_table(key))
    }

    fn remember(&self, table: &RateTable) {
        self.prime_cache(table.clone());

        match serde_json::to_string(table) {
            Ok(json) => {
                if let Err(e) = self.store.set(&snapshot_key(&table.base), &json) {
                    warn!("Failed to persist rate snapshot for {}: {:#}", table.base, e);
                }
            }
            Err(e) => warn!("Failed to encode rate snapshot for {}: {}", table.base, e),
        }
    }

    fn load_snapshot(&self, key: &str) -> Option<RateTable> {
        let raw = self.store.get(&snapshot_key(key))?;
        match serde_json::from_str::<RateTable>(&raw) {
            Ok(mut table) => {
                table.origin = RateOrigin::Snapshot;
                Some(table)
            }
            Err(e) => {
                warn!("Ignoring corrupt rate snapshot for {}: {}", key, e);
                None
            }
        }
    }
}

#[async_trait]
impl RateLookup for RateService {
    async fn get_rates(&self, base: &str) -> Result<RateTable> {
        RateService::get_rates(self, base).await
    }
}

fn snapshot_key(base: &str) -> String {
    format!("rates_{}", base)
}

/// Builds the compiled-in default table, re-based when the base is not
/// USD. An unknown base keeps a multiplier of 1, mirroring the converter's
/// permissive fallback.
pub fn builtin_table(base: &str) -> RateTable {
    let base = base.to_uppercase();
    let base_rate = DEFAULT_RATES
        .iter()
        .find(|(code, _)| *code == base)
        .map(|(_, rate)| *rate)
        .unwrap_or(1.0);

    let rates = DEFAULT_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), rate / base_rate))
        .collect();

    RateTable::new(base, rates, RateOrigin::BuiltIn)
}
