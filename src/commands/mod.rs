//! CLI command implementations.

pub mod history;
pub mod rates;
pub mod savings;

pub use history::run_history;
pub use rates::run_rates;
pub use savings::{run_parse, run_savings};

use crate::config::Config;
use crate::rates::{
    ExchangeRateApiSource, FrankfurterSource, JsonFileStore, RateService, RateSource,
    SnapshotStore,
};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Opens the snapshot store at the configured or default location.
pub(crate) fn open_store(config: &Config) -> Result<Arc<dyn SnapshotStore>> {
    let store = match &config.data_dir {
        Some(dir) => JsonFileStore::new(dir)?,
        None => JsonFileStore::open_default()?,
    };
    Ok(Arc::new(store))
}

/// Builds the rate service from configuration: primary source, secondary
/// source, durable store.
pub(crate) fn build_rate_service(config: &Config) -> Result<RateService> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let sources: Vec<Box<dyn RateSource>> = vec![
        Box::new(ExchangeRateApiSource::new(timeout, config.api_key.clone())?),
        Box::new(FrankfurterSource::new(timeout)?),
    ];
    RateService::new(sources, open_store(config)?)
}
