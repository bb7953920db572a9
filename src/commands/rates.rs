//! Rate table display command.

use crate::config::Config;
use crate::format::Formatter;
use crate::rates::RateService;
use anyhow::Result;
use tracing::info;

/// Resolves and renders the rate table for a base currency.
pub async fn run_rates(config: &Config, base: Option<String>, refresh: bool) -> Result<String> {
    let service = super::build_rate_service(config)?;
    run_rates_with_service(&service, config, base, refresh).await
}

/// Like [`run_rates`], with an injected service (for testing).
pub async fn run_rates_with_service(
    service: &RateService,
    config: &Config,
    base: Option<String>,
    refresh: bool,
) -> Result<String> {
    let base = base.unwrap_or_else(|| config.base_currency.clone());

    let table = if refresh {
        service.refresh_rates(&base).await?
    } else {
        service.get_rates(&base).await?
    };

    info!("Resolved {} rates for {} via {}", table.rates.len(), table.base, table.origin);
    Ok(Formatter::new(config.format).format_rates(&table))
}
