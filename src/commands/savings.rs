//! Savings computation command.

use crate::arbitrage::{SavingsEngine, SavingsHistory};
use crate::config::{Config, OutputFormat};
use crate::format::Formatter;
use crate::price;
use crate::sites::Site;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Computes and renders savings for a price found in the given text.
pub async fn run_savings(
    config: &Config,
    text: &str,
    site: Option<Site>,
    currencies: Option<Vec<String>>,
    record: bool,
) -> Result<String> {
    let service = Arc::new(super::build_rate_service(config)?);
    let engine = SavingsEngine::new(service, config.regional_table(), config.fee_policy());
    let history = SavingsHistory::new(super::open_store(config)?);
    run_savings_with_engine(&engine, Some(&history), config, text, site, currencies, record).await
}

/// Like [`run_savings`], with an injected engine and history (for testing).
pub async fn run_savings_with_engine(
    engine: &SavingsEngine,
    history: Option<&SavingsHistory>,
    config: &Config,
    text: &str,
    site: Option<Site>,
    currencies: Option<Vec<String>>,
    record: bool,
) -> Result<String> {
    if let Some(site) = site {
        if !config.site_enabled(site) {
            anyhow::bail!("Site '{}' is disabled in your configuration", site);
        }
    }

    let Some(detected) = price::parse_with_default(text, &config.base_currency) else {
        anyhow::bail!("No price found in \"{}\"", text);
    };

    info!(
        "Detected {} on {}",
        detected.money,
        site.map(|s| s.display_name()).unwrap_or("unknown site")
    );

    let candidates = currencies.unwrap_or_else(|| config.preferred_currencies.clone());
    let report = engine.compute(site, &detected.money, &candidates).await?;

    if record && !report.is_empty() {
        if let Some(history) = history {
            // A failed history write must not lose the computed report.
            if let Err(e) = history.record_best(site, &report) {
                warn!("Failed to record savings: {:#}", e);
            }
        }
    }

    // JSON and CSV stay machine-readable; no prose around them.
    let formatter = Formatter::new(config.format);
    if matches!(config.format, OutputFormat::Json | OutputFormat::Csv) {
        return Ok(formatter.format_report(&report));
    }

    let mut output = format!(
        "{}\n\n{}",
        formatter.format_detection(&detected),
        formatter.format_report(&report)
    );

    if config.notify_vpn && config.format == OutputFormat::Table {
        if let Some(best) = report.best() {
            if best.requires_vpn {
                output.push_str(
                    "\n\n💡 The best option needs a VPN exit in the target region to sign up.",
                );
            }
        }
    }

    Ok(output)
}

/// Runs only the parser and renders the detection.
pub fn run_parse(config: &Config, text: &str) -> Result<String> {
    match price::parse_with_default(text, &config.base_currency) {
        Some(detected) => Ok(Formatter::new(config.format).format_detection(&detected)),
        None => anyhow::bail!("No price found in \"{}\"", text),
    }
}
