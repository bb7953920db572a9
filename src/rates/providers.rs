//! HTTP exchange-rate sources.
//!
//! Two independent providers with different wire shapes, both normalized
//! into [`RateTable`]. Providers are behind a trait so the resolution
//! chain and its tests can swap them out.

use crate::rates::models::{RateOrigin, RateTable};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

const EXCHANGE_RATE_API_BASE: &str = "https://v6.exchangerate-api.com";
const FRANKFURTER_BASE: &str = "https://api.frankfurter.app";
const DEMO_API_KEY: &str = "demo-key";

/// A single network source of exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short provider name for logging.
    fn name(&self) -> &'static str;

    /// Fetches a rate table for the given base currency.
    async fn fetch(&self, base: &str) -> Result<RateTable>;
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// ExchangeRate-API v6 (`/v6/{key}/latest/{base}`), the primary source.
pub struct ExchangeRateApiSource {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateApiResponse {
    base_code: String,
    conversion_rates: HashMap<String, f64>,
}

impl ExchangeRateApiSource {
    /// Creates the source with a request timeout and an optional API key
    /// (the provider accepts a demo key for low-volume use).
    pub fn new(timeout: Duration, api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(EXCHANGE_RATE_API_BASE.to_string(), timeout, api_key)
    }

    /// Creates the source against a custom base URL (for testing).
    pub fn with_base_url(
        base_url: String,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            api_key: api_key.unwrap_or_else(|| DEMO_API_KEY.to_string()),
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiSource {
    fn name(&self) -> &'static str {
        "exchangerate-api"
    }

    async fn fetch(&self, base: &str) -> Result<RateTable> {
        let url = format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base.to_uppercase());
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("Failed to send request")?;

        if !response.status().is_success() {
            anyhow::bail!("exchangerate-api returned status: {}", response.status());
        }

        let body: ExchangeRateApiResponse =
            response.json().await.context("Failed to decode exchangerate-api body")?;

        info!("Fetched {} rates for {} from exchangerate-api", body.conversion_rates.len(), base);
        Ok(RateTable::new(body.base_code, body.conversion_rates, RateOrigin::Primary))
    }
}

/// Frankfurter (`/latest?base={base}`), the secondary source. No API key;
/// different field names, normalized to the common table shape.
pub struct FrankfurterSource {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    base: String,
    rates: HashMap<String, f64>,
}

impl FrankfurterSource {
    /// Creates the source with a request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(FRANKFURTER_BASE.to_string(), timeout)
    }

    /// Creates the source against a custom base URL (for testing).
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self> {
        Ok(Self { client: build_client(timeout)?, base_url })
    }
}

#[async_trait]
impl RateSource for FrankfurterSource {
    fn name(&self) -> &'static str {
        "frankfurter"
    }

    async fn fetch(&self, base: &str) -> Result<RateTable> {
        let url = format!("{}/latest?base={}", self.base_url, base.to_uppercase());
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("Failed to send request")?;

        if !response.status().is_success() {
            anyhow::bail!("frankfurter returned status: {}", response.status());
        }

        let body: FrankfurterResponse =
            response.json().await.context("Failed to decode frankfurter body")?;

        info!("Fetched {} rates for {} from frankfurter", body.rates.len(), base);
        Ok(RateTable::new(body.base, body.rates, RateOrigin::Secondary))
    }
}
