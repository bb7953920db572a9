//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::arbitrage::policy::{self, FeePolicy, RegionalPriceTable, DEFAULT_CONVERSION_FEE_RATE};
use crate::price::Money;
use crate::sites::Site;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// User preferences with layered loading: file, then environment, then
/// CLI flags. Read before each computation; opaque to the core beyond the
/// accessors below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Currency assumed for bare amounts and used as the rate base default
    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    /// Candidate currencies, in preference order
    #[serde(default = "default_preferred_currencies")]
    pub preferred_currencies: Vec<String>,

    /// Sites savings may be computed for
    #[serde(default = "default_enabled_sites")]
    pub enabled_sites: Vec<Site>,

    /// Whether to surface VPN-required notices for the best option
    #[serde(default = "default_notify_vpn")]
    pub notify_vpn: bool,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Timeout per network attempt, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key for the primary rate provider
    #[serde(default)]
    pub api_key: Option<String>,

    /// Payment-processor markup as a fraction of the local price
    #[serde(default = "default_conversion_fee_rate")]
    pub conversion_fee_rate: f64,

    /// Currencies that need a VPN to pay in
    #[serde(default = "policy::default_vpn_required")]
    pub vpn_required: Vec<String>,

    /// VPN fee per currency, denominated in that currency
    #[serde(default = "policy::default_vpn_fees")]
    pub vpn_fees: HashMap<String, f64>,

    /// VPN fee for currencies without a specific entry
    #[serde(default = "default_vpn_fallback_fee")]
    pub vpn_fallback_fee: f64,

    /// Currency the fallback VPN fee is denominated in
    #[serde(default = "default_base_currency")]
    pub vpn_fallback_currency: String,

    /// Known list prices: site id to currency to monthly price
    #[serde(default = "policy::default_regional_prices")]
    pub regional_prices: HashMap<String, HashMap<String, f64>>,

    /// Override for the snapshot/history storage directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_preferred_currencies() -> Vec<String> {
    ["USD", "EUR", "GBP", "INR", "TRY", "ARS", "PHP", "BRL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_enabled_sites() -> Vec<Site> {
    Site::all().to_vec()
}

fn default_notify_vpn() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_conversion_fee_rate() -> f64 {
    DEFAULT_CONVERSION_FEE_RATE
}

fn default_vpn_fallback_fee() -> f64 {
    policy::default_vpn_fallback_fee().amount
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            preferred_currencies: default_preferred_currencies(),
            enabled_sites: default_enabled_sites(),
            notify_vpn: default_notify_vpn(),
            format: OutputFormat::Table,
            timeout_secs: default_timeout_secs(),
            api_key: None,
            conversion_fee_rate: default_conversion_fee_rate(),
            vpn_required: policy::default_vpn_required(),
            vpn_fees: policy::default_vpn_fees(),
            vpn_fallback_fee: default_vpn_fallback_fee(),
            vpn_fallback_currency: default_base_currency(),
            regional_prices: policy::default_regional_prices(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("subsaver.toml");
        if local_config.exists() {
            debug!("Found subsaver.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("subsaver").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var("SUBSAVER_BASE_CURRENCY") {
            if !base.trim().is_empty() {
                self.base_currency = base.to_uppercase();
            }
        }

        if let Ok(key) = std::env::var("SUBSAVER_API_KEY") {
            self.api_key = Some(key);
        }

        if let Ok(timeout) = std::env::var("SUBSAVER_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        self
    }

    /// True when savings may be computed for the site.
    pub fn site_enabled(&self, site: Site) -> bool {
        self.enabled_sites.contains(&site)
    }

    /// Builds the fee policy from the configured values.
    pub fn fee_policy(&self) -> FeePolicy {
        FeePolicy::new(
            self.conversion_fee_rate,
            self.vpn_required.clone(),
            self.vpn_fees.clone(),
            Money::new(self.vpn_fallback_fee, self.vpn_fallback_currency.clone()),
        )
    }

    /// Builds the regional price table from the configured values.
    pub fn regional_table(&self) -> RegionalPriceTable {
        RegionalPriceTable::from_map(self.regional_prices.clone())
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.preferred_currencies.len(), 8);
        assert_eq!(config.preferred_currencies[0], "USD");
        assert_eq!(config.enabled_sites.len(), 3);
        assert!(config.notify_vpn);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.api_key.is_none());
        assert_eq!(config.conversion_fee_rate, 0.03);
        assert_eq!(config.vpn_required.len(), 6);
        assert_eq!(config.vpn_fallback_fee, 3.99);
        assert_eq!(config.vpn_fallback_currency, "USD");
        assert!(config.regional_prices.contains_key("netflix"));
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml = r#"
            base_currency = "EUR"
            timeout_secs = 10
            notify_vpn = false
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.notify_vpn);
        // Untouched fields keep their defaults
        assert_eq!(config.conversion_fee_rate, 0.03);
        assert_eq!(config.preferred_currencies.len(), 8);
    }

    #[test]
    fn test_config_from_toml_tables() {
        let toml = r#"
            preferred_currencies = ["EUR", "INR"]
            enabled_sites = ["netflix"]
            vpn_required = ["INR"]

            [vpn_fees]
            INR = 19.9

            [regional_prices.netflix]
            INR = 450.0
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.preferred_currencies, vec!["EUR", "INR"]);
        assert_eq!(config.enabled_sites, vec![Site::Netflix]);
        assert!(config.site_enabled(Site::Netflix));
        assert!(!config.site_enabled(Site::Spotify));
        assert_eq!(config.vpn_fees.get("INR"), Some(&19.9));
        assert_eq!(config.regional_prices["netflix"]["INR"], 450.0);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            base_currency = "GBP"
            timeout_secs = 3
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.base_currency, "GBP");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/subsaver.toml");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"timeout_secs = 9"#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.timeout_secs, 9);
    }

    #[test]
    fn test_config_with_env() {
        let orig_base = std::env::var("SUBSAVER_BASE_CURRENCY").ok();
        let orig_key = std::env::var("SUBSAVER_API_KEY").ok();
        let orig_timeout = std::env::var("SUBSAVER_TIMEOUT").ok();

        std::env::set_var("SUBSAVER_BASE_CURRENCY", "eur");
        std::env::set_var("SUBSAVER_API_KEY", "secret-key");
        std::env::set_var("SUBSAVER_TIMEOUT", "7");

        let config = Config::new().with_env();
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.api_key, Some("secret-key".to_string()));
        assert_eq!(config.timeout_secs, 7);

        match orig_base {
            Some(v) => std::env::set_var("SUBSAVER_BASE_CURRENCY", v),
            None => std::env::remove_var("SUBSAVER_BASE_CURRENCY"),
        }
        match orig_key {
            Some(v) => std::env::set_var("SUBSAVER_API_KEY", v),
            None => std::env::remove_var("SUBSAVER_API_KEY"),
        }
        match orig_timeout {
            Some(v) => std::env::set_var("SUBSAVER_TIMEOUT", v),
            None => std::env::remove_var("SUBSAVER_TIMEOUT"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_timeout() {
        let orig = std::env::var("SUBSAVER_TIMEOUT").ok();
        std::env::set_var("SUBSAVER_TIMEOUT", "not_a_number");

        let config = Config::new().with_env();
        assert_eq!(config.timeout_secs, 5);

        match orig {
            Some(v) => std::env::set_var("SUBSAVER_TIMEOUT", v),
            None => std::env::remove_var("SUBSAVER_TIMEOUT"),
        }
    }

    #[test]
    fn test_fee_policy_from_config() {
        let mut config = Config::default();
        config.conversion_fee_rate = 0.05;
        config.vpn_required = vec!["INR".to_string()];

        let policy = config.fee_policy();
        assert_eq!(policy.conversion_fee_rate, 0.05);
        assert!(policy.requires_vpn("INR"));
        assert!(!policy.requires_vpn("TRY"));
    }

    #[test]
    fn test_regional_table_from_config() {
        let config = Config::default();
        let table = config.regional_table();
        assert_eq!(table.lookup(Site::Netflix, "INR"), Some(499.0));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.base_currency = "EUR".to_string();
        config.format = OutputFormat::Json;
        config.api_key = Some("k".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.base_currency, "EUR");
        assert_eq!(parsed.format, OutputFormat::Json);
        assert_eq!(parsed.api_key, Some("k".to_string()));
        assert_eq!(parsed.preferred_currencies, config.preferred_currencies);
    }
}
