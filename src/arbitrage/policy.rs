//! Fee policy and regional list prices as swappable data.
//!
//! Both tables ship with defaults but are plain data: new sites and
//! currencies are additive through configuration, not code changes.

use crate::price::Money;
use crate::rates::{convert, RateTable};
use crate::sites::Site;
use std::collections::HashMap;

/// Currencies whose storefronts enforce region checks.
pub fn default_vpn_required() -> Vec<String> {
    ["INR", "TRY", "ARS", "PHP", "BRL", "MXN"].iter().map(|s| s.to_string()).collect()
}

/// Monthly VPN surcharge per currency, denominated in that currency.
pub fn default_vpn_fees() -> HashMap<String, f64> {
    HashMap::from([
        ("INR".to_string(), 29.90),
        ("TRY".to_string(), 4.00),
        ("ARS".to_string(), 59.90),
        ("PHP".to_string(), 29.90),
        ("BRL".to_string(), 2.99),
        ("MXN".to_string(), 8.90),
    ])
}

/// Known monthly list prices per site and currency.
pub fn default_regional_prices() -> HashMap<String, HashMap<String, f64>> {
    let netflix = HashMap::from([
        ("USD".to_string(), 15.99),
        ("EUR".to_string(), 13.99),
        ("GBP".to_string(), 10.99),
        ("INR".to_string(), 499.0),
        ("TRY".to_string(), 99.99),
        ("ARS".to_string(), 999.0),
        ("PHP".to_string(), 549.0),
        ("BRL".to_string(), 39.90),
        ("MXN".to_string(), 139.0),
    ]);
    let spotify = HashMap::from([
        ("USD".to_string(), 10.99),
        ("EUR".to_string(), 10.99),
        ("GBP".to_string(), 10.99),
        ("INR".to_string(), 119.0),
        ("TRY".to_string(), 29.99),
        ("ARS".to_string(), 399.0),
        ("PHP".to_string(), 149.0),
        ("BRL".to_string(), 21.90),
        ("MXN".to_string(), 115.0),
    ]);
    HashMap::from([("netflix".to_string(), netflix), ("spotify".to_string(), spotify)])
}

/// Default conversion fee: a flat 3% card/processor markup.
pub const DEFAULT_CONVERSION_FEE_RATE: f64 = 0.03;

/// Default VPN surcharge for currencies without a specific entry,
/// denominated explicitly so it can be converted before subtraction.
pub fn default_vpn_fallback_fee() -> Money {
    Money::new(3.99, "USD")
}

/// Conversion and VPN fee parameters.
#[derive(Debug, Clone)]
pub struct FeePolicy {
    /// Fraction of the local price charged by the payment processor
    pub conversion_fee_rate: f64,
    vpn_required: Vec<String>,
    vpn_fees: HashMap<String, f64>,
    vpn_fallback_fee: Money,
}

impl FeePolicy {
    /// Creates a policy; currency keys are uppercased.
    pub fn new(
        conversion_fee_rate: f64,
        vpn_required: Vec<String>,
        vpn_fees: HashMap<String, f64>,
        vpn_fallback_fee: Money,
    ) -> Self {
        Self {
            conversion_fee_rate,
            vpn_required: vpn_required.into_iter().map(|c| c.to_uppercase()).collect(),
            vpn_fees: vpn_fees.into_iter().map(|(c, f)| (c.to_uppercase(), f)).collect(),
            vpn_fallback_fee,
        }
    }

    /// True when paying in this currency needs a VPN.
    pub fn requires_vpn(&self, code: &str) -> bool {
        self.vpn_required.iter().any(|c| c == code)
    }

    /// The VPN fee expressed in the candidate currency: zero when no VPN
    /// is needed, the per-currency entry when configured, otherwise the
    /// fallback fee converted through the table.
    pub fn vpn_fee_in(&self, code: &str, table: &RateTable) -> f64 {
        if !self.requires_vpn(code) {
            return 0.0;
        }
        match self.vpn_fees.get(code) {
            Some(fee) => *fee,
            None => convert(
                self.vpn_fallback_fee.amount,
                &self.vpn_fallback_fee.currency,
                code,
                table,
            ),
        }
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_CONVERSION_FEE_RATE,
            default_vpn_required(),
            default_vpn_fees(),
            default_vpn_fallback_fee(),
        )
    }
}

/// Known list prices per (site, currency); used instead of naive
/// conversion when present.
#[derive(Debug, Clone)]
pub struct RegionalPriceTable {
    prices: HashMap<String, HashMap<String, f64>>,
}

impl RegionalPriceTable {
    /// Creates a table from site → currency → price data; keys normalized.
    pub fn from_map(prices: HashMap<String, HashMap<String, f64>>) -> Self {
        let prices = prices
            .into_iter()
            .map(|(site, by_currency)| {
                let by_currency =
                    by_currency.into_iter().map(|(c, p)| (c.to_uppercase(), p)).collect();
                (site.to_lowercase(), by_currency)
            })
            .collect();
        Self { prices }
    }

    /// Returns the known list price for a site in a currency.
    pub fn lookup(&self, site: Site, code: &str) -> Option<f64> {
        self.prices.get(site.id())?.get(code).copied()
    }
}

impl Default for RegionalPriceTable {
    fn default() -> Self {
        Self::from_map(default_regional_prices())
    }
}
