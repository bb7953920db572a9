//! Data models for savings opportunities and reports.

use crate::currency::{self, CurrencyInfo};
use crate::price::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fees charged against one opportunity, in the target currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Card/payment-processor markup on the local price
    pub conversion: f64,
    /// VPN surcharge, zero when no VPN is needed
    pub vpn: f64,
}

impl FeeBreakdown {
    /// Total fees.
    pub fn total(&self) -> f64 {
        self.conversion + self.vpn
    }
}

/// One candidate currency in which the subscription is cheaper, net of
/// fees. Created fresh per computation and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsOpportunity {
    /// The price as detected on the page
    pub original_price: Money,
    /// Candidate currency code
    pub target_currency: String,
    /// What you would actually pay in the candidate region
    pub local_price: Money,
    /// The original price expressed in the candidate currency
    pub converted_price: f64,
    /// `converted_price - local_price`
    pub gross_savings: f64,
    /// Net savings as a percentage of the converted price
    pub savings_percentage: f64,
    /// Fees in the candidate currency
    pub fees: FeeBreakdown,
    /// Gross savings minus all fees; the ranking key
    pub net_savings: f64,
    /// Whether paying in this currency needs a VPN
    pub requires_vpn: bool,
}

impl SavingsOpportunity {
    /// Registry data for the target currency, if known.
    pub fn currency_info(&self) -> Option<&'static CurrencyInfo> {
        currency::lookup(&self.target_currency)
    }
}

/// Ranked opportunities for one detected price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    /// Opportunities sorted by net savings, best first
    pub opportunities: Vec<SavingsOpportunity>,
    /// When the computation ran
    pub computed_at: DateTime<Utc>,
}

impl SavingsReport {
    /// Creates a report stamped with the current time. Callers pass
    /// opportunities already ranked.
    pub fn new(opportunities: Vec<SavingsOpportunity>) -> Self {
        Self { opportunities, computed_at: Utc::now() }
    }

    /// The best option, or `None` when there are no opportunities.
    /// An empty report is a valid result, not an error.
    pub fn best(&self) -> Option<&SavingsOpportunity> {
        self.opportunities.first()
    }

    /// Number of opportunities.
    pub fn count(&self) -> usize {
        self.opportunities.len()
    }

    /// True when no candidate produced positive net savings.
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

/// A savings decision the user applied, kept in the bounded history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRecord {
    /// Unique id (millisecond timestamp)
    pub id: String,
    /// Site identifier, "unknown" when not detected
    pub site: String,
    /// The detected original price
    pub original_price: Money,
    /// Net amount saved
    pub saved_amount: f64,
    /// Currency the savings are denominated in
    pub saved_currency: String,
    /// When the record was written
    pub recorded_at: DateTime<Utc>,
}
