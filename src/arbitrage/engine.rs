//! The savings engine: computes and ranks arbitrage opportunities.

use crate::arbitrage::models::{FeeBreakdown, SavingsOpportunity, SavingsReport};
use crate::arbitrage::policy::{FeePolicy, RegionalPriceTable};
use crate::currency;
use crate::price::Money;
use crate::rates::{convert, RateLookup, RateTable};
use crate::sites::Site;
use anyhow::Result;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Computes fee-adjusted savings for a detected price across candidate
/// currencies. The rate lookup is injected so tests run against fixed
/// tables.
pub struct SavingsEngine {
    rates: Arc<dyn RateLookup>,
    regional: RegionalPriceTable,
    fees: FeePolicy,
}

impl SavingsEngine {
    /// Creates an engine over a rate lookup, regional prices, and fees.
    pub fn new(rates: Arc<dyn RateLookup>, regional: RegionalPriceTable, fees: FeePolicy) -> Self {
        Self { rates, regional, fees }
    }

    /// Resolves one rate table for the original currency, then computes.
    /// The rate chain always yields a table, so this only fails on a
    /// broken lookup implementation.
    pub async fn compute(
        &self,
        site: Option<Site>,
        original: &Money,
        candidates: &[String],
    ) -> Result<SavingsReport> {
        let table = self.rates.get_rates(&original.currency).await?;
        Ok(self.compute_with_table(site, original, candidates, &table))
    }

    /// Pure computation over a fixed table. Deterministic: identical
    /// inputs produce identical opportunities.
    pub fn compute_with_table(
        &self,
        site: Option<Site>,
        original: &Money,
        candidates: &[String],
        table: &RateTable,
    ) -> SavingsReport {
        let mut opportunities = Vec::new();

        for candidate in candidates {
            let code = candidate.to_uppercase();
            if code == original.currency {
                continue;
            }
            if !currency::is_known(&code) {
                debug!("Skipping unknown candidate currency {}", code);
                continue;
            }

            // Comparison baseline: the detected price in the candidate
            // currency.
            let converted = convert(original.amount, &original.currency, &code, table);

            // Known regional list price beats a naive conversion. Without
            // one the estimate equals the baseline and yields no savings.
            let local = site
                .and_then(|s| self.regional.lookup(s, &code))
                .unwrap_or(converted);

            let gross = converted - local;
            if gross <= 0.0 {
                continue;
            }

            let conversion_fee = local * self.fees.conversion_fee_rate;
            let requires_vpn = self.fees.requires_vpn(&code);
            let vpn_fee = self.fees.vpn_fee_in(&code, table);

            let net = gross - conversion_fee - vpn_fee;
            if net <= 0.0 {
                debug!("Candidate {} eaten by fees ({:.2} gross)", code, gross);
                continue;
            }

            opportunities.push(SavingsOpportunity {
                original_price: original.clone(),
                target_currency: code.clone(),
                local_price: Money::new(local, code),
                converted_price: converted,
                gross_savings: gross,
                savings_percentage: net / converted * 100.0,
                fees: FeeBreakdown { conversion: conversion_fee, vpn: vpn_fee },
                net_savings: net,
                requires_vpn,
            });
        }

        // Stable sort: equal net savings keep candidate iteration order.
        opportunities.sort_by(|a, b| {
            b.net_savings.partial_cmp(&a.net_savings).unwrap_or(Ordering::Equal)
        });

        debug!("Computed {} opportunities", opportunities.len());
        SavingsReport::new(opportunities)
    }
}
