//! Integration tests driving parser, engine, and formatter together.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use subsaver::arbitrage::{FeePolicy, RegionalPriceTable, SavingsEngine};
use subsaver::config::OutputFormat;
use subsaver::format::Formatter;
use subsaver::price;
use subsaver::rates::{RateLookup, RateOrigin, RateTable};
use subsaver::sites::Site;

/// Rate lookup pinned to one table, standing in for the network chain.
struct FixedRates {
    table: RateTable,
}

#[async_trait]
impl RateLookup for FixedRates {
    async fn get_rates(&self, _base: &str) -> Result<RateTable> {
        Ok(self.table.clone())
    }
}

fn usd_table() -> RateTable {
    let rates = HashMap::from([
        ("USD".to_string(), 1.0),
        ("EUR".to_string(), 0.85),
        ("GBP".to_string(), 0.73),
        ("INR".to_string(), 83.0),
        ("TRY".to_string(), 8.5),
        ("ARS".to_string(), 98.0),
        ("PHP".to_string(), 50.0),
    ]);
    RateTable::new("USD", rates, RateOrigin::Primary)
}

fn engine() -> SavingsEngine {
    SavingsEngine::new(
        Arc::new(FixedRates { table: usd_table() }),
        RegionalPriceTable::default(),
        FeePolicy::default(),
    )
}

#[tokio::test]
async fn test_detect_and_rank_netflix_price() {
    // A page fragment sweep: the first parseable fragment wins.
    let fragments = ["Watch anywhere. Cancel anytime.", "Plans from $15.99/month"];
    let detected = price::scan(fragments).expect("price should be detected");

    assert_eq!(detected.money.amount, 15.99);
    assert_eq!(detected.money.currency, "USD");

    let candidates: Vec<String> =
        ["EUR", "GBP", "INR", "TRY", "ARS", "PHP"].iter().map(|s| s.to_string()).collect();

    let report = engine()
        .compute(Some(Site::Netflix), &detected.money, &candidates)
        .await
        .unwrap();

    // INR at 499 vs ~1327 converted is the deepest discount
    let best = report.best().expect("should find opportunities");
    assert_eq!(best.target_currency, "INR");
    assert!((best.converted_price - 1327.17).abs() < 1e-6);
    assert!((best.gross_savings - 828.17).abs() < 1e-6);
    assert!((best.fees.conversion - 14.97).abs() < 1e-6);
    assert!((best.fees.vpn - 29.90).abs() < 1e-6);
    assert!((best.net_savings - (828.17 - 14.97 - 29.90)).abs() < 1e-6);
    assert!(best.requires_vpn);

    // Ranking invariant: net savings never increase down the list
    for pair in report.opportunities.windows(2) {
        assert!(pair[0].net_savings >= pair[1].net_savings);
    }

    // Exclusion invariant: nothing non-positive survives
    for opp in &report.opportunities {
        assert!(opp.net_savings > 0.0);
    }
}

#[tokio::test]
async fn test_report_renders_in_every_format() {
    let detected = price::parse("$15.99").unwrap();
    let candidates = vec!["INR".to_string(), "TRY".to_string()];
    let report =
        engine().compute(Some(Site::Netflix), &detected.money, &candidates).await.unwrap();

    let table = Formatter::new(OutputFormat::Table).format_report(&report);
    assert!(table.contains("🏆 Best"));
    assert!(table.contains("🔒 VPN"));

    let json = Formatter::new(OutputFormat::Json).format_report(&report);
    let parsed: subsaver::SavingsReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.count(), report.count());

    let markdown = Formatter::new(OutputFormat::Markdown).format_report(&report);
    assert!(markdown.contains("| Currency |"));

    let csv = Formatter::new(OutputFormat::Csv).format_report(&report);
    assert_eq!(csv.lines().count(), report.count() + 1);
}

#[tokio::test]
async fn test_no_opportunities_is_a_valid_result() {
    // Without a site there are no regional prices, so naive conversion
    // cannot beat itself.
    let detected = price::parse("$15.99").unwrap();
    let report = engine()
        .compute(None, &detected.money, &["INR".to_string(), "EUR".to_string()])
        .await
        .unwrap();

    assert!(report.is_empty());
    assert!(report.best().is_none());

    let rendered = Formatter::new(OutputFormat::Table).format_report(&report);
    assert_eq!(rendered, "No savings opportunities found.");
}

#[test]
fn test_parser_scenarios() {
    let d = price::parse("$15.99").unwrap();
    assert_eq!(d.money.amount, 15.99);
    assert_eq!(d.money.currency, "USD");

    let d = price::parse("€13.99").unwrap();
    assert_eq!(d.money.amount, 13.99);
    assert_eq!(d.money.currency, "EUR");

    assert!(price::parse("no price here").is_none());
}

#[tokio::test]
async fn test_original_currency_never_a_candidate() {
    let detected = price::parse("₹499").unwrap();
    assert_eq!(detected.money.currency, "INR");

    let report = engine()
        .compute(Some(Site::Netflix), &detected.money, &["INR".to_string()])
        .await
        .unwrap();
    assert!(report.is_empty());
}
