//! Output formatting for savings reports (table, JSON, markdown, CSV).

use crate::arbitrage::models::{SavingsOpportunity, SavingsRecord, SavingsReport};
use crate::config::OutputFormat;
use crate::currency;
use crate::price::DetectedPrice;
use crate::rates::RateTable;

/// Formats computation results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a savings report. An empty report is a valid result and
    /// renders as "no opportunities", never as an error.
    pub fn format_report(&self, report: &SavingsReport) -> String {
        if report.is_empty() {
            return match self.format {
                OutputFormat::Json => serde_json::to_string_pretty(report)
                    .unwrap_or_else(|_| "{}".to_string()),
                OutputFormat::Csv => self.csv_header(),
                _ => "No savings opportunities found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => self.table_report(report),
            OutputFormat::Markdown => self.markdown_report(report),
            OutputFormat::Csv => self.csv_report(report),
        }
    }

    /// Formats a parser detection.
    pub fn format_detection(&self, detected: &DetectedPrice) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(detected)
                .unwrap_or_else(|_| "{}".to_string()),
            _ => format!(
                "Detected {} from \"{}\" at {}",
                detected.money,
                detected.matched_text,
                detected.detected_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }

    /// Formats a rate table.
    pub fn format_rates(&self, table: &RateTable) -> String {
        if self.format == OutputFormat::Json {
            return serde_json::to_string_pretty(table).unwrap_or_else(|_| "{}".to_string());
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "Rates for {} (source: {}, captured {})",
            table.base,
            table.origin,
            table.captured_at.format("%Y-%m-%d %H:%M UTC")
        ));
        lines.push(format!("{:-<44}", ""));

        let mut codes: Vec<&String> = table.rates.keys().collect();
        codes.sort();
        for code in codes {
            lines.push(format!(
                "{} {:<4} {:>14.4}",
                currency::flag(code),
                code,
                table.rates[code]
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} rates", table.rates.len()));
        lines.join("\n")
    }

    /// Formats the savings history, oldest first.
    pub fn format_history(&self, records: &[SavingsRecord]) -> String {
        if self.format == OutputFormat::Json {
            return serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string());
        }

        if records.is_empty() {
            return "No savings recorded yet.".to_string();
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "{:<17} {:<10} {:<14} {}",
            "Date", "Site", "Original", "Saved"
        ));
        lines.push(format!("{:-<17} {:-<10} {:-<14} {:-<16}", "", "", "", ""));

        for record in records {
            lines.push(format!(
                "{:<17} {:<10} {:<14} {:.2} {}",
                record.recorded_at.format("%Y-%m-%d %H:%M"),
                record.site,
                record.original_price.to_string(),
                record.saved_amount,
                record.saved_currency
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} records", records.len()));
        lines.join("\n")
    }

    // Table formatting

    fn table_report(&self, report: &SavingsReport) -> String {
        let mut lines = Vec::new();

        if let Some(best) = report.best() {
            let name = best
                .currency_info()
                .map(|c| c.name)
                .unwrap_or(best.target_currency.as_str());
            lines.push(format!(
                "🏆 Best: pay in {} {} — save {:.2} {} net ({:.0}%){}",
                currency::flag(&best.target_currency),
                name,
                best.net_savings,
                best.target_currency,
                best.savings_percentage,
                if best.requires_vpn { " 🔒" } else { "" }
            ));
            lines.push(String::new());
        }

        for opp in &report.opportunities {
            lines.push(self.table_row(opp));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} opportunities", report.count()));
        lines.join("\n")
    }

    fn table_row(&self, opp: &SavingsOpportunity) -> String {
        let symbol = currency::symbol(&opp.target_currency);
        format!(
            "{} {}: pay {}{:.2} instead of {}{:.2} | fees {:.2} | net +{:.2} ({:.0}%){}",
            currency::flag(&opp.target_currency),
            opp.target_currency,
            symbol,
            opp.local_price.amount,
            symbol,
            opp.converted_price,
            opp.fees.total(),
            opp.net_savings,
            opp.savings_percentage,
            if opp.requires_vpn { " 🔒 VPN" } else { "" }
        )
    }

    // Markdown formatting

    fn markdown_report(&self, report: &SavingsReport) -> String {
        let mut lines = Vec::new();

        lines.push("| Currency | Local price | Converted | Fees | Net savings | % | VPN |".to_string());
        lines.push("|----------|-------------|-----------|------|-------------|---|-----|".to_string());

        for opp in &report.opportunities {
            lines.push(format!(
                "| {} {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.0}% | {} |",
                currency::flag(&opp.target_currency),
                opp.target_currency,
                opp.local_price.amount,
                opp.converted_price,
                opp.fees.total(),
                opp.net_savings,
                opp.savings_percentage,
                if opp.requires_vpn { "✓" } else { "" }
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} opportunities found*", report.count()));
        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "target_currency,local_price,converted_price,gross_savings,conversion_fee,vpn_fee,net_savings,savings_percentage,requires_vpn"
            .to_string()
    }

    fn csv_report(&self, report: &SavingsReport) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for opp in &report.opportunities {
            lines.push(format!(
                "{},{},{},{},{},{},{},{},{}",
                opp.target_currency,
                opp.local_price.amount,
                opp.converted_price,
                opp.gross_savings,
                opp.fees.conversion,
                opp.fees.vpn,
                opp.net_savings,
                opp.savings_percentage,
                opp.requires_vpn
            ));
        }

        lines.join("\n")
    }
}
