//! subsaver - Find cheaper regions for your subscriptions
//!
//! Detects a price in the text you paste, converts it across candidate
//! currencies, and ranks where the same subscription is cheaper net of fees.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use subsaver::commands;
use subsaver::config::{Config, OutputFormat};
use subsaver::currency;
use subsaver::sites::Site;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "subsaver",
    version,
    about = "Find cheaper regions for your subscriptions",
    long_about = "Detects a subscription price in pasted page text, compares it against known \
                  regional prices and converted estimates, and ranks arbitrage opportunities \
                  net of conversion and VPN fees."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Base currency for bare amounts
    #[arg(short, long, global = true, env = "SUBSAVER_BASE_CURRENCY")]
    base_currency: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute savings for a price found in the given text
    #[command(alias = "s")]
    Savings {
        /// Page text containing a price (e.g. "$15.99/month")
        text: String,

        /// Site the price was seen on (netflix, spotify, adobe)
        #[arg(short, long)]
        site: Option<Site>,

        /// Candidate currencies (comma-separated, overrides preferences)
        #[arg(long, value_delimiter = ',')]
        currencies: Option<Vec<String>>,

        /// Do not record the best option in the savings history
        #[arg(long)]
        no_record: bool,
    },

    /// Parse a price out of text without computing savings
    Parse {
        /// Text to parse
        text: String,
    },

    /// Show the exchange-rate table for a base currency
    #[command(alias = "r")]
    Rates {
        /// Base currency (defaults to the configured one)
        base: Option<String>,

        /// Bypass the cache and refetch from the rate sources
        #[arg(long)]
        refresh: bool,
    },

    /// List supported currencies
    Currencies,

    /// Show recorded savings
    History,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(base) = cli.base_currency {
        config.base_currency = base.to_uppercase();
    }

    match cli.command {
        Commands::Savings { text, site, currencies, no_record } => {
            let output =
                commands::run_savings(&config, &text, site, currencies, !no_record).await?;
            println!("{}", output);
        }

        Commands::Parse { text } => {
            let output = commands::run_parse(&config, &text)?;
            println!("{}", output);
        }

        Commands::Rates { base, refresh } => {
            let output = commands::run_rates(&config, base, refresh).await?;
            println!("{}", output);
        }

        Commands::Currencies => {
            println!("Supported currencies:\n");
            println!("{:<6} {:<22} {:<8} Flag", "Code", "Name", "Symbol");
            println!("{:-<6} {:-<22} {:-<8} {:-<4}", "", "", "", "");

            for info in currency::CURRENCIES {
                println!("{:<6} {:<22} {:<8} {}", info.code, info.name, info.symbol, info.flag);
            }
        }

        Commands::History => {
            let output = commands::run_history(&config)?;
            println!("{}", output);
        }
    }

    Ok(())
}
