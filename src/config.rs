// ⚙️ Configuration - CLI options, pricing override file, logging setup

use crate::pricing::PricingTable;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "bowling-money")]
#[command(about = "Bowling league money calculator: lineage, side pots and handicap doubles")]
pub struct Config {
    /// SQLite file holding the saved session
    #[arg(long, env = "BOWLING_MONEY_DB", default_value = "bowling-money.db")]
    pub db: PathBuf,

    /// JSON file overriding league prices (missing keys keep the standard price)
    #[arg(long, env = "BOWLING_MONEY_PRICING")]
    pub pricing: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence when set)
    #[arg(long, default_value = "warn")]
    pub log_level: log::LevelFilter,

    /// Log output file; the terminal belongs to the UI
    #[arg(long, default_value = "bowling-money.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// Pricing table from the override file, or the standard league prices
    pub fn pricing_table(&self) -> Result<PricingTable> {
        match &self.pricing {
            Some(path) => load_pricing_table(path),
            None => Ok(PricingTable::default()),
        }
    }
}

pub fn load_pricing_table(path: &Path) -> Result<PricingTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open pricing file: {}", path.display()))?;

    let pricing: PricingTable = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse pricing JSON from {}", path.display()))?;

    pricing
        .validate()
        .with_context(|| format!("Invalid pricing in {}", path.display()))?;

    Ok(pricing)
}

/// Route `log` output to a file through env_logger
pub fn init_logging(level: log::LevelFilter, log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialize logger")?;

    Ok(())
}
