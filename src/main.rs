// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use bowling_money::{init_logging, Config, SessionStore, SqliteDocumentStore};
use clap::Parser;

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(config.log_level, &config.log_file)?;

    let pricing = config.pricing_table()?;
    let storage = SqliteDocumentStore::open(&config.db)
        .with_context(|| format!("Failed to open database: {}", config.db.display()))?;

    log::info!("bowling-money {} starting with {}", bowling_money::VERSION, config.db.display());
    let store = SessionStore::open(storage, pricing);

    run_ui_mode(store)
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: SessionStore<SqliteDocumentStore>) -> Result<()> {
    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(store: SessionStore<SqliteDocumentStore>) -> Result<()> {
    let totals = store.totals();
    println!("Total to team captain: {}", totals.total_owed_to_captain);
    println!("Overall total:         {}", totals.grand_total);
    eprintln!("TUI mode not available, rebuild with: cargo build --features tui");
    Ok(())
}
