// Bowling League Money Calculator - Core Library
// Pricing, partner bookkeeping and the durable session store used by the TUI

pub mod config;
pub mod error;
pub mod partners;
pub mod pricing;
pub mod state;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{init_logging, load_pricing_table, Config};
pub use error::{PricingError, StateError, StorageError, ValidationError};
pub use partners::{
    available_partner_names, sorted_partner_names, suggest_partner_names, MoneyTransfer,
    PartnerEntry, PartnerId, PARTNER_NAMES,
};
pub use pricing::{
    compute_totals, format_currency, BowlerType, FeeKind, Money, PricingTable, SidePotKey,
    SidePots, TotalsBreakdown, MAX_FEE,
};
pub use state::{
    parse_saved_state, reconcile_favorites, repair, SessionState, DEFAULT_TAB, SCHEMA_VERSION,
    STORAGE_KEY,
};
pub use storage::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
pub use store::{ConfirmAction, LoadOutcome, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
