// Error taxonomy
//
// Validation errors go back to the caller with state untouched.
// Storage and state errors never reach the user; the store logs them and
// falls back to in-memory state.

use crate::pricing::{FeeKind, Money};
use thiserror::Error;

/// Rejected user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("partner name cannot be empty")]
    EmptyName,

    #[error("{0} is already added as a partner.")]
    DuplicatePartner(String),

    #[error("unknown bowler type: {0:?}")]
    InvalidBowlerType(String),

    #[error("unknown side pot: {0:?}")]
    InvalidSidePot(String),
}

/// Pricing table that would make the totals meaningless
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("negative fee amount for {0:?}")]
    NegativeFee(FeeKind),

    #[error("fee for {kind:?} exceeds the {ceiling} ceiling")]
    FeeTooLarge { kind: FeeKind, ceiling: Money },
}

/// Durable backend failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Saved document could not be turned into a session state
#[derive(Debug, Error)]
pub enum StateError {
    #[error("saved state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("saved state is not a JSON object")]
    NotAnObject,
}
