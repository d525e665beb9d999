use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum WalletError {
    /// Missing or malformed required field
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown user or account
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate email or wallet
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored address and the address re-derived from the signing key
    /// diverge. Storage corruption; must hard-fail, never re-sync.
    #[error("Key mismatch for stored wallet: stored {stored}, derived {derived}")]
    KeyMismatch { stored: String, derived: String },

    /// Signing, broadcast, or finality failure at the ledger
    #[error("Ledger submission failed: {0}")]
    LedgerSubmission(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, WalletError>;
