use fairwork_types::TokenAmount;
use fairwork_wallet::WalletError;
use thiserror::Error;

/// Marketplace error types
#[derive(Error, Debug, Clone)]
pub enum MarketError {
    /// Missing or malformed required field
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown listing or submission
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate application or similar collision
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Reward exceeds the owner's spendable balance
    #[error("Insufficient funds: required {required}, available {available}, short {shortfall}")]
    InsufficientFunds {
        required: TokenAmount,
        available: TokenAmount,
        shortfall: TokenAmount,
    },

    /// Illegal submission status transition
    #[error("Invalid state transition: from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Ledger interaction failed (balance read or escrow transfer)
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Wallet subsystem failure
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
}

/// Result type for marketplace operations
pub type Result<T> = std::result::Result<T, MarketError>;
