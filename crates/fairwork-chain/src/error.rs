use thiserror::Error;

/// Ledger client error types
#[derive(Error, Debug, Clone)]
pub enum ChainError {
    /// Network-level failure reaching the ledger
    #[error("Ledger network error: {0}")]
    Network(String),

    /// Transaction rejected by the ledger (e.g. insufficient on-chain balance)
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Signature verification failed
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Transaction hash already seen by the ledger
    #[error("Duplicate transaction hash: {0}")]
    DuplicateHash(String),
}

/// Result type for ledger client operations
pub type Result<T> = std::result::Result<T, ChainError>;
