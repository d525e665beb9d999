//! Custodial wallet layer.
//!
//! Holds signing keys on behalf of application users, moves value through
//! the injected [`fairwork_chain::LedgerClient`], and records every transfer
//! attempt — successful or not — in an append-only audit store.
//!
//! Key material never crosses the public API: reads go through the
//! [`WalletProfile`] projection, and signing goes through the
//! [`KeySigner`] seam, which loads secret bytes only for the duration of a
//! signing call.

pub mod account;
pub mod audit;
pub mod directory;
pub mod engine;
pub mod error;
pub mod oracle;
pub mod signer;
pub mod store;

pub use account::{WalletAccount, WalletProfile};
pub use audit::{AuditStatus, RewardRecord, TransactionRecord, FAILED_HASH, UNKNOWN_USER};
pub use directory::WalletDirectory;
pub use engine::{TransferEngine, TransferReceipt};
pub use error::{Result, WalletError};
pub use oracle::{BalanceOracle, BalanceReading, BalanceReport};
pub use signer::{KeySigner, SignedEnvelope, StoredKeySigner};
pub use store::{MemoryWalletStore, WalletStore};
