//! Ledger client adapter.
//!
//! The marketplace core never talks to the ledger network directly; it goes
//! through the [`LedgerClient`] trait, which exposes exactly three
//! primitives: a balance read, a signed value-transfer submission, and the
//! platform reward entry point. [`MemoryLedger`] implements the same
//! contract in memory for tests and local runs.

pub mod config;
pub mod error;
pub mod ledger;
pub mod memory;

pub use config::ChainConfig;
pub use error::{ChainError, Result};
pub use ledger::{LedgerClient, RewardInvocation, SignedTransfer, TransferPayload};
pub use memory::MemoryLedger;
