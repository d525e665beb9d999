pub mod amount;
pub mod address;
pub mod identity;
pub mod keys;

pub use address::WalletAddress;
pub use amount::{TokenAmount, TOKEN_BASE_UNIT, TOKEN_DECIMALS};
pub use identity::UserRole;
pub use keys::{Keypair, PublicKey, Signature};

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TypeError {
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, TypeError>;
