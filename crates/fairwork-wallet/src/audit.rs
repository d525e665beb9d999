use chrono::{DateTime, Utc};
use fairwork_types::{TokenAmount, WalletAddress};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash sentinel recorded when a transfer never produced one.
pub const FAILED_HASH: &str = "N/A";

/// Receiver identity recorded when reverse lookup finds no account.
pub const UNKNOWN_USER: &str = "UNKNOWN";

/// Terminal outcome of a transfer or reward attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    Success,
    Failed,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditStatus::Success => write!(f, "SUCCESS"),
            AuditStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// One row per peer-transfer attempt. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub user_id: String,
    pub sender_address: WalletAddress,
    pub receiver_address: WalletAddress,
    pub amount: TokenAmount,
    /// Unique transaction hash, or [`FAILED_HASH`] when the attempt failed.
    pub hash: String,
    pub explorer_url: String,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn success(
        user_id: String,
        sender_address: WalletAddress,
        receiver_address: WalletAddress,
        amount: TokenAmount,
        hash: String,
        explorer_url: String,
    ) -> Self {
        Self {
            user_id,
            sender_address,
            receiver_address,
            amount,
            hash,
            explorer_url,
            status: AuditStatus::Success,
            created_at: Utc::now(),
        }
    }

    pub fn failed(
        user_id: String,
        sender_address: WalletAddress,
        receiver_address: WalletAddress,
        amount: TokenAmount,
    ) -> Self {
        Self {
            user_id,
            sender_address,
            receiver_address,
            amount,
            hash: FAILED_HASH.to_string(),
            explorer_url: String::new(),
            status: AuditStatus::Failed,
            created_at: Utc::now(),
        }
    }
}

/// One row per platform reward attempt. Kept apart from peer transfers
/// because the value is granted, not moved between users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardRecord {
    /// Resolved receiver identity, or [`UNKNOWN_USER`].
    pub user_id: String,
    pub receiver_address: WalletAddress,
    pub amount: TokenAmount,
    pub hash: String,
    pub explorer_url: String,
    pub reason: String,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
}

impl RewardRecord {
    pub fn success(
        user_id: String,
        receiver_address: WalletAddress,
        amount: TokenAmount,
        hash: String,
        explorer_url: String,
        reason: String,
    ) -> Self {
        Self {
            user_id,
            receiver_address,
            amount,
            hash,
            explorer_url,
            reason,
            status: AuditStatus::Success,
            created_at: Utc::now(),
        }
    }

    pub fn failed(
        user_id: String,
        receiver_address: WalletAddress,
        amount: TokenAmount,
        reason: String,
    ) -> Self {
        Self {
            user_id,
            receiver_address,
            amount,
            hash: FAILED_HASH.to_string(),
            explorer_url: String::new(),
            reason,
            status: AuditStatus::Failed,
            created_at: Utc::now(),
        }
    }
}
