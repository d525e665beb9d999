use chrono::{DateTime, Utc};
use fairwork_types::{UserRole, WalletAddress};
use serde::{Deserialize, Serialize};

/// Custodial account record.
///
/// Deliberately contains no key material: secret keys live in a separate
/// store partition reachable only through [`crate::WalletStore::load_secret_key`],
/// so no account read can leak them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAccount {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    /// Derived from the generated keypair at creation; immutable thereafter.
    pub address: WalletAddress,
    pub created_at: DateTime<Utc>,
}

impl WalletAccount {
    /// Public projection returned by every read API.
    pub fn to_profile(&self) -> WalletProfile {
        WalletProfile {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            address: self.address,
            created_at: self.created_at,
        }
    }
}

/// Public view of a custodial account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub address: WalletAddress,
    pub created_at: DateTime<Utc>,
}
