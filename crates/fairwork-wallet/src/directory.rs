use crate::account::{WalletAccount, WalletProfile};
use crate::error::{Result, WalletError};
use crate::store::WalletStore;
use chrono::Utc;
use fairwork_types::{Keypair, UserRole, WalletAddress};
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and looks up custodial accounts, mapping application users to
/// ledger keypairs. All reads return the public [`WalletProfile`]
/// projection; key material stays inside the store.
pub struct WalletDirectory {
    store: Arc<dyn WalletStore>,
}

impl WalletDirectory {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Create a custodial wallet for an application user. Generates a fresh
    /// keypair off-chain, derives the address, persists the record, and
    /// returns only the public fields.
    pub async fn create_wallet(
        &self,
        user_id: &str,
        username: &str,
        email: &str,
        role: UserRole,
    ) -> Result<WalletProfile> {
        if user_id.trim().is_empty() {
            return Err(WalletError::Validation("user_id is required".to_string()));
        }
        if username.trim().is_empty() {
            return Err(WalletError::Validation("username is required".to_string()));
        }
        if email.trim().is_empty() || !email.contains('@') {
            return Err(WalletError::Validation(format!(
                "invalid email address: {:?}",
                email
            )));
        }

        if self.store.account_by_email(email).await?.is_some() {
            return Err(WalletError::Conflict(format!(
                "a wallet already exists for email {}",
                email
            )));
        }
        if self.store.account_by_user(user_id).await?.is_some() {
            return Err(WalletError::Conflict(format!(
                "a wallet already exists for user {}",
                user_id
            )));
        }

        let keypair = Keypair::generate();
        let address = WalletAddress::from_public_key(keypair.public_key());

        let account = WalletAccount {
            user_id: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            role,
            address,
            created_at: Utc::now(),
        };
        let profile = account.to_profile();

        self.store.insert_account(account, keypair.to_bytes()).await?;

        info!(
            user_id = %user_id,
            username = %username,
            role = %role,
            address = %address,
            "✅ Custodial wallet created"
        );

        Ok(profile)
    }

    /// Look up the public projection of a user's wallet.
    pub async fn get_wallet(&self, user_id: &str) -> Result<WalletProfile> {
        let account = self
            .store
            .account_by_user(user_id)
            .await?
            .ok_or_else(|| WalletError::NotFound(format!("no wallet for user {}", user_id)))?;

        Ok(account.to_profile())
    }

    /// Reverse lookup: resolve the owner of a ledger address, if any.
    pub async fn find_by_address(&self, address: &WalletAddress) -> Result<Option<WalletProfile>> {
        let account = self.store.account_by_address(address).await?;
        if account.is_none() {
            debug!(address = %address, "No wallet registered for address");
        }
        Ok(account.map(|a| a.to_profile()))
    }
}
