use crate::error::{Result, WalletError};
use crate::store::WalletStore;
use async_trait::async_trait;
use fairwork_types::{Keypair, PublicKey, Signature};
use std::sync::Arc;
use tracing::debug;

/// Result of a custodial signing operation: the signature plus the public
/// key it verifies under. Never includes secret material.
#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// Key-management seam. Everything that needs a user signature goes through
/// `sign`; the backend (in-process store today, HSM tomorrow) is free to
/// change without touching transfer logic.
#[async_trait]
pub trait KeySigner: Send + Sync {
    async fn sign(&self, user_id: &str, payload: &[u8]) -> Result<SignedEnvelope>;
}

/// Signer backed by the wallet store. Secret bytes are loaded, used, and
/// dropped inside the call.
pub struct StoredKeySigner {
    store: Arc<dyn WalletStore>,
}

impl StoredKeySigner {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl KeySigner for StoredKeySigner {
    async fn sign(&self, user_id: &str, payload: &[u8]) -> Result<SignedEnvelope> {
        let secret = self
            .store
            .load_secret_key(user_id)
            .await?
            .ok_or_else(|| WalletError::NotFound(format!("no signing key for user {}", user_id)))?;

        let keypair = Keypair::from_bytes(&secret)
            .map_err(|e| WalletError::Storage(format!("stored key unusable: {}", e)))?;
        drop(secret);

        let signature = keypair.sign(payload);
        let public_key = *keypair.public_key();

        debug!(user_id = %user_id, "Payload signed with custodial key");

        Ok(SignedEnvelope {
            public_key,
            signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::WalletAccount;
    use crate::store::MemoryWalletStore;
    use chrono::Utc;
    use fairwork_types::{UserRole, WalletAddress};

    #[tokio::test]
    async fn test_sign_round_trip() {
        let store = Arc::new(MemoryWalletStore::new());
        let keypair = Keypair::generate();

        store
            .insert_account(
                WalletAccount {
                    user_id: "user-1".to_string(),
                    username: "acme".to_string(),
                    email: "ops@acme.io".to_string(),
                    role: UserRole::Company,
                    address: WalletAddress::from_public_key(keypair.public_key()),
                    created_at: Utc::now(),
                },
                keypair.to_bytes(),
            )
            .await
            .unwrap();

        let signer = StoredKeySigner::new(store);
        let envelope = signer.sign("user-1", b"payload").await.unwrap();

        assert_eq!(&envelope.public_key, keypair.public_key());
        assert!(envelope.public_key.verify(b"payload", &envelope.signature));
    }

    #[tokio::test]
    async fn test_sign_unknown_user() {
        let store = Arc::new(MemoryWalletStore::new());
        let signer = StoredKeySigner::new(store);

        let result = signer.sign("ghost", b"payload").await;
        assert!(matches!(result, Err(WalletError::NotFound(_))));
    }
}
