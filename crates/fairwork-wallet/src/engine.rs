use crate::audit::{RewardRecord, TransactionRecord, UNKNOWN_USER};
use crate::error::{Result, WalletError};
use crate::signer::KeySigner;
use crate::store::WalletStore;
use chrono::Utc;
use fairwork_chain::{ChainConfig, LedgerClient, RewardInvocation, SignedTransfer, TransferPayload};
use fairwork_types::{Keypair, TokenAmount, WalletAddress};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Successful transfer outcome returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub hash: String,
    pub explorer_url: String,
}

/// Orchestrates value movement: peer transfers signed with custodial user
/// keys and platform reward grants signed with the authority key. Every
/// attempt that reaches the ledger leaves exactly one audit row, whatever
/// its outcome.
pub struct TransferEngine {
    store: Arc<dyn WalletStore>,
    ledger: Arc<dyn LedgerClient>,
    signer: Arc<dyn KeySigner>,
    config: ChainConfig,
    /// Platform-wide signing key for the reward entry point. Injected at
    /// construction; never read from global state.
    authority: Arc<Keypair>,
}

impl TransferEngine {
    pub fn new(
        store: Arc<dyn WalletStore>,
        ledger: Arc<dyn LedgerClient>,
        signer: Arc<dyn KeySigner>,
        config: ChainConfig,
        authority: Arc<Keypair>,
    ) -> Self {
        Self {
            store,
            ledger,
            signer,
            config,
            authority,
        }
    }

    pub fn escrow_address(&self) -> WalletAddress {
        self.config.escrow_address
    }

    /// Move value from a custodial wallet to any ledger address.
    ///
    /// The address re-derived from the signing key must match the stored
    /// one; a divergence means the account row and the key row no longer
    /// belong together, and the engine aborts before anything reaches the
    /// ledger — that corruption must never be papered over by re-syncing.
    pub async fn transfer(
        &self,
        sender_user_id: &str,
        receiver_address: WalletAddress,
        amount: TokenAmount,
    ) -> Result<TransferReceipt> {
        if amount.is_zero() {
            return Err(WalletError::Validation(
                "transfer amount must be positive".to_string(),
            ));
        }

        let account = self
            .store
            .account_by_user(sender_user_id)
            .await?
            .ok_or_else(|| {
                WalletError::NotFound(format!("no wallet for user {}", sender_user_id))
            })?;

        let payload = TransferPayload {
            sender: account.address,
            recipient: receiver_address,
            amount,
            issued_at: Utc::now().timestamp(),
        };

        let envelope = match self.signer.sign(sender_user_id, &payload.signing_bytes()).await {
            Ok(envelope) => envelope,
            Err(e) => {
                // Signing-stage failure: the attempt is recorded before it
                // is surfaced.
                self.store
                    .record_transaction(TransactionRecord::failed(
                        sender_user_id.to_string(),
                        account.address,
                        receiver_address,
                        amount,
                    ))
                    .await?;
                return Err(WalletError::LedgerSubmission(format!(
                    "signing failed: {}",
                    e
                )));
            }
        };

        let derived = WalletAddress::from_public_key(&envelope.public_key);
        if derived != account.address {
            error!(
                user_id = %sender_user_id,
                stored = %account.address,
                derived = %derived,
                "❌ Stored address does not match signing key"
            );
            return Err(WalletError::KeyMismatch {
                stored: account.address.to_hex(),
                derived: derived.to_hex(),
            });
        }

        let transfer = SignedTransfer {
            payload,
            public_key: envelope.public_key,
            signature: envelope.signature,
        };

        match self.ledger.submit_transfer(transfer).await {
            Ok(hash) => {
                let explorer_url = self.config.explorer_tx_url(&hash);

                self.store
                    .record_transaction(TransactionRecord::success(
                        sender_user_id.to_string(),
                        account.address,
                        receiver_address,
                        amount,
                        hash.clone(),
                        explorer_url.clone(),
                    ))
                    .await?;

                info!(
                    user_id = %sender_user_id,
                    sender = %account.address,
                    receiver = %receiver_address,
                    amount = amount.to_display(),
                    tx_hash = %hash,
                    "✅ Transfer confirmed"
                );

                Ok(TransferReceipt { hash, explorer_url })
            }
            Err(e) => {
                warn!(
                    user_id = %sender_user_id,
                    sender = %account.address,
                    receiver = %receiver_address,
                    amount = amount.to_display(),
                    error = %e,
                    "❌ Transfer failed"
                );

                self.store
                    .record_transaction(TransactionRecord::failed(
                        sender_user_id.to_string(),
                        account.address,
                        receiver_address,
                        amount,
                    ))
                    .await?;

                Err(WalletError::LedgerSubmission(e.to_string()))
            }
        }
    }

    /// Grant platform reward tokens through the reward entry point.
    ///
    /// Signed with the platform authority key, never a user key. Receiver
    /// identity is best-effort: an address with no registered wallet is
    /// recorded as UNKNOWN rather than failing the grant.
    pub async fn reward_transfer(
        &self,
        receiver_address: WalletAddress,
        amount: TokenAmount,
        reason: &str,
    ) -> Result<TransferReceipt> {
        if amount.is_zero() {
            return Err(WalletError::Validation(
                "reward amount must be positive".to_string(),
            ));
        }

        let user_id = match self.store.account_by_address(&receiver_address).await? {
            Some(account) => account.user_id,
            None => {
                warn!(
                    receiver = %receiver_address,
                    "No wallet registered for reward receiver, recording as UNKNOWN"
                );
                UNKNOWN_USER.to_string()
            }
        };

        let issued_at = Utc::now().timestamp();
        let message =
            RewardInvocation::signing_bytes(&receiver_address, amount, reason, issued_at);
        let invocation = RewardInvocation {
            recipient: receiver_address,
            amount,
            reason: reason.to_string(),
            issued_at,
            authority: *self.authority.public_key(),
            signature: self.authority.sign(&message),
        };

        match self.ledger.invoke_reward(invocation).await {
            Ok(hash) => {
                let explorer_url = self.config.explorer_tx_url(&hash);

                self.store
                    .record_reward(RewardRecord::success(
                        user_id.clone(),
                        receiver_address,
                        amount,
                        hash.clone(),
                        explorer_url.clone(),
                        reason.to_string(),
                    ))
                    .await?;

                info!(
                    user_id = %user_id,
                    receiver = %receiver_address,
                    amount = amount.to_display(),
                    reason = %reason,
                    tx_hash = %hash,
                    "✅ Reward granted"
                );

                Ok(TransferReceipt { hash, explorer_url })
            }
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    receiver = %receiver_address,
                    amount = amount.to_display(),
                    reason = %reason,
                    error = %e,
                    "❌ Reward grant failed"
                );

                self.store
                    .record_reward(RewardRecord::failed(
                        user_id,
                        receiver_address,
                        amount,
                        reason.to_string(),
                    ))
                    .await?;

                Err(WalletError::LedgerSubmission(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::WalletAccount;
    use crate::audit::{AuditStatus, FAILED_HASH};
    use crate::signer::StoredKeySigner;
    use crate::store::MemoryWalletStore;
    use fairwork_chain::MemoryLedger;
    use fairwork_types::UserRole;

    struct Harness {
        store: Arc<MemoryWalletStore>,
        ledger: Arc<MemoryLedger>,
        engine: TransferEngine,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryWalletStore::new());
        let authority = Arc::new(Keypair::generate());
        let ledger = Arc::new(MemoryLedger::new(*authority.public_key()));
        let signer = Arc::new(StoredKeySigner::new(store.clone()));
        let engine = TransferEngine::new(
            store.clone(),
            ledger.clone(),
            signer,
            ChainConfig::default(),
            authority,
        );
        Harness {
            store,
            ledger,
            engine,
        }
    }

    async fn seed_wallet(h: &Harness, user_id: &str, balance: f64) -> WalletAddress {
        let keypair = Keypair::generate();
        let address = WalletAddress::from_public_key(keypair.public_key());
        h.store
            .insert_account(
                WalletAccount {
                    user_id: user_id.to_string(),
                    username: user_id.to_string(),
                    email: format!("{}@fairwork.io", user_id),
                    role: UserRole::Company,
                    address,
                    created_at: Utc::now(),
                },
                keypair.to_bytes(),
            )
            .await
            .unwrap();
        if balance > 0.0 {
            h.ledger
                .credit(address, TokenAmount::from_display(balance))
                .await;
        }
        address
    }

    #[tokio::test]
    async fn test_successful_transfer_records_one_success_row() {
        let h = harness();
        let sender = seed_wallet(&h, "alice", 10.0).await;
        let receiver = WalletAddress::from_bytes([9; 32]);

        let receipt = h
            .engine
            .transfer("alice", receiver, TokenAmount::from_display(4.0))
            .await
            .unwrap();

        assert_ne!(receipt.hash, FAILED_HASH);
        assert!(receipt.explorer_url.contains(&receipt.hash));

        let history = h.store.transactions_for_user("alice").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, AuditStatus::Success);
        assert_eq!(history[0].hash, receipt.hash);
        assert_eq!(history[0].sender_address, sender);
        assert_eq!(history[0].receiver_address, receiver);
    }

    #[tokio::test]
    async fn test_failed_transfer_records_one_failed_row() {
        let h = harness();
        seed_wallet(&h, "alice", 1.0).await;

        // More than the ledger balance: rejected at submission time.
        let result = h
            .engine
            .transfer(
                "alice",
                WalletAddress::from_bytes([9; 32]),
                TokenAmount::from_display(5.0),
            )
            .await;
        assert!(matches!(result, Err(WalletError::LedgerSubmission(_))));

        let history = h.store.transactions_for_user("alice").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, AuditStatus::Failed);
        assert_eq!(history[0].hash, FAILED_HASH);
    }

    #[tokio::test]
    async fn test_network_failure_records_one_failed_row() {
        let h = harness();
        seed_wallet(&h, "alice", 10.0).await;
        h.ledger.set_offline(Some("rpc timeout")).await;

        let result = h
            .engine
            .transfer(
                "alice",
                WalletAddress::from_bytes([9; 32]),
                TokenAmount::from_display(1.0),
            )
            .await;
        assert!(matches!(result, Err(WalletError::LedgerSubmission(_))));

        let history = h.store.transactions_for_user("alice").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, AuditStatus::Failed);
    }

    #[tokio::test]
    async fn test_key_mismatch_aborts_without_audit_row() {
        let h = harness();

        // Account row points at one address, key row holds a different key.
        let keypair = Keypair::generate();
        h.store
            .insert_account(
                WalletAccount {
                    user_id: "corrupt".to_string(),
                    username: "corrupt".to_string(),
                    email: "corrupt@fairwork.io".to_string(),
                    role: UserRole::Company,
                    address: WalletAddress::from_bytes([0xCC; 32]),
                    created_at: Utc::now(),
                },
                keypair.to_bytes(),
            )
            .await
            .unwrap();

        let result = h
            .engine
            .transfer(
                "corrupt",
                WalletAddress::from_bytes([9; 32]),
                TokenAmount::from_display(1.0),
            )
            .await;
        assert!(matches!(result, Err(WalletError::KeyMismatch { .. })));

        // The attempt never started, so nothing was recorded.
        let history = h.store.transactions_for_user("corrupt").await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_sender_is_not_found() {
        let h = harness();
        let result = h
            .engine
            .transfer(
                "ghost",
                WalletAddress::from_bytes([9; 32]),
                TokenAmount::from_display(1.0),
            )
            .await;
        assert!(matches!(result, Err(WalletError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reward_resolves_receiver_identity() {
        let h = harness();
        let address = seed_wallet(&h, "worker-7", 0.0).await;

        h.engine
            .reward_transfer(address, TokenAmount::from_display(2.0), "task bounty")
            .await
            .unwrap();

        let rewards = h.store.rewards_for_user("worker-7").await.unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].status, AuditStatus::Success);
        assert_eq!(rewards[0].reason, "task bounty");
    }

    #[tokio::test]
    async fn test_reward_to_unregistered_address_is_unknown() {
        let h = harness();
        let address = WalletAddress::from_bytes([0x42; 32]);

        h.engine
            .reward_transfer(address, TokenAmount::from_display(2.0), "referral")
            .await
            .unwrap();

        let rewards = h.store.rewards_for_user(UNKNOWN_USER).await.unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].status, AuditStatus::Success);
        assert_eq!(rewards[0].receiver_address, address);
    }

    #[tokio::test]
    async fn test_reward_failure_still_recorded() {
        let h = harness();
        let address = seed_wallet(&h, "worker-7", 0.0).await;
        h.ledger.set_offline(Some("rpc timeout")).await;

        let result = h
            .engine
            .reward_transfer(address, TokenAmount::from_display(2.0), "task bounty")
            .await;
        assert!(matches!(result, Err(WalletError::LedgerSubmission(_))));

        let rewards = h.store.rewards_for_user("worker-7").await.unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].status, AuditStatus::Failed);
        assert_eq!(rewards[0].hash, FAILED_HASH);
    }
}
