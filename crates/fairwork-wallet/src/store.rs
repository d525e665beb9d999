use crate::account::WalletAccount;
use crate::audit::{RewardRecord, TransactionRecord};
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use fairwork_types::WalletAddress;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Storage seam for accounts, secret keys, and audit records.
///
/// Audit records are append-only: the trait deliberately has no update or
/// delete surface for them. Secret keys are reachable only through
/// `load_secret_key`, which exists for the signing seam and nothing else.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn insert_account(&self, account: WalletAccount, secret_key: Vec<u8>) -> Result<()>;
    async fn account_by_user(&self, user_id: &str) -> Result<Option<WalletAccount>>;
    async fn account_by_email(&self, email: &str) -> Result<Option<WalletAccount>>;
    async fn account_by_address(&self, address: &WalletAddress) -> Result<Option<WalletAccount>>;

    /// Load the raw secret key for a user. Callers must drop the bytes as
    /// soon as the signing operation completes.
    async fn load_secret_key(&self, user_id: &str) -> Result<Option<Vec<u8>>>;

    async fn record_transaction(&self, record: TransactionRecord) -> Result<()>;
    async fn record_reward(&self, record: RewardRecord) -> Result<()>;

    async fn transactions_for_user(&self, user_id: &str) -> Result<Vec<TransactionRecord>>;
    async fn rewards_for_user(&self, user_id: &str) -> Result<Vec<RewardRecord>>;

    /// Newest-first page of a user's transaction history. The cursor is
    /// `"timestamp:hash"` of the last row of the previous page.
    async fn transactions_for_user_paginated(
        &self,
        user_id: &str,
        limit: usize,
        cursor: Option<String>,
    ) -> Result<(Vec<TransactionRecord>, Option<String>)>;
}

/// In-memory store used by tests and local runs.
pub struct MemoryWalletStore {
    accounts: Arc<RwLock<HashMap<String, WalletAccount>>>,
    by_email: Arc<RwLock<HashMap<String, String>>>,
    by_address: Arc<RwLock<HashMap<WalletAddress, String>>>,
    secret_keys: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    transactions: Arc<RwLock<Vec<TransactionRecord>>>,
    rewards: Arc<RwLock<Vec<RewardRecord>>>,
}

impl Default for MemoryWalletStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            by_email: Arc::new(RwLock::new(HashMap::new())),
            by_address: Arc::new(RwLock::new(HashMap::new())),
            secret_keys: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(Vec::new())),
            rewards: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn insert_account(&self, account: WalletAccount, secret_key: Vec<u8>) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let mut by_email = self.by_email.write().await;
        let mut by_address = self.by_address.write().await;
        let mut secrets = self.secret_keys.write().await;

        if accounts.contains_key(&account.user_id) {
            return Err(WalletError::Conflict(format!(
                "account already exists for user {}",
                account.user_id
            )));
        }
        if by_email.contains_key(&account.email) {
            return Err(WalletError::Conflict(format!(
                "account already exists for email {}",
                account.email
            )));
        }

        by_email.insert(account.email.clone(), account.user_id.clone());
        by_address.insert(account.address, account.user_id.clone());
        secrets.insert(account.user_id.clone(), secret_key);

        info!(
            user_id = %account.user_id,
            address = %account.address,
            role = %account.role,
            "💾 Wallet account stored"
        );

        accounts.insert(account.user_id.clone(), account);
        Ok(())
    }

    async fn account_by_user(&self, user_id: &str) -> Result<Option<WalletAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(user_id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<WalletAccount>> {
        let by_email = self.by_email.read().await;
        let accounts = self.accounts.read().await;
        Ok(by_email.get(email).and_then(|id| accounts.get(id).cloned()))
    }

    async fn account_by_address(&self, address: &WalletAddress) -> Result<Option<WalletAccount>> {
        let by_address = self.by_address.read().await;
        let accounts = self.accounts.read().await;
        Ok(by_address
            .get(address)
            .and_then(|id| accounts.get(id).cloned()))
    }

    async fn load_secret_key(&self, user_id: &str) -> Result<Option<Vec<u8>>> {
        let secrets = self.secret_keys.read().await;
        Ok(secrets.get(user_id).cloned())
    }

    async fn record_transaction(&self, record: TransactionRecord) -> Result<()> {
        let mut transactions = self.transactions.write().await;

        info!(
            user_id = %record.user_id,
            sender = %record.sender_address,
            receiver = %record.receiver_address,
            amount = record.amount.to_display(),
            tx_hash = %record.hash,
            status = %record.status,
            history_size_after = transactions.len() + 1,
            "📦 Transaction recorded"
        );

        transactions.push(record);
        Ok(())
    }

    async fn record_reward(&self, record: RewardRecord) -> Result<()> {
        let mut rewards = self.rewards.write().await;

        info!(
            user_id = %record.user_id,
            receiver = %record.receiver_address,
            amount = record.amount.to_display(),
            tx_hash = %record.hash,
            status = %record.status,
            reason = %record.reason,
            "📦 Reward recorded"
        );

        rewards.push(record);
        Ok(())
    }

    async fn transactions_for_user(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn rewards_for_user(&self, user_id: &str) -> Result<Vec<RewardRecord>> {
        let rewards = self.rewards.read().await;
        Ok(rewards
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn transactions_for_user_paginated(
        &self,
        user_id: &str,
        limit: usize,
        cursor: Option<String>,
    ) -> Result<(Vec<TransactionRecord>, Option<String>)> {
        let transactions = self.transactions.read().await;

        let mut filtered: Vec<TransactionRecord> = transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let start = match cursor {
            Some(cursor) => {
                let position = filtered
                    .iter()
                    .position(|tx| format!("{}:{}", tx.created_at.timestamp(), tx.hash) == cursor);
                match position {
                    Some(idx) => idx + 1,
                    None => {
                        debug!(cursor = %cursor, "Pagination cursor not found, starting from top");
                        0
                    }
                }
            }
            None => 0,
        };

        let page: Vec<TransactionRecord> =
            filtered.iter().skip(start).take(limit).cloned().collect();

        let next_cursor = if start + page.len() < filtered.len() {
            page.last()
                .map(|tx| format!("{}:{}", tx.created_at.timestamp(), tx.hash))
        } else {
            None
        };

        Ok((page, next_cursor))
    }
}
