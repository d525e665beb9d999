use crate::error::{ChainError, Result};
use crate::ledger::{LedgerClient, RewardInvocation, SignedTransfer};
use async_trait::async_trait;
use fairwork_types::{PublicKey, TokenAmount, WalletAddress};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// In-memory ledger used by tests and local runs.
///
/// Enforces the same rules a real network would: envelope signatures must
/// verify, the sender address must match the signing key, balances are
/// checked at submission time, and transaction hashes are unique. A
/// switchable offline fault lets tests exercise network-failure paths.
pub struct MemoryLedger {
    balances: Arc<RwLock<HashMap<WalletAddress, TokenAmount>>>,
    seen_hashes: Arc<RwLock<HashSet<String>>>,
    offline: Arc<RwLock<Option<String>>>,
    authority: PublicKey,
}

impl MemoryLedger {
    pub fn new(authority: PublicKey) -> Self {
        Self {
            balances: Arc::new(RwLock::new(HashMap::new())),
            seen_hashes: Arc::new(RwLock::new(HashSet::new())),
            offline: Arc::new(RwLock::new(None)),
            authority,
        }
    }

    /// Seed an address with funds (faucet / test setup).
    pub async fn credit(&self, address: WalletAddress, amount: TokenAmount) {
        let mut balances = self.balances.write().await;
        let entry = balances.entry(address).or_insert(TokenAmount::ZERO);
        *entry = entry.saturating_add(amount);

        info!(
            address = %address,
            amount = amount.to_display(),
            balance_after = entry.to_display(),
            "💰 Ledger balance credited"
        );
    }

    /// Simulate a network outage. `Some(reason)` makes every subsequent
    /// call fail with `ChainError::Network(reason)`; `None` restores
    /// service.
    pub async fn set_offline(&self, reason: Option<&str>) {
        let mut offline = self.offline.write().await;
        *offline = reason.map(|r| r.to_string());
        if let Some(ref r) = *offline {
            warn!(reason = %r, "Ledger set offline");
        }
    }

    async fn check_online(&self) -> Result<()> {
        let offline = self.offline.read().await;
        match offline.as_ref() {
            Some(reason) => Err(ChainError::Network(reason.clone())),
            None => Ok(()),
        }
    }

    fn tx_hash(parts: &[&[u8]]) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    async fn register_hash(&self, hash: &str) -> Result<()> {
        let mut seen = self.seen_hashes.write().await;
        if !seen.insert(hash.to_string()) {
            return Err(ChainError::DuplicateHash(hash.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn balance_of(&self, address: &WalletAddress) -> Result<TokenAmount> {
        self.check_online().await?;

        let balances = self.balances.read().await;
        Ok(balances.get(address).copied().unwrap_or(TokenAmount::ZERO))
    }

    async fn submit_transfer(&self, transfer: SignedTransfer) -> Result<String> {
        self.check_online().await?;

        let payload = &transfer.payload;

        // The envelope must be signed by the key that owns the sender address.
        if WalletAddress::from_public_key(&transfer.public_key) != payload.sender {
            return Err(ChainError::InvalidSignature(
                "signing key does not own the sender address".to_string(),
            ));
        }
        if !transfer
            .public_key
            .verify(&payload.signing_bytes(), &transfer.signature)
        {
            return Err(ChainError::InvalidSignature(
                "transfer signature verification failed".to_string(),
            ));
        }

        let mut balances = self.balances.write().await;

        let sender_balance = balances
            .get(&payload.sender)
            .copied()
            .unwrap_or(TokenAmount::ZERO);
        if sender_balance < payload.amount {
            return Err(ChainError::Rejected(format!(
                "insufficient balance: {} has {}, needs {}",
                payload.sender, sender_balance, payload.amount
            )));
        }

        let recipient_balance = balances
            .get(&payload.recipient)
            .copied()
            .unwrap_or(TokenAmount::ZERO);
        let new_recipient_balance = recipient_balance
            .checked_add(payload.amount)
            .ok_or_else(|| ChainError::Rejected("recipient balance overflow".to_string()))?;

        let hash = Self::tx_hash(&[
            payload.sender.as_bytes(),
            payload.recipient.as_bytes(),
            &payload.amount.to_base_units().to_le_bytes(),
            &payload.issued_at.to_le_bytes(),
        ]);
        self.register_hash(&hash).await?;

        balances.insert(payload.sender, sender_balance.saturating_sub(payload.amount));
        balances.insert(payload.recipient, new_recipient_balance);

        info!(
            sender = %payload.sender,
            recipient = %payload.recipient,
            amount = payload.amount.to_display(),
            tx_hash = %hash,
            "✅ Transfer executed"
        );

        Ok(hash)
    }

    async fn invoke_reward(&self, invocation: RewardInvocation) -> Result<String> {
        self.check_online().await?;

        if invocation.authority != self.authority {
            return Err(ChainError::InvalidSignature(
                "reward invocation not signed by the platform authority".to_string(),
            ));
        }

        let message = RewardInvocation::signing_bytes(
            &invocation.recipient,
            invocation.amount,
            &invocation.reason,
            invocation.issued_at,
        );
        if !invocation.authority.verify(&message, &invocation.signature) {
            return Err(ChainError::InvalidSignature(
                "reward signature verification failed".to_string(),
            ));
        }

        let hash = Self::tx_hash(&[
            b"reward",
            invocation.recipient.as_bytes(),
            &invocation.amount.to_base_units().to_le_bytes(),
            invocation.reason.as_bytes(),
            &invocation.issued_at.to_le_bytes(),
        ]);
        self.register_hash(&hash).await?;

        let mut balances = self.balances.write().await;
        let entry = balances
            .entry(invocation.recipient)
            .or_insert(TokenAmount::ZERO);
        *entry = entry.saturating_add(invocation.amount);

        debug!(
            recipient = %invocation.recipient,
            amount = invocation.amount.to_display(),
            reason = %invocation.reason,
            tx_hash = %hash,
            "Reward entry point invoked"
        );

        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransferPayload;
    use fairwork_types::Keypair;

    fn signed_transfer(
        keypair: &Keypair,
        recipient: WalletAddress,
        amount: TokenAmount,
        issued_at: i64,
    ) -> SignedTransfer {
        let payload = TransferPayload {
            sender: WalletAddress::from_public_key(keypair.public_key()),
            recipient,
            amount,
            issued_at,
        };
        let signature = keypair.sign(&payload.signing_bytes());
        SignedTransfer {
            payload,
            public_key: *keypair.public_key(),
            signature,
        }
    }

    #[tokio::test]
    async fn test_transfer_moves_funds() {
        let authority = Keypair::generate();
        let ledger = MemoryLedger::new(*authority.public_key());

        let sender = Keypair::generate();
        let sender_addr = WalletAddress::from_public_key(sender.public_key());
        let recipient = WalletAddress::from_bytes([7; 32]);

        ledger
            .credit(sender_addr, TokenAmount::from_display(10.0))
            .await;

        let hash = ledger
            .submit_transfer(signed_transfer(
                &sender,
                recipient,
                TokenAmount::from_display(4.0),
                1,
            ))
            .await
            .unwrap();
        assert!(!hash.is_empty());

        assert_eq!(
            ledger.balance_of(&sender_addr).await.unwrap(),
            TokenAmount::from_display(6.0)
        );
        assert_eq!(
            ledger.balance_of(&recipient).await.unwrap(),
            TokenAmount::from_display(4.0)
        );
    }

    #[tokio::test]
    async fn test_transfer_rejects_overdraft() {
        let authority = Keypair::generate();
        let ledger = MemoryLedger::new(*authority.public_key());

        let sender = Keypair::generate();
        let sender_addr = WalletAddress::from_public_key(sender.public_key());

        ledger
            .credit(sender_addr, TokenAmount::from_display(1.0))
            .await;

        let result = ledger
            .submit_transfer(signed_transfer(
                &sender,
                WalletAddress::from_bytes([7; 32]),
                TokenAmount::from_display(5.0),
                1,
            ))
            .await;

        assert!(matches!(result, Err(ChainError::Rejected(_))));
        // Nothing moved
        assert_eq!(
            ledger.balance_of(&sender_addr).await.unwrap(),
            TokenAmount::from_display(1.0)
        );
    }

    #[tokio::test]
    async fn test_transfer_rejects_forged_sender() {
        let authority = Keypair::generate();
        let ledger = MemoryLedger::new(*authority.public_key());

        let thief = Keypair::generate();
        let victim_addr = WalletAddress::from_bytes([9; 32]);
        ledger.credit(victim_addr, TokenAmount::from_display(10.0)).await;

        // Payload claims the victim as sender but is signed by the thief.
        let payload = TransferPayload {
            sender: victim_addr,
            recipient: WalletAddress::from_public_key(thief.public_key()),
            amount: TokenAmount::from_display(10.0),
            issued_at: 1,
        };
        let signature = thief.sign(&payload.signing_bytes());
        let result = ledger
            .submit_transfer(SignedTransfer {
                payload,
                public_key: *thief.public_key(),
                signature,
            })
            .await;

        assert!(matches!(result, Err(ChainError::InvalidSignature(_))));
    }

    #[tokio::test]
    async fn test_duplicate_hash_rejected() {
        let authority = Keypair::generate();
        let ledger = MemoryLedger::new(*authority.public_key());

        let sender = Keypair::generate();
        let sender_addr = WalletAddress::from_public_key(sender.public_key());
        ledger
            .credit(sender_addr, TokenAmount::from_display(10.0))
            .await;

        let transfer = signed_transfer(
            &sender,
            WalletAddress::from_bytes([7; 32]),
            TokenAmount::from_display(1.0),
            42,
        );

        ledger.submit_transfer(transfer.clone()).await.unwrap();
        let result = ledger.submit_transfer(transfer).await;
        assert!(matches!(result, Err(ChainError::DuplicateHash(_))));
    }

    #[tokio::test]
    async fn test_reward_requires_authority() {
        let authority = Keypair::generate();
        let ledger = MemoryLedger::new(*authority.public_key());

        let recipient = WalletAddress::from_bytes([3; 32]);
        let amount = TokenAmount::from_display(2.0);

        // Properly signed invocation succeeds
        let message = RewardInvocation::signing_bytes(&recipient, amount, "bounty", 5);
        let invocation = RewardInvocation {
            recipient,
            amount,
            reason: "bounty".to_string(),
            issued_at: 5,
            authority: *authority.public_key(),
            signature: authority.sign(&message),
        };
        ledger.invoke_reward(invocation).await.unwrap();
        assert_eq!(ledger.balance_of(&recipient).await.unwrap(), amount);

        // An imposter key is refused
        let imposter = Keypair::generate();
        let message = RewardInvocation::signing_bytes(&recipient, amount, "bounty", 6);
        let forged = RewardInvocation {
            recipient,
            amount,
            reason: "bounty".to_string(),
            issued_at: 6,
            authority: *imposter.public_key(),
            signature: imposter.sign(&message),
        };
        assert!(matches!(
            ledger.invoke_reward(forged).await,
            Err(ChainError::InvalidSignature(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_fault() {
        let authority = Keypair::generate();
        let ledger = MemoryLedger::new(*authority.public_key());
        let address = WalletAddress::from_bytes([1; 32]);

        ledger.set_offline(Some("link down")).await;
        assert!(matches!(
            ledger.balance_of(&address).await,
            Err(ChainError::Network(_))
        ));

        ledger.set_offline(None).await;
        assert!(ledger.balance_of(&address).await.is_ok());
    }
}
