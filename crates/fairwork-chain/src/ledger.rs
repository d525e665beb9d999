use crate::error::Result;
use async_trait::async_trait;
use fairwork_types::{PublicKey, Signature, TokenAmount, WalletAddress};
use serde::{Deserialize, Serialize};

/// Unsigned value-transfer payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferPayload {
    pub sender: WalletAddress,
    pub recipient: WalletAddress,
    pub amount: TokenAmount,
    /// Unix timestamp when the payload was built; feeds the tx hash.
    pub issued_at: i64,
}

impl TransferPayload {
    /// Canonical byte encoding signed by the sender.
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"fairwork.transfer.v1");
        data.extend_from_slice(self.sender.as_bytes());
        data.extend_from_slice(self.recipient.as_bytes());
        data.extend_from_slice(&self.amount.to_base_units().to_le_bytes());
        data.extend_from_slice(&self.issued_at.to_le_bytes());
        data
    }
}

/// Signed transfer envelope submitted to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransfer {
    pub payload: TransferPayload,
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// Invocation of the platform reward entry point. Only a holder of the
/// platform authority key can produce a valid one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardInvocation {
    pub recipient: WalletAddress,
    pub amount: TokenAmount,
    pub reason: String,
    pub issued_at: i64,
    pub authority: PublicKey,
    pub signature: Signature,
}

impl RewardInvocation {
    /// Canonical byte encoding signed by the platform authority.
    pub fn signing_bytes(
        recipient: &WalletAddress,
        amount: TokenAmount,
        reason: &str,
        issued_at: i64,
    ) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"fairwork.reward.v1");
        data.extend_from_slice(recipient.as_bytes());
        data.extend_from_slice(&amount.to_base_units().to_le_bytes());
        data.extend_from_slice(reason.as_bytes());
        data.extend_from_slice(&issued_at.to_le_bytes());
        data
    }
}

/// Protocol adapter for the external ledger network.
///
/// Calls either complete or fail within the client's own timeout; callers
/// never retry. Network-level failures surface as [`crate::ChainError`].
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current spendable balance of an address, in base units.
    async fn balance_of(&self, address: &WalletAddress) -> Result<TokenAmount>;

    /// Submit a signed value transfer and await its terminal outcome.
    /// Returns the transaction hash on success.
    async fn submit_transfer(&self, transfer: SignedTransfer) -> Result<String>;

    /// Invoke the reward-granting entry point and await its terminal
    /// outcome. Returns the transaction hash on success.
    async fn invoke_reward(&self, invocation: RewardInvocation) -> Result<String>;
}
