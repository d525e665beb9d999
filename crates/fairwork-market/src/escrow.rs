use crate::error::{MarketError, Result};
use crate::listing::{Listing, ListingDraft, ListingStore};
use fairwork_types::TokenAmount;
use fairwork_wallet::{BalanceOracle, BalanceReading, TransferEngine, WalletDirectory};
use std::sync::Arc;
use tracing::{info, warn};

/// Gate between a listing draft and the listing store.
///
/// A rewarded listing exists only after the reward has verifiably moved
/// from the owner's wallet into the platform escrow address. The balance
/// check and the debit are deliberately not atomic against the ledger:
/// two concurrent postings can both pass the check, and the ledger itself
/// rejects whichever debit lands second.
pub struct EscrowGate {
    directory: Arc<WalletDirectory>,
    oracle: Arc<BalanceOracle>,
    engine: Arc<TransferEngine>,
    listings: Arc<ListingStore>,
}

impl EscrowGate {
    pub fn new(
        directory: Arc<WalletDirectory>,
        oracle: Arc<BalanceOracle>,
        engine: Arc<TransferEngine>,
        listings: Arc<ListingStore>,
    ) -> Self {
        Self {
            directory,
            oracle,
            engine,
            listings,
        }
    }

    pub async fn post_listing(&self, owner_id: &str, draft: ListingDraft) -> Result<Listing> {
        draft.validate()?;

        if draft.reward == 0.0 {
            return Ok(self.listings.insert(owner_id, draft).await);
        }

        let owner = self.directory.get_wallet(owner_id).await?;
        let required = TokenAmount::from_display(draft.reward);

        let available = match self.oracle.check_balance(&owner.address).await {
            BalanceReading::Available { balance } => balance,
            BalanceReading::Unavailable { reason } => {
                warn!(
                    owner_id = %owner_id,
                    address = %owner.address,
                    reason = %reason,
                    "⚠️ Balance unavailable, refusing rewarded listing"
                );
                return Err(MarketError::Ledger(format!(
                    "balance unavailable: {}",
                    reason
                )));
            }
        };

        if available < required {
            let shortfall = required.saturating_sub(available);
            warn!(
                owner_id = %owner_id,
                required = required.to_display(),
                available = available.to_display(),
                shortfall = shortfall.to_display(),
                "❌ Insufficient funds for listing reward"
            );
            return Err(MarketError::InsufficientFunds {
                required,
                available,
                shortfall,
            });
        }

        // The escrow transfer writes its own audit row, success or failure.
        let receipt = self
            .engine
            .transfer(owner_id, self.engine.escrow_address(), required)
            .await?;

        let listing = self.listings.insert(owner_id, draft).await;

        info!(
            listing_id = listing.id,
            owner_id = %owner_id,
            reward = listing.reward,
            escrow_tx = %receipt.hash,
            "🔒 Reward escrowed and listing published"
        );

        Ok(listing)
    }
}
