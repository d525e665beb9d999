use crate::config::NodeConfig;
use anyhow::{Context, Result};
use fairwork_chain::MemoryLedger;
use fairwork_market::Marketplace;
use fairwork_types::{Keypair, TokenAmount, WalletAddress};
use fairwork_wallet::{
    BalanceOracle, MemoryWalletStore, StoredKeySigner, TransferEngine, WalletDirectory,
    WalletStore,
};
use std::sync::Arc;
use tracing::info;

/// Derive a deterministic keypair from a seed string.
pub fn derive_keypair_from_seed(seed: &str) -> Result<Keypair> {
    let digest = blake3::hash(seed.as_bytes());
    Keypair::from_bytes(digest.as_bytes()).context("keypair derivation failed")
}

/// Composition root: constructs every service explicitly and hands the
/// ledger client, signer, and network config in as dependencies.
pub struct FairworkNode {
    pub config: NodeConfig,
    pub store: Arc<MemoryWalletStore>,
    pub ledger: Arc<MemoryLedger>,
    pub directory: Arc<WalletDirectory>,
    pub oracle: Arc<BalanceOracle>,
    pub engine: Arc<TransferEngine>,
    pub market: Arc<Marketplace>,
}

impl FairworkNode {
    pub fn new(config: NodeConfig) -> Result<Self> {
        let authority = Arc::new(derive_keypair_from_seed(&config.node.authority_seed)?);

        let store = Arc::new(MemoryWalletStore::new());
        let ledger = Arc::new(MemoryLedger::new(*authority.public_key()));
        let signer = Arc::new(StoredKeySigner::new(store.clone()));

        let directory = Arc::new(WalletDirectory::new(store.clone()));
        let oracle = Arc::new(BalanceOracle::new(ledger.clone()));
        let engine = Arc::new(TransferEngine::new(
            store.clone(),
            ledger.clone(),
            signer,
            config.chain.clone(),
            authority,
        ));
        let market = Arc::new(Marketplace::new(
            directory.clone(),
            oracle.clone(),
            engine.clone(),
        ));

        info!(
            node = %config.node.name,
            network = %config.chain.network,
            escrow = %config.chain.escrow_address,
            "🚀 Fairwork node assembled"
        );

        Ok(Self {
            config,
            store,
            ledger,
            directory,
            oracle,
            engine,
            market,
        })
    }

    /// Testnet faucet: seed a ledger address with display-unit funds.
    pub async fn faucet(&self, address: WalletAddress, amount: f64) -> Result<()> {
        self.ledger
            .credit(address, TokenAmount::from_display(amount))
            .await;
        Ok(())
    }

    /// Audit queries used by the API surface.
    pub async fn transactions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<fairwork_wallet::TransactionRecord>> {
        Ok(self.store.transactions_for_user(user_id).await?)
    }

    pub async fn rewards_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<fairwork_wallet::RewardRecord>> {
        Ok(self.store.rewards_for_user(user_id).await?)
    }
}
