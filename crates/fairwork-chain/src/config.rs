use fairwork_types::WalletAddress;
use serde::{Deserialize, Serialize};

/// Network configuration for the active ledger.
///
/// Constructed once at startup and passed explicitly into everything that
/// touches the ledger; there is no process-wide network state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Network name, recorded in explorer URLs
    pub network: String,
    /// Base URL of the block explorer
    pub explorer_base: String,
    /// Platform-held address that receives listing escrow
    pub escrow_address: WalletAddress,
}

impl ChainConfig {
    /// Build the explorer URL for a transaction hash.
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!(
            "{}/tx/{}?network={}",
            self.explorer_base.trim_end_matches('/'),
            hash,
            self.network
        )
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: "fairnet-testnet".to_string(),
            explorer_base: "https://explorer.fairnet.io".to_string(),
            escrow_address: WalletAddress::platform_escrow(),
        }
    }
}
