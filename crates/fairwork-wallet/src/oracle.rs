use fairwork_chain::LedgerClient;
use fairwork_types::{TokenAmount, WalletAddress, TOKEN_BASE_UNIT};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a balance probe. A ledger read failure is data the caller
/// inspects, not a fault that propagates.
#[derive(Debug, Clone)]
pub enum BalanceReading {
    Available { balance: TokenAmount },
    Unavailable { reason: String },
}

impl BalanceReading {
    pub fn is_available(&self) -> bool {
        matches!(self, BalanceReading::Available { .. })
    }

    pub fn balance(&self) -> Option<TokenAmount> {
        match self {
            BalanceReading::Available { balance } => Some(*balance),
            BalanceReading::Unavailable { .. } => None,
        }
    }
}

/// Wire-facing balance report in both unit systems.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub address: WalletAddress,
    pub balance_base: u64,
    pub balance_display: f64,
}

impl BalanceReport {
    pub fn from_balance(address: WalletAddress, balance: TokenAmount) -> Self {
        Self {
            address,
            balance_base: balance.to_base_units(),
            balance_display: balance.to_base_units() as f64 / TOKEN_BASE_UNIT as f64,
        }
    }
}

/// Reads spendable balances through the ledger client and normalizes base
/// units to display units.
pub struct BalanceOracle {
    ledger: Arc<dyn LedgerClient>,
}

impl BalanceOracle {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    pub async fn check_balance(&self, address: &WalletAddress) -> BalanceReading {
        match self.ledger.balance_of(address).await {
            Ok(balance) => {
                debug!(
                    address = %address,
                    balance_base = balance.to_base_units(),
                    balance_display = balance.to_display(),
                    "Balance read"
                );
                BalanceReading::Available { balance }
            }
            Err(e) => {
                warn!(
                    address = %address,
                    error = %e,
                    "⚠️ Balance read failed"
                );
                BalanceReading::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Balance probe shaped for the API surface.
    pub async fn report(&self, address: &WalletAddress) -> Option<BalanceReport> {
        self.check_balance(address)
            .await
            .balance()
            .map(|balance| BalanceReport::from_balance(*address, balance))
    }
}
