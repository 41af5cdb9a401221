use super::rpc::RpcClient;
use hotdoge_staking::{
    contract::{Wallet, WalletType},
    Address, Result, StakingError,
};
use log::{info, warn};
use std::sync::{Arc, Mutex, PoisonError};

/// Wallet backed by the accounts the node manages (`eth_accounts`).
pub struct NodeWallet {
    rpc: Arc<RpcClient>,
    preferred: Option<Address>,
    account: Mutex<Option<Address>>,
}

impl NodeWallet {
    pub fn new(rpc: Arc<RpcClient>, preferred: Option<Address>) -> Self {
        Self {
            rpc,
            preferred,
            account: Mutex::new(None),
        }
    }
}

impl Wallet for NodeWallet {
    fn account(&self) -> Option<Address> {
        self.account
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Picks the configured account if the node manages it, otherwise the
    /// node's first account.
    fn connect(&self, wallet_type: WalletType) -> Result<()> {
        if wallet_type != WalletType::MetaMask {
            return Err(StakingError::UnsupportedWallet(wallet_type.to_string()));
        }
        let accounts = self.rpc.accounts()?;
        let chosen = match &self.preferred {
            Some(preferred) if accounts.contains(preferred) => Some(preferred.clone()),
            Some(preferred) => {
                warn!("configured account {} is not managed by the node", preferred);
                accounts.first().cloned()
            }
            None => accounts.first().cloned(),
        };
        let account = chosen.ok_or(StakingError::WalletNotConnected)?;
        info!("connected {}", account.short());
        *self.account.lock().unwrap_or_else(PoisonError::into_inner) = Some(account);
        Ok(())
    }
}

/// Warns when the node is on a different network than configured.
pub fn check_network(rpc: &RpcClient, network_id: u64, network_name: &str) {
    match rpc.chain_id() {
        Ok(chain_id) if chain_id == network_id => info!("connected to {}", network_name),
        Ok(chain_id) => warn!(
            "node reports chain {} but {} is chain {}",
            chain_id, network_name, network_id
        ),
        Err(err) => warn!("could not read chain id: {}", err),
    }
}
