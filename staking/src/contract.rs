//! Collaborators the core talks to. Concrete implementations live outside the
//! crate (the JSON-RPC adapter in the `client` binary, an in-memory chain in
//! tests).
//!
//! Reads return raw on-chain integers; writes block until the transaction is
//! confirmed and return its hash.

use crate::{
    address::Address,
    amount::{TokenAmount, U256},
    error::{Result, StakingError},
};
use std::{fmt, str::FromStr};

pub type TxHash = String;

/// `poolInfo(pid)` as returned by the staking contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPoolInfo {
    pub stake_token: Address,
    pub reward_token: Address,
    pub reward_per_block: U256,
    pub lockup_duration: u64,
    pub deposited_amount: U256,
    pub lp_pool: bool,
}

/// `userInfo(pid, account)` as returned by the staking contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawUserInfo {
    pub amount: U256,
    pub reward_debt: U256,
    pub pending_rewards: U256,
    pub last_action: u64,
}

pub trait StakingContract: Send + Sync {
    fn address(&self) -> &Address;

    fn pool_count(&self) -> Result<usize>;
    fn pool_info(&self, pid: usize) -> Result<RawPoolInfo>;
    fn user_info(&self, pid: usize, account: &Address) -> Result<RawUserInfo>;
    fn pending_rewards(&self, pid: usize, account: &Address) -> Result<U256>;
    /// Deposit fee in thousandths.
    fn fee(&self) -> Result<u64>;

    fn deposit(&self, pid: usize, amount: U256, from: &Address) -> Result<TxHash>;
    fn withdraw(&self, pid: usize, amount: U256, from: &Address) -> Result<TxHash>;
    fn withdraw_all(&self, pid: usize, from: &Address) -> Result<TxHash>;
    fn emergency_withdraw(&self, pid: usize, from: &Address) -> Result<TxHash>;
    fn claim(&self, pid: usize, from: &Address) -> Result<TxHash>;
}

/// ERC20-style allowance management on an arbitrary token.
pub trait TokenContract: Send + Sync {
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Result<U256>;
    fn approve(&self, token: &Address, spender: &Address, amount: U256, from: &Address)
        -> Result<TxHash>;
}

pub trait TokenBalances: Send + Sync {
    fn token_balance(&self, account: &Address, token: &Address) -> Result<TokenAmount>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletType {
    MetaMask,
    WalletConnect,
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletType::MetaMask => f.write_str("metamask"),
            WalletType::WalletConnect => f.write_str("walletconnect"),
        }
    }
}

impl FromStr for WalletType {
    type Err = StakingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "metamask" => Ok(WalletType::MetaMask),
            "walletconnect" => Ok(WalletType::WalletConnect),
            _ => Err(StakingError::UnsupportedWallet(s.to_string())),
        }
    }
}

pub trait Wallet: Send + Sync {
    fn account(&self) -> Option<Address>;

    fn connected(&self) -> bool {
        self.account().is_some()
    }

    fn connect(&self, wallet_type: WalletType) -> Result<()>;
}
