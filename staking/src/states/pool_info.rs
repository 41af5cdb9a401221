use crate::{address::Address, amount::TokenAmount, contract::RawPoolInfo};
use serde::Serialize;

//
// ──────────────────────────────────────────────────────────────────────────────
// PoolInfo
// ──────────────────────────────────────────────────────────────────────────────
//

/// One staking pool as last read from the contract.
///
/// A pool has no identity of its own: its `pid` is its index in the most
/// recently fetched list, and the whole list is replaced on every refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    /// Token users deposit.
    pub stake_token: Address,

    /// Token paid out as rewards.
    pub reward_token: Address,

    /// Rewards minted per block for the whole pool.
    pub reward_per_block: TokenAmount,

    /// Seconds a deposit must stay before an ordinary withdrawal.
    pub lockup_duration: u64,

    /// Total amount currently staked in the pool.
    pub deposited_amount: TokenAmount,

    /// Whether the stake token is an LP token. Display only.
    pub lp_pool: bool,
}

impl PoolInfo {
    pub fn from_raw(raw: RawPoolInfo, decimals: u8) -> Self {
        Self {
            stake_token: raw.stake_token,
            reward_token: raw.reward_token,
            reward_per_block: TokenAmount::from_base_units(raw.reward_per_block, decimals),
            lockup_duration: raw.lockup_duration,
            deposited_amount: TokenAmount::from_base_units(raw.deposited_amount, decimals),
            lp_pool: raw.lp_pool,
        }
    }

    pub fn has_lockup(&self) -> bool {
        self.lockup_duration > 0
    }
}
