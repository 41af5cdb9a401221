use crate::{
    amount::{Fee, TokenAmount},
    error::Result,
    states::{remaining_lockup, PoolInfo, UserInfo},
};
use serde::Serialize;

/// Everything a pool card needs to render one pool for the connected account.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoolPosition {
    pub pid: usize,
    pub pool: PoolInfo,
    /// `None` when no position could be read.
    pub user: Option<UserInfo>,
    /// Latest polled pending reward.
    pub reward: TokenAmount,
    /// Wallet balance of the stake token.
    pub balance: TokenAmount,
    pub fee: Fee,
}

impl PoolPosition {
    pub fn staked(&self) -> TokenAmount {
        self.user
            .as_ref()
            .map(|user| user.amount)
            .unwrap_or_else(|| TokenAmount::zero(self.pool.deposited_amount.decimals()))
    }

    pub fn remaining_lockup(&self, now: u64) -> i64 {
        let last_action = self.user.as_ref().map_or(0, |user| user.last_action);
        remaining_lockup(self.pool.lockup_duration, last_action, now)
    }

    pub fn is_unlocked(&self, now: u64) -> bool {
        self.remaining_lockup(now) <= 0
    }

    /// Share of the pool owned by the account, as a percentage with two decimals.
    pub fn user_share_percent(&self) -> String {
        self.staked().percent_of(&self.pool.deposited_amount)
    }

    pub fn fee_for(&self, amount: &TokenAmount) -> Result<TokenAmount> {
        self.fee.apply(amount)
    }

    pub fn can_deposit(&self, amount: &TokenAmount) -> bool {
        !amount.is_zero() && *amount <= self.balance
    }

    pub fn can_withdraw(&self, now: u64) -> bool {
        !self.staked().is_zero() && self.is_unlocked(now)
    }

    pub fn can_emergency_withdraw(&self) -> bool {
        !self.staked().is_zero()
    }

    pub fn can_claim(&self) -> bool {
        !self.reward.is_zero()
    }
}

/// Renders a duration in seconds as `1d 2h 3m 4s`, dropping zero components.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "0s".to_string();
    }
    let units = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];
    let mut rest = seconds;
    let mut parts = Vec::new();
    for (size, suffix) in units {
        let count = rest / size;
        rest %= size;
        if count > 0 {
            parts.push(format!("{}{}", count, suffix));
        }
    }
    parts.join(" ")
}
