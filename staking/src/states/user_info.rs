use crate::{amount::TokenAmount, contract::RawUserInfo};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

//
// ──────────────────────────────────────────────────────────────────────────────
// UserInfo
// ──────────────────────────────────────────────────────────────────────────────
//

/// The connected account's position in one pool.
///
/// Fetched on demand and always replaced as a whole; never merged with an
/// older read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    /// Amount the account has staked.
    pub amount: TokenAmount,

    /// Contract-side reward accounting checkpoint. Not interpreted here.
    pub reward_debt: TokenAmount,

    /// Rewards accrued as of the read. The poller keeps a fresher figure.
    pub pending_rewards: TokenAmount,

    /// UNIX timestamp (seconds) of the last deposit or withdrawal.
    pub last_action: u64,
}

impl UserInfo {
    pub fn from_raw(raw: RawUserInfo, decimals: u8) -> Self {
        Self {
            amount: TokenAmount::from_base_units(raw.amount, decimals),
            reward_debt: TokenAmount::from_base_units(raw.reward_debt, decimals),
            pending_rewards: TokenAmount::from_base_units(raw.pending_rewards, decimals),
            last_action: raw.last_action,
        }
    }

    /// Seconds left before an ordinary withdrawal is allowed.
    /// Zero or negative means the stake is unlocked.
    pub fn remaining_lockup(&self, lockup_duration: u64, now: u64) -> i64 {
        remaining_lockup(lockup_duration, self.last_action, now)
    }
}

pub fn remaining_lockup(lockup_duration: u64, last_action: u64, now: u64) -> i64 {
    let elapsed = now as i128 - last_action as i128;
    let remaining = lockup_duration as i128 - elapsed;
    remaining.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
