//! Pool registry and user state synchronizer.
//!
//! Holds the client's view of the contract: the pool list, the polled reward
//! vector and the fee. Each is swapped as a whole value behind its lock, so a
//! reader sees either the previous snapshot or the next one, never a mix.

use crate::{
    address::Address,
    amount::{Fee, TokenAmount, U256},
    contract::{StakingContract, TokenBalances, TokenContract, TxHash, Wallet},
    error::{Result, StakingError},
    notify::Notifier,
    states::{PoolInfo, PoolPosition, UserInfo},
    DEFAULT_DECIMALS, UNLIMITED_APPROVAL,
};
use log::{debug, error, info};
use std::{
    sync::{Arc, PoisonError, RwLock},
    thread,
};

/// Everything the synchronizer reads from or reports to.
#[derive(Clone)]
pub struct Collaborators {
    pub staking: Arc<dyn StakingContract>,
    pub token: Arc<dyn TokenContract>,
    pub balances: Arc<dyn TokenBalances>,
    pub wallet: Arc<dyn Wallet>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct PoolSynchronizer {
    deps: Collaborators,
    decimals: u8,
    pools: RwLock<Arc<Vec<PoolInfo>>>,
    rewards: RwLock<Arc<Vec<TokenAmount>>>,
    fee: RwLock<Fee>,
}

impl PoolSynchronizer {
    pub fn new(deps: Collaborators) -> Self {
        Self::with_decimals(deps, DEFAULT_DECIMALS)
    }

    pub fn with_decimals(deps: Collaborators, decimals: u8) -> Self {
        Self {
            deps,
            decimals,
            pools: RwLock::new(Arc::new(Vec::new())),
            rewards: RwLock::new(Arc::new(Vec::new())),
            fee: RwLock::new(Fee::default()),
        }
    }

    pub fn staking(&self) -> &dyn StakingContract {
        self.deps.staking.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.deps.notifier.as_ref()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// The connected account, required by every write.
    pub fn account(&self) -> Result<Address> {
        self.deps
            .wallet
            .account()
            .ok_or(StakingError::WalletNotConnected)
    }

    pub fn pools(&self) -> Arc<Vec<PoolInfo>> {
        self.pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn pool(&self, pid: usize) -> Result<PoolInfo> {
        self.pools()
            .get(pid)
            .cloned()
            .ok_or(StakingError::UnknownPool(pid))
    }

    pub fn rewards(&self) -> Arc<Vec<TokenAmount>> {
        self.rewards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fee(&self) -> Fee {
        *self.fee.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-reads every pool and swaps the list in one step.
    ///
    /// Steps:
    /// 1) Read the pool count. Zero empties the list.
    /// 2) Read `poolInfo(pid)` for every pid in parallel.
    /// 3) If all reads succeeded, replace the list; otherwise keep the old one.
    ///
    /// Failures are logged only; this is a background read.
    pub fn refresh_pools(&self) -> Result<usize> {
        // --- 1) Pool count ---
        let count = self.staking().pool_count().map_err(|err| {
            error!("get pool count error: {}", err);
            err
        })?;
        if count == 0 {
            self.replace_pools(Vec::new());
            return Ok(0);
        }

        // --- 2) One detail read per pool ---
        let decimals = self.decimals;
        let pools = query_all(count, |pid| {
            self.staking()
                .pool_info(pid)
                .map(|raw| PoolInfo::from_raw(raw, decimals))
        });

        // --- 3) All or nothing ---
        match pools {
            Ok(pools) => {
                debug!("loaded {} pools", pools.len());
                self.replace_pools(pools);
                Ok(count)
            }
            Err(err) => {
                error!("get pool list error: {}", err);
                Err(err)
            }
        }
    }

    fn replace_pools(&self, pools: Vec<PoolInfo>) {
        *self.pools.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(pools);
    }

    /// Position of the connected account in `pid`. `None` when it can't be read.
    pub fn get_user_info(&self, pid: usize) -> Option<UserInfo> {
        let account = self.deps.wallet.account()?;
        match self.staking().user_info(pid, &account) {
            Ok(raw) => Some(UserInfo::from_raw(raw, self.decimals)),
            Err(err) => {
                error!("get user info error: {}", err);
                None
            }
        }
    }

    pub fn get_pending_rewards(&self, pid: usize) -> TokenAmount {
        let pending = self
            .account()
            .and_then(|account| self.staking().pending_rewards(pid, &account));
        match pending {
            Ok(raw) => TokenAmount::from_base_units(raw, self.decimals),
            Err(err) => {
                error!("get pending rewards error: {}", err);
                TokenAmount::zero(self.decimals)
            }
        }
    }

    /// Re-reads pending rewards for every loaded pool and swaps the vector.
    /// Without a connected account every entry is zero and nothing is queried.
    pub fn refresh_rewards(&self) -> Arc<Vec<TokenAmount>> {
        let count = self.pools().len();
        let zeros = || vec![TokenAmount::zero(self.decimals); count];
        let rewards = match self.deps.wallet.account() {
            Some(_) => query_all(count, |pid| Ok(self.get_pending_rewards(pid)))
                .unwrap_or_else(|_| zeros()),
            None => zeros(),
        };
        let rewards = Arc::new(rewards);
        *self.rewards.write().unwrap_or_else(PoisonError::into_inner) = rewards.clone();
        rewards
    }

    /// Allowance the connected account granted the staking contract on `token`.
    ///
    /// This gates a write the user is about to make, so a failure is shown to
    /// the user as well as logged. Falls back to zero.
    pub fn get_allowance(&self, token: &Address) -> U256 {
        let allowance = self.account().and_then(|owner| {
            self.deps
                .token
                .allowance(token, &owner, self.staking().address())
        });
        match allowance {
            Ok(allowance) => allowance,
            Err(err) => {
                error!("get allowance error: {}", err);
                self.notifier().error(&err.to_string());
                U256::zero()
            }
        }
    }

    /// Grants the staking contract an effectively unlimited allowance on
    /// `token` and waits for the approval to confirm.
    pub fn approve(&self, token: &Address) -> Result<TxHash> {
        let approved = self.account().and_then(|owner| {
            let amount = U256::from_dec_str(UNLIMITED_APPROVAL).map_err(|_| StakingError::Overflow)?;
            self.deps
                .token
                .approve(token, self.staking().address(), amount, &owner)
        });
        match approved {
            Ok(tx_hash) => {
                info!("approved {} for staking contract in {}", token, tx_hash);
                Ok(tx_hash)
            }
            Err(err) => {
                error!("approve error: {}", err);
                self.notifier().error(&err.to_string());
                Err(StakingError::ApprovalFailed(err.to_string()))
            }
        }
    }

    /// Reads the deposit fee. A failed read resets it to zero.
    pub fn refresh_fee(&self) -> Fee {
        let fee = match self.staking().fee() {
            Ok(raw) => Fee::from_raw(raw),
            Err(err) => {
                error!("get fee error: {}", err);
                Fee::default()
            }
        };
        *self.fee.write().unwrap_or_else(PoisonError::into_inner) = fee;
        fee
    }

    /// Gathers what a pool card shows for `pid`: the pool, the account's
    /// position, its polled reward, its wallet balance and the fee.
    pub fn position(&self, pid: usize) -> Result<PoolPosition> {
        let pool = self.pool(pid)?;
        let reward = self
            .rewards()
            .get(pid)
            .copied()
            .unwrap_or_else(|| TokenAmount::zero(self.decimals));
        Ok(PoolPosition {
            pid,
            user: self.get_user_info(pid),
            balance: self.token_balance(&pool.stake_token),
            fee: self.fee(),
            reward,
            pool,
        })
    }

    /// Wallet balance of `token` for the connected account; zero when unknown.
    pub fn token_balance(&self, token: &Address) -> TokenAmount {
        let Some(account) = self.deps.wallet.account() else {
            return TokenAmount::zero(self.decimals);
        };
        self.deps
            .balances
            .token_balance(&account, token)
            .unwrap_or_else(|err| {
                error!("get token balance error: {}", err);
                TokenAmount::zero(self.decimals)
            })
    }
}

/// Upper bound on the threads one `query_all` call spawns.
const MAX_QUERY_THREADS: usize = 8;

/// Runs `query(pid)` for every pid, spread over at most [`MAX_QUERY_THREADS`]
/// scoped threads, and collects the results in pid order. The first failure
/// wins.
fn query_all<T, F>(count: usize, query: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Sync,
{
    let workers = count.min(MAX_QUERY_THREADS);
    let mut results: Vec<Option<Result<T>>> = (0..count).map(|_| None).collect();
    thread::scope(|scope| {
        let query = &query;
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    (worker..count)
                        .step_by(workers)
                        .map(|pid| (pid, query(pid)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(done) => {
                    for (pid, result) in done {
                        results[pid] = Some(result);
                    }
                }
                Err(_) => {
                    for pid in (worker..count).step_by(workers) {
                        results[pid] = Some(Err(StakingError::Call(format!(
                            "query for pool {} panicked",
                            pid
                        ))));
                    }
                }
            }
        }
    });
    results
        .into_iter()
        .enumerate()
        .map(|(pid, result)| {
            result.unwrap_or_else(|| {
                Err(StakingError::Call(format!("no result for pool {}", pid)))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    #[test]
    fn query_all_keeps_pid_order_with_bounded_threads() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);
        let results = query_all(40, |pid| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(pid * 10)
        })
        .unwrap();

        assert_eq!(results, (0..40).map(|pid| pid * 10).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= MAX_QUERY_THREADS);
    }

    #[test]
    fn query_all_reports_a_failed_pid() {
        let result = query_all(12, |pid| {
            if pid == 9 {
                Err(StakingError::Call(format!("poolInfo({})", pid)))
            } else {
                Ok(pid)
            }
        });
        assert_eq!(result, Err(StakingError::Call("poolInfo(9)".into())));
        assert_eq!(query_all(0, |pid| Ok(pid)), Ok(Vec::new()));
    }
}
