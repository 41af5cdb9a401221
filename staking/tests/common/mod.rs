#![allow(dead_code)]

use hotdoge_staking::{
    contract::{
        RawPoolInfo, RawUserInfo, StakingContract, TokenBalances, TokenContract, TxHash, Wallet,
        WalletType,
    },
    notify::Notifier,
    sync::{Collaborators, PoolSynchronizer},
    Address, Result, StakingError, TokenAmount, U256,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

pub const STAKING: &str = "0x4b1f5768378d4d086f90db781b02bb10aeab95fb";
pub const HOTDOGE: &str = "0x7b01b8d1f90cea54d24d0b385c7fc377fb0573d9";
pub const ALICE: &str = "0x00000000000000000000000000000000000a11ce";

pub fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

pub fn tokens(text: &str) -> TokenAmount {
    TokenAmount::parse(text, 18).unwrap()
}

pub fn units(text: &str) -> U256 {
    tokens(text).base_units()
}

/// Switches that make the matching call fail.
#[derive(Default)]
pub struct Failures {
    pub pool_count: bool,
    pub pool_info_at: Option<usize>,
    pub user_info: bool,
    pub pending_rewards: bool,
    pub fee: bool,
    pub allowance: bool,
    pub approve: bool,
    pub writes: bool,
}

#[derive(Default)]
struct Ledger {
    pools: Vec<RawPoolInfo>,
    users: HashMap<(usize, Address), RawUserInfo>,
    allowances: HashMap<(Address, Address, Address), U256>,
    balances: HashMap<(Address, Address), U256>,
    pending: HashMap<usize, U256>,
    fee: u64,
    now: u64,
}

/// In-memory staking contract plus ERC20 token, counting every call.
pub struct MockChain {
    address: Address,
    ledger: Mutex<Ledger>,
    pub failures: Mutex<Failures>,
    /// Writes in submission order.
    pub writes: Mutex<Vec<&'static str>>,
    pub pool_count_calls: AtomicUsize,
    pub pool_info_calls: AtomicUsize,
    pub pending_calls: AtomicUsize,
    /// Delay applied inside every `pending_rewards` call.
    pub pending_delay: Mutex<Duration>,
    pub pending_in_flight: AtomicUsize,
    /// Most `pending_rewards` calls ever running at the same time.
    pub pending_peak: AtomicUsize,
    tx_counter: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            address: addr(STAKING),
            ledger: Mutex::new(Ledger {
                now: 1_700_000_000,
                ..Ledger::default()
            }),
            failures: Mutex::new(Failures::default()),
            writes: Mutex::new(Vec::new()),
            pool_count_calls: AtomicUsize::new(0),
            pool_info_calls: AtomicUsize::new(0),
            pending_calls: AtomicUsize::new(0),
            pending_delay: Mutex::new(Duration::ZERO),
            pending_in_flight: AtomicUsize::new(0),
            pending_peak: AtomicUsize::new(0),
            tx_counter: AtomicUsize::new(0),
        })
    }

    pub fn add_pool(&self, lockup_duration: u64) -> usize {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.pools.push(RawPoolInfo {
            stake_token: addr(HOTDOGE),
            reward_token: addr(HOTDOGE),
            reward_per_block: units("0.5"),
            lockup_duration,
            deposited_amount: U256::zero(),
            lp_pool: false,
        });
        ledger.pools.len() - 1
    }

    pub fn clear_pools(&self) {
        self.ledger.lock().unwrap().pools.clear();
    }

    pub fn set_fee(&self, fee: u64) {
        self.ledger.lock().unwrap().fee = fee;
    }

    pub fn slow_pending(&self, delay: Duration) {
        *self.pending_delay.lock().unwrap() = delay;
    }

    pub fn set_pending(&self, pid: usize, amount: U256) {
        self.ledger.lock().unwrap().pending.insert(pid, amount);
    }

    pub fn set_allowance(&self, owner: &Address, amount: U256) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger
            .allowances
            .insert((addr(HOTDOGE), owner.clone(), self.address.clone()), amount);
    }

    pub fn set_balance(&self, owner: &Address, amount: U256) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.balances.insert((addr(HOTDOGE), owner.clone()), amount);
    }

    pub fn staked(&self, pid: usize, account: &Address) -> U256 {
        let ledger = self.ledger.lock().unwrap();
        ledger
            .users
            .get(&(pid, account.clone()))
            .map(|user| user.amount)
            .unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<&'static str> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail(&self, configure: impl FnOnce(&mut Failures)) {
        configure(&mut self.failures.lock().unwrap());
    }

    fn failing(&self, check: impl FnOnce(&Failures) -> bool) -> bool {
        check(&self.failures.lock().unwrap())
    }

    fn submit(&self, name: &'static str) -> Result<TxHash> {
        self.writes.lock().unwrap().push(name);
        if self.failing(|f| f.writes) {
            return Err(StakingError::Transaction(format!("{} rejected", name)));
        }
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        Ok(format!("0x{:064x}", n + 1))
    }

    fn take_stake(&self, pid: usize, from: &Address, name: &'static str) -> Result<TxHash> {
        Self::pool_exists(&self.ledger.lock().unwrap(), pid)?;
        let tx = self.submit(name)?;
        let mut ledger = self.ledger.lock().unwrap();
        let staked = ledger
            .users
            .get_mut(&(pid, from.clone()))
            .map(|user| std::mem::take(&mut user.amount))
            .unwrap_or_default();
        ledger.pools[pid].deposited_amount = ledger.pools[pid].deposited_amount - staked;
        Ok(tx)
    }

    fn pool_exists(ledger: &Ledger, pid: usize) -> Result<()> {
        if pid < ledger.pools.len() {
            Ok(())
        } else {
            Err(StakingError::Reverted(format!("invalid pool {}", pid)))
        }
    }
}

impl StakingContract for MockChain {
    fn address(&self) -> &Address {
        &self.address
    }

    fn pool_count(&self) -> Result<usize> {
        self.pool_count_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing(|f| f.pool_count) {
            return Err(StakingError::Call("getPoolCount".into()));
        }
        Ok(self.ledger.lock().unwrap().pools.len())
    }

    fn pool_info(&self, pid: usize) -> Result<RawPoolInfo> {
        self.pool_info_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing(|f| f.pool_info_at == Some(pid)) {
            return Err(StakingError::Call(format!("poolInfo({})", pid)));
        }
        let ledger = self.ledger.lock().unwrap();
        ledger
            .pools
            .get(pid)
            .cloned()
            .ok_or_else(|| StakingError::Call(format!("poolInfo({})", pid)))
    }

    fn user_info(&self, pid: usize, account: &Address) -> Result<RawUserInfo> {
        if self.failing(|f| f.user_info) {
            return Err(StakingError::Call("userInfo".into()));
        }
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .users
            .get(&(pid, account.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn pending_rewards(&self, pid: usize, _account: &Address) -> Result<U256> {
        self.pending_calls.fetch_add(1, Ordering::SeqCst);
        let running = self.pending_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending_peak.fetch_max(running, Ordering::SeqCst);
        let delay = *self.pending_delay.lock().unwrap();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        self.pending_in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing(|f| f.pending_rewards) {
            return Err(StakingError::Call("pendingRewards".into()));
        }
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .pending
            .get(&pid)
            .copied()
            .unwrap_or_default())
    }

    fn fee(&self) -> Result<u64> {
        if self.failing(|f| f.fee) {
            return Err(StakingError::Call("fee".into()));
        }
        Ok(self.ledger.lock().unwrap().fee)
    }

    fn deposit(&self, pid: usize, amount: U256, from: &Address) -> Result<TxHash> {
        {
            let ledger = self.ledger.lock().unwrap();
            Self::pool_exists(&ledger, pid)?;
            let allowance = ledger
                .allowances
                .get(&(addr(HOTDOGE), from.clone(), self.address.clone()))
                .copied()
                .unwrap_or_default();
            if allowance < amount {
                self.writes.lock().unwrap().push("deposit");
                return Err(StakingError::Reverted("insufficient allowance".into()));
            }
        }
        let tx = self.submit("deposit")?;
        let mut ledger = self.ledger.lock().unwrap();
        let now = ledger.now;
        ledger.pools[pid].deposited_amount = ledger.pools[pid].deposited_amount + amount;
        let user = ledger.users.entry((pid, from.clone())).or_default();
        user.amount = user.amount + amount;
        user.last_action = now;
        Ok(tx)
    }

    fn withdraw(&self, pid: usize, amount: U256, from: &Address) -> Result<TxHash> {
        {
            let ledger = self.ledger.lock().unwrap();
            Self::pool_exists(&ledger, pid)?;
            let staked = ledger
                .users
                .get(&(pid, from.clone()))
                .map(|user| user.amount)
                .unwrap_or_default();
            if staked < amount {
                return Err(StakingError::Reverted("withdraw: not good".into()));
            }
        }
        let tx = self.submit("withdraw")?;
        let mut ledger = self.ledger.lock().unwrap();
        ledger.pools[pid].deposited_amount = ledger.pools[pid].deposited_amount - amount;
        let user = ledger.users.entry((pid, from.clone())).or_default();
        user.amount = user.amount - amount;
        Ok(tx)
    }

    fn withdraw_all(&self, pid: usize, from: &Address) -> Result<TxHash> {
        self.take_stake(pid, from, "withdraw_all")
    }

    fn emergency_withdraw(&self, pid: usize, from: &Address) -> Result<TxHash> {
        let tx = self.take_stake(pid, from, "emergency_withdraw")?;
        self.ledger.lock().unwrap().pending.remove(&pid);
        Ok(tx)
    }

    fn claim(&self, pid: usize, _from: &Address) -> Result<TxHash> {
        Self::pool_exists(&self.ledger.lock().unwrap(), pid)?;
        let tx = self.submit("claim")?;
        self.ledger.lock().unwrap().pending.remove(&pid);
        Ok(tx)
    }
}

impl TokenContract for MockChain {
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Result<U256> {
        if self.failing(|f| f.allowance) {
            return Err(StakingError::Call("allowance".into()));
        }
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .allowances
            .get(&(token.clone(), owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default())
    }

    fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: U256,
        from: &Address,
    ) -> Result<TxHash> {
        self.writes.lock().unwrap().push("approve");
        if self.failing(|f| f.approve) {
            return Err(StakingError::Transaction("user rejected approval".into()));
        }
        self.ledger
            .lock()
            .unwrap()
            .allowances
            .insert((token.clone(), from.clone(), spender.clone()), amount);
        Ok("0xapproved".to_string())
    }
}

impl TokenBalances for MockChain {
    fn token_balance(&self, account: &Address, token: &Address) -> Result<TokenAmount> {
        let ledger = self.ledger.lock().unwrap();
        let raw = ledger
            .balances
            .get(&(token.clone(), account.clone()))
            .copied()
            .unwrap_or_default();
        Ok(TokenAmount::from_base_units(raw, 18))
    }
}

pub struct MockWallet {
    account: Mutex<Option<Address>>,
}

impl MockWallet {
    pub fn connected(account: &str) -> Arc<Self> {
        Arc::new(Self {
            account: Mutex::new(Some(addr(account))),
        })
    }

    pub fn disconnected() -> Arc<Self> {
        Arc::new(Self {
            account: Mutex::new(None),
        })
    }
}

impl Wallet for MockWallet {
    fn account(&self) -> Option<Address> {
        self.account.lock().unwrap().clone()
    }

    fn connect(&self, _wallet_type: WalletType) -> Result<()> {
        *self.account.lock().unwrap() = Some(addr(ALICE));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub struct Harness {
    pub chain: Arc<MockChain>,
    pub notifier: Arc<RecordingNotifier>,
    pub sync: Arc<PoolSynchronizer>,
}

pub fn harness_with_wallet(wallet: Arc<MockWallet>) -> Harness {
    let chain = MockChain::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let sync = Arc::new(PoolSynchronizer::new(Collaborators {
        staking: chain.clone(),
        token: chain.clone(),
        balances: chain.clone(),
        wallet,
        notifier: notifier.clone(),
    }));
    Harness {
        chain,
        notifier,
        sync,
    }
}

pub fn harness() -> Harness {
    harness_with_wallet(MockWallet::connected(ALICE))
}
