use crate::{
    amount::TokenAmount,
    error::Result,
    instructions::{ApprovalPolicy, Orchestrator},
    poller::RewardPoller,
    states::{ActionOutcome, PoolPosition},
    sync::PoolSynchronizer,
    REWARD_POLL_INTERVAL,
};
use log::error;
use std::{sync::Arc, time::Duration};

/// Owns the synchronizer, orchestrator and reward poller for one connected
/// client, and keeps the poller alive exactly while pools are loaded.
pub struct StakingSession {
    sync: Arc<PoolSynchronizer>,
    orchestrator: Orchestrator,
    poller: Option<RewardPoller>,
    poll_interval: Duration,
}

impl StakingSession {
    pub fn new(sync: Arc<PoolSynchronizer>) -> Self {
        Self {
            orchestrator: Orchestrator::new(sync.clone()),
            sync,
            poller: None,
            poll_interval: REWARD_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_approval_policy(mut self, policy: ApprovalPolicy) -> Self {
        self.orchestrator = Orchestrator::new(self.sync.clone()).with_approval_policy(policy);
        self
    }

    pub fn synchronizer(&self) -> &Arc<PoolSynchronizer> {
        &self.sync
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().map_or(false, RewardPoller::is_running)
    }

    /// Reads the fee once, then the pool list.
    pub fn start(&mut self) -> Result<usize> {
        self.sync.refresh_fee();
        self.refresh_pools()
    }

    pub fn refresh_pools(&mut self) -> Result<usize> {
        let refreshed = self.sync.refresh_pools();
        self.sync_poller();
        refreshed
    }

    /// Starts the poller when pools appear and stops it when they are gone.
    fn sync_poller(&mut self) {
        let loaded = !self.sync.pools().is_empty();
        if loaded && !self.is_polling() {
            match RewardPoller::start(self.sync.clone(), self.poll_interval) {
                Ok(poller) => self.poller = Some(poller),
                Err(err) => error!("{}", err),
            }
        } else if !loaded {
            self.stop_polling();
        }
    }

    fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }

    pub fn deposit(&mut self, pid: usize, amount: &TokenAmount) -> ActionOutcome {
        let outcome = self.orchestrator.deposit(pid, amount);
        self.sync_poller();
        outcome
    }

    pub fn withdraw(&mut self, pid: usize, amount: &TokenAmount) -> ActionOutcome {
        let outcome = self.orchestrator.withdraw(pid, amount);
        self.sync_poller();
        outcome
    }

    pub fn withdraw_all(&mut self, pid: usize) -> ActionOutcome {
        let outcome = self.orchestrator.withdraw_all(pid);
        self.sync_poller();
        outcome
    }

    pub fn emergency_withdraw(&mut self, pid: usize) -> ActionOutcome {
        let outcome = self.orchestrator.emergency_withdraw(pid);
        self.sync_poller();
        outcome
    }

    pub fn claim(&mut self, pid: usize) -> ActionOutcome {
        let outcome = self.orchestrator.claim(pid);
        self.sync_poller();
        outcome
    }

    pub fn position(&self, pid: usize) -> Result<PoolPosition> {
        self.sync.position(pid)
    }

    pub fn shutdown(&mut self) {
        self.stop_polling();
    }
}

impl Drop for StakingSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
