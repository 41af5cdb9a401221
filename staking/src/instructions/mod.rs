//! Transaction orchestration: one file per user action.
//!
//! Every action has the same shape: attempt the write, refresh what the write
//! changed, notify, and report an [`ActionOutcome`]. Errors never escape an
//! action.

pub mod claim;
pub mod deposit;
pub mod emergency_withdraw;
pub mod withdraw;

use crate::{
    contract::TxHash,
    error::Result,
    states::{Action, ActionOutcome},
    sync::PoolSynchronizer,
};
use log::{error, info};
use std::sync::Arc;

/// What a deposit does when the approval it depends on fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Log the approval failure and submit the deposit anyway; the contract
    /// rejects it if the allowance really is short.
    #[default]
    Proceed,
    /// Give up on the deposit.
    Abort,
}

pub struct Orchestrator {
    sync: Arc<PoolSynchronizer>,
    approval_policy: ApprovalPolicy,
}

impl Orchestrator {
    pub fn new(sync: Arc<PoolSynchronizer>) -> Self {
        Self {
            sync,
            approval_policy: ApprovalPolicy::default(),
        }
    }

    pub fn with_approval_policy(mut self, approval_policy: ApprovalPolicy) -> Self {
        self.approval_policy = approval_policy;
        self
    }

    pub fn approval_policy(&self) -> ApprovalPolicy {
        self.approval_policy
    }

    pub fn synchronizer(&self) -> &Arc<PoolSynchronizer> {
        &self.sync
    }

    /// Runs `write`, refreshes state after a confirmed write and reports.
    fn execute<F>(&self, action: Action, refresh_rewards: bool, write: F) -> ActionOutcome
    where
        F: FnOnce() -> Result<TxHash>,
    {
        match write() {
            Ok(tx_hash) => {
                info!("{} confirmed in {}", action, tx_hash);
                // refresh failures are logged by the synchronizer
                let _ = self.sync.refresh_pools();
                if refresh_rewards {
                    self.sync.refresh_rewards();
                }
                self.sync.notifier().success(action.success_message());
                ActionOutcome::success(action, tx_hash)
            }
            Err(err) => {
                error!("{} error: {}", action, err);
                self.sync.notifier().error(action.failure_message());
                ActionOutcome::failure(action, err)
            }
        }
    }
}
