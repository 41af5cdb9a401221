use super::{ApprovalPolicy, Orchestrator};
use crate::{amount::TokenAmount, states::{Action, ActionOutcome}};
use log::warn;

impl Orchestrator {
    /// Stakes `amount` of the pool's stake token.
    ///
    /// Steps:
    /// 1) Convert `amount` to base units, refusing an amount built for other
    ///    decimals, and look up the pool's stake token.
    /// 2) Read the current allowance for the staking contract.
    /// 3) If it is below the amount, approve an unlimited allowance and wait
    ///    for it. A failed approval is logged; under [`ApprovalPolicy::Proceed`]
    ///    the deposit is still attempted.
    /// 4) Submit the deposit.
    /// 5) On confirmation refresh the pool list and notify.
    pub fn deposit(&self, pid: usize, amount: &TokenAmount) -> ActionOutcome {
        self.execute(Action::Deposit, false, || {
            // --- 1) Base units and stake token ---
            let value = amount.base_units_for(self.sync.decimals())?;
            let from = self.sync.account()?;
            let pool = self.sync.pool(pid)?;

            // --- 2) Allowance ---
            let allowance = self.sync.get_allowance(&pool.stake_token);

            // --- 3) Approve when short ---
            if allowance < value {
                if let Err(err) = self.sync.approve(&pool.stake_token) {
                    match self.approval_policy {
                        ApprovalPolicy::Proceed => {
                            warn!("{}; submitting deposit to pool {} anyway", err, pid)
                        }
                        ApprovalPolicy::Abort => return Err(err),
                    }
                }
            }

            // --- 4) Deposit ---
            self.sync.staking().deposit(pid, value, &from)
        })
    }
}
