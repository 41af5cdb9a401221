use super::Orchestrator;
use crate::states::{Action, ActionOutcome};

impl Orchestrator {
    /// Withdraws the whole stake ignoring the lockup. Pending rewards are
    /// forfeited per the contract's rules.
    pub fn emergency_withdraw(&self, pid: usize) -> ActionOutcome {
        self.execute(Action::EmergencyWithdraw, false, || {
            let from = self.sync.account()?;
            self.sync.staking().emergency_withdraw(pid, &from)
        })
    }
}
