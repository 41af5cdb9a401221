use super::Orchestrator;
use crate::states::{Action, ActionOutcome};

impl Orchestrator {
    /// Harvests pending rewards. Unlike the other actions this also refreshes
    /// the reward vector, since the claimed pool's reward drops to zero.
    pub fn claim(&self, pid: usize) -> ActionOutcome {
        self.execute(Action::Claim, true, || {
            let from = self.sync.account()?;
            self.sync.staking().claim(pid, &from)
        })
    }
}
