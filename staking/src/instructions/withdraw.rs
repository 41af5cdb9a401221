use super::Orchestrator;
use crate::{amount::TokenAmount, states::{Action, ActionOutcome}};

impl Orchestrator {
    /// Withdraws part of the stake. The contract rejects amounts above the
    /// stake and withdrawals still inside the lockup.
    pub fn withdraw(&self, pid: usize, amount: &TokenAmount) -> ActionOutcome {
        self.execute(Action::Withdraw, false, || {
            let value = amount.base_units_for(self.sync.decimals())?;
            let from = self.sync.account()?;
            self.sync.staking().withdraw(pid, value, &from)
        })
    }

    /// Withdraws the whole stake. Takes no amount: the contract uses the
    /// recorded stake.
    pub fn withdraw_all(&self, pid: usize) -> ActionOutcome {
        self.execute(Action::WithdrawAll, false, || {
            let from = self.sync.account()?;
            self.sync.staking().withdraw_all(pid, &from)
        })
    }
}
