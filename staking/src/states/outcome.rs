use crate::contract::TxHash;
use serde::Serialize;
use std::fmt;

/// User-initiated writes against the staking contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Deposit,
    Withdraw,
    WithdrawAll,
    EmergencyWithdraw,
    Claim,
}

impl Action {
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::Deposit => "Deposited successfully",
            Action::Withdraw | Action::WithdrawAll | Action::EmergencyWithdraw => {
                "Withdrew successfully"
            }
            Action::Claim => "Claimed successfully",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Deposit => "Deposit error",
            Action::Withdraw | Action::WithdrawAll | Action::EmergencyWithdraw => "Withdraw error",
            Action::Claim => "Claim error",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
            Action::WithdrawAll => "withdraw all",
            Action::EmergencyWithdraw => "emergency withdraw",
            Action::Claim => "claim",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionStatus {
    Success { tx_hash: TxHash },
    Failure { reason: String },
}

/// What an action reports back to its caller. Actions never return `Err`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub action: Action,
    #[serde(flatten)]
    pub status: ActionStatus,
}

impl ActionOutcome {
    pub fn success(action: Action, tx_hash: TxHash) -> Self {
        Self {
            action,
            status: ActionStatus::Success { tx_hash },
        }
    }

    pub fn failure(action: Action, reason: impl ToString) -> Self {
        Self {
            action,
            status: ActionStatus::Failure {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ActionStatus::Success { .. })
    }

    /// The message shown to the user for this outcome.
    pub fn message(&self) -> &'static str {
        if self.is_success() {
            self.action.success_message()
        } else {
            self.action.failure_message()
        }
    }
}
