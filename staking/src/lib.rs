//! Client-side state synchronization and transaction orchestration for the
//! HOTDOGE staking contract.
//!
//! The crate never talks to a node directly. Every chain interaction goes
//! through the collaborator traits in [`contract`], so the same logic runs
//! against a JSON-RPC adapter in the `client` binary and an in-memory chain in
//! tests.

use std::time::Duration;

pub mod address;
pub mod amount;
pub mod contract;
pub mod error;
pub mod instructions;
pub mod notify;
pub mod poller;
pub mod session;
pub mod states;
pub mod sync;

pub use address::Address;
pub use amount::{Fee, TokenAmount, U256};
pub use error::{Result, StakingError};
pub use instructions::{ApprovalPolicy, Orchestrator};
pub use poller::RewardPoller;
pub use session::StakingSession;
pub use sync::PoolSynchronizer;

/// Decimals of the HOTDOGE token and of every amount the staking contract reports.
pub const DEFAULT_DECIMALS: u8 = 18;

/// The contract stores its fee in thousandths.
pub const FEE_DENOMINATOR: u64 = 1_000;

/// Delay between two reward poll ticks.
pub const REWARD_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Allowance granted to the staking contract when the current one is too low.
pub const UNLIMITED_APPROVAL: &str = "1000000000000000000000000000000000000000000000000000000";
