pub mod abi;
pub mod rpc;
pub mod staking_instructions;
pub mod token_instructions;
pub mod utils;
