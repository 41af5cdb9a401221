use super::{
    abi::{self, address_word, decode_words, encode_call, pid_word, uint_word},
    rpc::{send_txn, RpcClient},
};
use hotdoge_staking::{
    contract::{RawPoolInfo, RawUserInfo, StakingContract, TxHash},
    Address, Result, StakingError, U256,
};
use std::sync::Arc;

/// The staking contract reached over JSON-RPC.
pub struct EvmStakingContract {
    rpc: Arc<RpcClient>,
    address: Address,
}

impl EvmStakingContract {
    pub fn new(rpc: Arc<RpcClient>, address: Address) -> Self {
        Self { rpc, address }
    }

    fn read(&self, data: Vec<u8>, words: usize) -> Result<Vec<abi::Word>> {
        decode_words(&self.rpc.call(&self.address, &data)?, words)
    }

    fn write(&self, data: Vec<u8>, from: &Address) -> Result<TxHash> {
        send_txn(&self.rpc, from, &self.address, &data, true)
    }
}

impl StakingContract for EvmStakingContract {
    fn address(&self) -> &Address {
        &self.address
    }

    fn pool_count(&self) -> Result<usize> {
        let words = self.read(encode_call(abi::GET_POOL_COUNT, &[]), 1)?;
        let count = abi::word_to_u64(&words[0])?;
        usize::try_from(count).map_err(|_| StakingError::Decode(format!("pool count {}", count)))
    }

    /// `poolInfo` returns, in order: stakeToken, rewardToken, rewardPerBlock,
    /// lockupDuration, lastRewardBlock, accRewardPerShare, depositedAmount,
    /// lpPool. The two accumulator words are not used client-side.
    fn pool_info(&self, pid: usize) -> Result<RawPoolInfo> {
        let w = self.read(encode_call(abi::POOL_INFO, &[pid_word(pid)]), 8)?;
        Ok(RawPoolInfo {
            stake_token: abi::word_to_address(&w[0]),
            reward_token: abi::word_to_address(&w[1]),
            reward_per_block: abi::word_to_uint(&w[2]),
            lockup_duration: abi::word_to_u64(&w[3])?,
            deposited_amount: abi::word_to_uint(&w[6]),
            lp_pool: abi::word_to_bool(&w[7]),
        })
    }

    fn user_info(&self, pid: usize, account: &Address) -> Result<RawUserInfo> {
        let data = encode_call(abi::USER_INFO, &[pid_word(pid), address_word(account)]);
        let w = self.read(data, 4)?;
        Ok(RawUserInfo {
            amount: abi::word_to_uint(&w[0]),
            reward_debt: abi::word_to_uint(&w[1]),
            pending_rewards: abi::word_to_uint(&w[2]),
            last_action: abi::word_to_u64(&w[3])?,
        })
    }

    fn pending_rewards(&self, pid: usize, account: &Address) -> Result<U256> {
        let data = encode_call(abi::PENDING_REWARDS, &[pid_word(pid), address_word(account)]);
        let w = self.read(data, 1)?;
        Ok(abi::word_to_uint(&w[0]))
    }

    fn fee(&self) -> Result<u64> {
        let w = self.read(encode_call(abi::FEE, &[]), 1)?;
        abi::word_to_u64(&w[0])
    }

    fn deposit(&self, pid: usize, amount: U256, from: &Address) -> Result<TxHash> {
        self.write(encode_call(abi::DEPOSIT, &[pid_word(pid), uint_word(amount)]), from)
    }

    fn withdraw(&self, pid: usize, amount: U256, from: &Address) -> Result<TxHash> {
        self.write(encode_call(abi::WITHDRAW, &[pid_word(pid), uint_word(amount)]), from)
    }

    fn withdraw_all(&self, pid: usize, from: &Address) -> Result<TxHash> {
        self.write(encode_call(abi::WITHDRAW_ALL, &[pid_word(pid)]), from)
    }

    fn emergency_withdraw(&self, pid: usize, from: &Address) -> Result<TxHash> {
        self.write(encode_call(abi::EMERGENCY_WITHDRAW, &[pid_word(pid)]), from)
    }

    fn claim(&self, pid: usize, from: &Address) -> Result<TxHash> {
        self.write(encode_call(abi::CLAIM, &[pid_word(pid)]), from)
    }
}
