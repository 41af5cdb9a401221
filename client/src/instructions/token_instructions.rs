use super::{
    abi::{self, address_word, decode_words, encode_call, uint_word},
    rpc::{send_txn, RpcClient},
};
use hotdoge_staking::{
    contract::{TokenBalances, TokenContract, TxHash},
    Address, Result, TokenAmount, U256,
};
use std::sync::Arc;

/// Any ERC20 token, addressed per call.
pub struct Erc20 {
    rpc: Arc<RpcClient>,
    decimals: u8,
}

impl Erc20 {
    pub fn new(rpc: Arc<RpcClient>, decimals: u8) -> Self {
        Self { rpc, decimals }
    }
}

impl TokenContract for Erc20 {
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Result<U256> {
        let data = encode_call(abi::ALLOWANCE, &[address_word(owner), address_word(spender)]);
        let w = decode_words(&self.rpc.call(token, &data)?, 1)?;
        Ok(abi::word_to_uint(&w[0]))
    }

    fn approve(
        &self,
        token: &Address,
        spender: &Address,
        amount: U256,
        from: &Address,
    ) -> Result<TxHash> {
        let data = encode_call(abi::APPROVE, &[address_word(spender), uint_word(amount)]);
        send_txn(&self.rpc, from, token, &data, true)
    }
}

impl TokenBalances for Erc20 {
    fn token_balance(&self, account: &Address, token: &Address) -> Result<TokenAmount> {
        let data = encode_call(abi::BALANCE_OF, &[address_word(account)]);
        let w = decode_words(&self.rpc.call(token, &data)?, 1)?;
        Ok(TokenAmount::from_base_units(abi::word_to_uint(&w[0]), self.decimals))
    }
}
