//! Minimal ABI codec for the handful of calls the client makes. Every
//! argument and return value is a single 32-byte word.

use hotdoge_staking::{Address, Result, StakingError, U256};

pub type Word = [u8; 32];

// staking contract
pub const GET_POOL_COUNT: [u8; 4] = [0x8e, 0xec, 0x5d, 0x70];
pub const POOL_INFO: [u8; 4] = [0x15, 0x26, 0xfe, 0x27];
pub const USER_INFO: [u8; 4] = [0x93, 0xf1, 0xa4, 0x0b];
pub const PENDING_REWARDS: [u8; 4] = [0xd1, 0x8d, 0xf5, 0x3c];
pub const FEE: [u8; 4] = [0xdd, 0xca, 0x3f, 0x43];
pub const DEPOSIT: [u8; 4] = [0xe2, 0xbb, 0xb1, 0x58];
pub const WITHDRAW: [u8; 4] = [0x44, 0x1a, 0x3e, 0x70];
pub const WITHDRAW_ALL: [u8; 4] = [0x95, 0x8e, 0x2d, 0x31];
pub const EMERGENCY_WITHDRAW: [u8; 4] = [0x53, 0x12, 0xea, 0x8e];
pub const CLAIM: [u8; 4] = [0x37, 0x96, 0x07, 0xf5];

// ERC20
pub const ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];
pub const APPROVE: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
pub const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

pub fn encode_call(selector: [u8; 4], args: &[Word]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * args.len());
    data.extend_from_slice(&selector);
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

pub fn uint_word(value: U256) -> Word {
    let digits = format!("{:0>64}", format!("{:x}", value));
    let mut word = [0u8; 32];
    // 64 hex digits always decode to 32 bytes
    if let Ok(bytes) = hex::decode(digits) {
        word.copy_from_slice(&bytes);
    }
    word
}

pub fn pid_word(pid: usize) -> Word {
    uint_word(U256::from(pid as u64))
}

pub fn address_word(address: &Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&address.to_bytes());
    word
}

/// Splits return data into words, requiring at least `expected` of them.
pub fn decode_words(data: &[u8], expected: usize) -> Result<Vec<Word>> {
    if data.len() < 32 * expected || data.len() % 32 != 0 {
        return Err(StakingError::Decode(format!(
            "expected {} words, got {} bytes",
            expected,
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(32)
        .map(|chunk| {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

pub fn word_to_uint(word: &Word) -> U256 {
    U256::from_big_endian(word)
}

pub fn word_to_u64(word: &Word) -> Result<u64> {
    let value = word_to_uint(word);
    if value > U256::from(u64::MAX) {
        return Err(StakingError::Decode(format!("{} does not fit in u64", value)));
    }
    Ok(value.low_u64())
}

pub fn word_to_address(word: &Word) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Address::from_bytes(bytes)
}

pub fn word_to_bool(word: &Word) -> bool {
    !word_to_uint(word).is_zero()
}
