use thiserror::Error;

pub type Result<T> = std::result::Result<T, StakingError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount has more than {decimals} fractional digits")]
    PrecisionExceeded { decimals: u8 },

    #[error("Amount uses {found} decimals, the token has {expected}")]
    DecimalsMismatch { expected: u8, found: u8 },

    #[error("Arithmetic overflow occurred")]
    Overflow,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Pool {0} is not loaded")]
    UnknownPool(usize),

    #[error("Wallet is not connected")]
    WalletNotConnected,

    #[error("Unsupported wallet type: {0}")]
    UnsupportedWallet(String),

    #[error("Contract call failed: {0}")]
    Call(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Token approval failed: {0}")]
    ApprovalFailed(String),

    #[error("Malformed contract response: {0}")]
    Decode(String),
}
