//! Pool error types

use levy_core::{Address, Amount, TokenError};
use thiserror::Error;

/// Liquidity pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error(transparent)]
    Ledger(#[from] TokenError),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid address: zero address not allowed")]
    InvalidAddress,

    #[error("Unauthorized account: {0}")]
    Unauthorized(Address),

    #[error("Insufficient deposit: requested {requested}, deposited {deposited}")]
    InsufficientDeposit { requested: Amount, deposited: Amount },

    #[error("Add fee too high: {fee} > {max}")]
    AddFeeTooHigh { fee: u64, max: u64 },

    #[error("Remove fee too high: {fee} > {max}")]
    RemoveFeeTooHigh { fee: u64, max: u64 },

    #[error("Reward rate too high: {rate} > {max}")]
    RewardRateTooHigh { rate: u64, max: u64 },

    #[error("No rewards to claim")]
    NoRewards,

    #[error("Insufficient reward reserve: requested {requested}, available {available}")]
    InsufficientRewardReserve { requested: Amount, available: Amount },

    #[error("Arithmetic overflow")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, PoolError>;
