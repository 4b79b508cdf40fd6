//! Token error types

use thiserror::Error;

use crate::address::Address;
use crate::amount::Amount;

/// Categorical outcome of a rejected token call. A call that returns one of
/// these has left every balance, counter and policy value untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[error("Invalid amount format: {0}")]
    InvalidAmountFormat(String),

    #[error("Invalid address: zero address not allowed")]
    InvalidAddress,

    #[error("Invalid sender: {0}")]
    InvalidSender(Address),

    #[error("Invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("Blacklisted address: {0}")]
    Blacklisted(Address),

    #[error("Trading is not enabled")]
    TradingDisabled,

    #[error("Trading is already enabled")]
    AlreadyEnabled,

    #[error("Transfer amount must be greater than zero")]
    ZeroAmount,

    #[error("Transfer amount exceeds the maxTransactionAmount: {amount} > {max}")]
    ExceedsMaxTransaction { amount: Amount, max: Amount },

    #[error("Exceeds maximum wallet token amount: {resulting} > {max}")]
    ExceedsMaxWallet { resulting: Amount, max: Amount },

    #[error("Transaction cooldown active: {remaining} seconds remaining")]
    CooldownActive { remaining: u64 },

    #[error("Daily transaction limit reached: {count} of {max}")]
    DailyLimitExceeded { count: u32, max: u32 },

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: Amount, need: Amount },

    #[error("Unauthorized account: {0}")]
    Unauthorized(Address),

    #[error("{kind} tax too high: {rate} > {max}")]
    TaxTooHigh {
        kind: &'static str,
        rate: u8,
        max: u8,
    },

    #[error("Invalid limits: {0}")]
    InvalidLimits(String),

    #[error("Arithmetic overflow")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, TokenError>;
