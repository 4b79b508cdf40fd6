//! Levy Token
//!
//! Fungible token ledger with a transfer-time tax engine:
//! - Buy / sell / ordinary classification against the liquidity pair
//! - Tax split into liquidity, marketing and burn buckets
//! - Anti-whale and anti-bot limit gates run before any balance moves
//! - Administrator-only policy updates

pub mod admin;
pub mod config;
pub mod limits;
pub mod policy;
pub mod queries;
pub mod router;
pub mod token;

pub use config::{BurnMode, TokenConfig};
pub use limits::{admit, Admission, Gate, TransferRequest};
pub use policy::{AccountActivity, PolicyStore, TaxRates, TransactionLimits};
pub use queries::{AccountStats, LimitsInfo};
pub use router::{route, split_tax, RouteOutcome, TaxBuckets, TransferClass};
pub use token::{Token, TransferReceipt};

pub use levy_core::{Address, Amount, CallContext, Result, TokenError};

/// Token constants
pub mod constants {
    /// Highest buy or sell tax an administrator may configure (percent)
    pub const MAX_TAX: u8 = 10;

    pub const DEFAULT_BUY_TAX: u8 = 3;
    pub const DEFAULT_SELL_TAX: u8 = 5;
    pub const DEFAULT_LIQUIDITY_TAX: u8 = 2;
    pub const DEFAULT_MARKETING_TAX: u8 = 2;
    pub const DEFAULT_BURN_TAX: u8 = 1;

    /// Seconds a sender must wait between transfers
    pub const DEFAULT_TRANSACTION_COOLDOWN: u64 = 30;

    /// Transfers a sender may make per day window
    pub const DEFAULT_MAX_DAILY_TRANSACTIONS: u32 = 10;

    /// Day window length in seconds
    pub const DEFAULT_DAY_WINDOW: u64 = levy_core::SECONDS_PER_DAY;

    /// Initial max transaction amount (1% of supply)
    pub const DEFAULT_MAX_TRANSACTION_BPS: u64 = 100;

    /// Initial max wallet amount (2% of supply)
    pub const DEFAULT_MAX_WALLET_BPS: u64 = 200;

    /// Initial supply in whole tokens
    pub const DEFAULT_TOTAL_SUPPLY: u64 = 1_000_000_000;
}

#[cfg(test)]
mod tests {
    use super::constants::*;

    #[test]
    fn test_module_constants() {
        assert_eq!(MAX_TAX, 10);
        assert!(DEFAULT_BUY_TAX <= MAX_TAX);
        assert!(DEFAULT_SELL_TAX <= MAX_TAX);
        assert_eq!(DEFAULT_TRANSACTION_COOLDOWN, 30);
        assert_eq!(DEFAULT_MAX_DAILY_TRANSACTIONS, 10);
        assert!(DEFAULT_MAX_TRANSACTION_BPS <= DEFAULT_MAX_WALLET_BPS);
    }
}
