//! Levy Liquidity Pool Manager
//!
//! Bookkeeping for liquidity providers, independent of the token's transfer
//! path:
//! - Deposits and withdrawals through any `TokenLedger`
//! - Add/remove liquidity fees retained by the pool
//! - Time-weighted reward accrual and reward claims

pub mod config;
pub mod error;
pub mod pool;
pub mod rewards;

pub use config::PoolConfig;
pub use error::{PoolError, Result};
pub use pool::{LiquidityPoolManager, PoolStats, Provider, ProviderInfo, ProviderState};
pub use rewards::accrued_reward;

/// Pool constants
pub mod constants {
    /// Reward percentage per reward time unit
    pub const DEFAULT_REWARD_RATE: u64 = 12;

    /// Highest reward rate an administrator may configure
    pub const MAX_REWARD_RATE: u64 = 100;

    /// Add liquidity fee ceiling (5%, basis points)
    pub const MAX_ADD_LIQUIDITY_FEE: u64 = 500;

    /// Remove liquidity fee ceiling (10%, basis points)
    pub const MAX_REMOVE_LIQUIDITY_FEE: u64 = 1_000;

    /// Reward time unit: one year in seconds
    pub const DEFAULT_REWARD_TIME_UNIT: u64 = 365 * levy_core::SECONDS_PER_DAY;
}

#[cfg(test)]
mod tests {
    use super::constants::*;

    #[test]
    fn test_module_constants() {
        assert_eq!(DEFAULT_REWARD_RATE, 12);
        assert_eq!(MAX_ADD_LIQUIDITY_FEE, 500);
        assert_eq!(DEFAULT_REWARD_TIME_UNIT, 31_536_000);
    }
}
