//! Pool construction parameters

use serde::{Deserialize, Serialize};

use levy_core::Address;

use crate::constants::*;
use crate::error::{PoolError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub owner: Address,
    /// Custody account for deposits, retained fees and the reward reserve
    pub address: Address,
    pub token: Address,
    pub pair: Address,
    pub reward_rate: u64,
    /// Basis points
    pub add_liquidity_fee: u64,
    /// Basis points
    pub remove_liquidity_fee: u64,
    /// Seconds over which `reward_rate` percent accrues
    pub reward_time_unit: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            owner: Address::repeat_byte(0x01),
            address: Address::repeat_byte(0x7f),
            token: Address::repeat_byte(0x7e),
            pair: Address::repeat_byte(0x33),
            reward_rate: DEFAULT_REWARD_RATE,
            add_liquidity_fee: 0,
            remove_liquidity_fee: 0,
            reward_time_unit: DEFAULT_REWARD_TIME_UNIT,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_zero() || self.address.is_zero() || self.token.is_zero() {
            return Err(PoolError::InvalidAddress);
        }
        check_fees(self.add_liquidity_fee, self.remove_liquidity_fee)?;
        check_reward_rate(self.reward_rate)?;
        if self.reward_time_unit == 0 {
            return Err(PoolError::InvalidAmount);
        }
        Ok(())
    }
}

pub(crate) fn check_fees(add_fee: u64, remove_fee: u64) -> Result<()> {
    if add_fee > MAX_ADD_LIQUIDITY_FEE {
        return Err(PoolError::AddFeeTooHigh {
            fee: add_fee,
            max: MAX_ADD_LIQUIDITY_FEE,
        });
    }
    if remove_fee > MAX_REMOVE_LIQUIDITY_FEE {
        return Err(PoolError::RemoveFeeTooHigh {
            fee: remove_fee,
            max: MAX_REMOVE_LIQUIDITY_FEE,
        });
    }
    Ok(())
}

pub(crate) fn check_reward_rate(rate: u64) -> Result<()> {
    if rate > MAX_REWARD_RATE {
        return Err(PoolError::RewardRateTooHigh {
            rate,
            max: MAX_REWARD_RATE,
        });
    }
    Ok(())
}
