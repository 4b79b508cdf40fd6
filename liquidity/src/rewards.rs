//! Reward accrual math

use primitive_types::U256;

use levy_core::{Amount, PERCENT_DENOMINATOR};

use crate::error::{PoolError, Result};

/// `deposited * rate * elapsed / (100 * time_unit)`, floored once at the end
pub fn accrued_reward(deposited: Amount, rate: u64, elapsed: u64, time_unit: u64) -> Result<Amount> {
    if deposited.is_zero() || rate == 0 || elapsed == 0 {
        return Ok(U256::zero());
    }

    let numerator = deposited
        .checked_mul(U256::from(rate))
        .and_then(|v| v.checked_mul(U256::from(elapsed)))
        .ok_or(PoolError::Overflow)?;
    let denominator = U256::from(PERCENT_DENOMINATOR) * U256::from(time_unit);

    Ok(numerator / denominator)
}
