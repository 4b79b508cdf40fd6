//! Token construction parameters

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use levy_core::{to_units, Address, Amount, Result, TokenError, BPS_DENOMINATOR};

use crate::constants::*;
use crate::policy::{TaxRates, TransactionLimits};

/// What happens to the burn bucket when taxes are swept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnMode {
    /// Remove the tokens from circulation
    #[default]
    Destroy,
    /// Credit a dead-letter account; total supply is unchanged
    Sink(Address),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    /// Supply in whole tokens, minted once to `owner`
    pub total_supply: u64,
    pub owner: Address,
    /// Account that holds collected tax until it is swept
    pub contract_address: Address,
    pub liquidity_wallet: Address,
    pub marketing_wallet: Address,
    pub taxes: TaxRates,
    pub max_transaction_bps: u64,
    pub max_wallet_bps: u64,
    pub transaction_cooldown: u64,
    pub max_daily_transactions: u32,
    pub day_window: u64,
    pub burn_mode: BurnMode,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Levy Token".to_string(),
            symbol: "LEVY".to_string(),
            total_supply: DEFAULT_TOTAL_SUPPLY,
            owner: Address::repeat_byte(0x01),
            contract_address: Address::repeat_byte(0x7e),
            liquidity_wallet: Address::repeat_byte(0x02),
            marketing_wallet: Address::repeat_byte(0x03),
            taxes: TaxRates::default(),
            max_transaction_bps: DEFAULT_MAX_TRANSACTION_BPS,
            max_wallet_bps: DEFAULT_MAX_WALLET_BPS,
            transaction_cooldown: DEFAULT_TRANSACTION_COOLDOWN,
            max_daily_transactions: DEFAULT_MAX_DAILY_TRANSACTIONS,
            day_window: DEFAULT_DAY_WINDOW,
            burn_mode: BurnMode::Destroy,
        }
    }
}

impl TokenConfig {
    pub fn validate(&self) -> Result<()> {
        for address in [
            self.owner,
            self.contract_address,
            self.liquidity_wallet,
            self.marketing_wallet,
        ] {
            if address.is_zero() {
                return Err(TokenError::InvalidAddress);
            }
        }
        if let BurnMode::Sink(sink) = self.burn_mode {
            if sink.is_zero() {
                return Err(TokenError::InvalidAddress);
            }
        }

        if self.total_supply == 0 {
            return Err(TokenError::InvalidAmount);
        }

        self.taxes.validate()?;

        for (label, bps) in [
            ("max_transaction_bps", self.max_transaction_bps),
            ("max_wallet_bps", self.max_wallet_bps),
        ] {
            if bps == 0 || bps > BPS_DENOMINATOR {
                return Err(TokenError::InvalidLimits(format!(
                    "{} must be within 1..={}, got {}",
                    label, BPS_DENOMINATOR, bps
                )));
            }
        }

        if self.max_daily_transactions == 0 || self.day_window == 0 {
            return Err(TokenError::InvalidLimits(
                "daily transaction window must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn total_supply_units(&self) -> Amount {
        to_units(self.total_supply)
    }

    /// Initial limits derived from the supply
    pub fn initial_limits(&self) -> TransactionLimits {
        let supply = self.total_supply_units();
        let share = |bps: u64| supply * U256::from(bps) / U256::from(BPS_DENOMINATOR);

        TransactionLimits {
            max_transaction_amount: share(self.max_transaction_bps),
            max_wallet_amount: share(self.max_wallet_bps),
            transaction_cooldown: self.transaction_cooldown,
            max_daily_transactions: self.max_daily_transactions,
            day_window: self.day_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TokenConfig::default();
        assert!(config.validate().is_ok());

        let limits = config.initial_limits();
        assert_eq!(limits.max_transaction_amount, to_units(10_000_000));
        assert_eq!(limits.max_wallet_amount, to_units(20_000_000));
        assert_eq!(limits.transaction_cooldown, 30);
        assert_eq!(limits.max_daily_transactions, 10);
    }

    #[test]
    fn test_rejects_zero_addresses() {
        let config = TokenConfig {
            marketing_wallet: Address::ZERO,
            ..TokenConfig::default()
        };
        assert_eq!(config.validate(), Err(TokenError::InvalidAddress));
    }

    #[test]
    fn test_rejects_bad_bps() {
        let config = TokenConfig {
            max_wallet_bps: 10_001,
            ..TokenConfig::default()
        };
        assert!(matches!(config.validate(), Err(TokenError::InvalidLimits(_))));
    }

    #[test]
    fn test_burn_mode_from_toml_like_json() {
        let sink: BurnMode =
            serde_json::from_str(r#"{"sink":"0x000000000000000000000000000000000000dead"}"#).unwrap();
        assert_eq!(sink, BurnMode::Sink(Address::DEAD));

        let destroy: BurnMode = serde_json::from_str(r#""destroy""#).unwrap();
        assert_eq!(destroy, BurnMode::Destroy);
    }
}
