//! Read-only query surface

use serde::{Deserialize, Serialize};

use levy_core::{Address, Amount};

use crate::policy::{AccountActivity, TaxRates};
use crate::router::TaxBuckets;
use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsInfo {
    pub trading_enabled: bool,
    pub max_transaction_amount: Amount,
    pub max_wallet_amount: Amount,
    pub transaction_cooldown: u64,
    pub max_daily_transactions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub balance: Amount,
    pub is_excluded_from_fees: bool,
    pub is_excluded_from_limits: bool,
    pub is_blacklisted: bool,
}

impl Token {
    pub fn tax_info(&self) -> TaxRates {
        *self.policy.taxes()
    }

    pub fn limits_info(&self) -> LimitsInfo {
        let limits = self.policy.limits();
        LimitsInfo {
            trading_enabled: self.policy.trading_enabled(),
            max_transaction_amount: limits.max_transaction_amount,
            max_wallet_amount: limits.max_wallet_amount,
            transaction_cooldown: limits.transaction_cooldown,
            max_daily_transactions: limits.max_daily_transactions,
        }
    }

    pub fn account_stats(&self, account: &Address) -> AccountStats {
        AccountStats {
            balance: self.ledger.balance_of(account),
            is_excluded_from_fees: self.policy.is_excluded_from_fees(account),
            is_excluded_from_limits: self.policy.is_excluded_from_limits(account),
            is_blacklisted: self.policy.is_blacklisted(account),
        }
    }

    pub fn account_activity(&self, account: &Address) -> AccountActivity {
        self.policy.activity(account)
    }

    pub fn pending_taxes(&self) -> TaxBuckets {
        *self.policy.pending_taxes()
    }

    pub fn trading_enabled(&self) -> bool {
        self.policy.trading_enabled()
    }

    pub fn max_transaction_amount(&self) -> Amount {
        self.policy.limits().max_transaction_amount
    }

    pub fn max_wallet_amount(&self) -> Amount {
        self.policy.limits().max_wallet_amount
    }

    pub fn pair_address(&self) -> Option<Address> {
        self.policy.pair_address()
    }

    pub fn liquidity_wallet(&self) -> Address {
        self.policy.liquidity_wallet()
    }

    pub fn marketing_wallet(&self) -> Address {
        self.policy.marketing_wallet()
    }
}
