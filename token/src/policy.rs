//! Policy store
//!
//! All mutable configuration consulted by the classifier and the limit
//! pipeline. The store performs no authorization itself; the `Token`
//! administrator surface checks the caller before calling any setter here.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use levy_core::{Address, Amount, Result, TokenError};

use crate::config::BurnMode;
use crate::constants::*;
use crate::router::{TaxBuckets, TransferClass};

/// Tax percentages. `buy` and `sell` are the total rates; the three bucket
/// rates are weights used to split whatever was collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    pub buy: u8,
    pub sell: u8,
    pub liquidity: u8,
    pub marketing: u8,
    pub burn: u8,
}

impl TaxRates {
    pub fn validate(&self) -> Result<()> {
        if self.buy > MAX_TAX {
            return Err(TokenError::TaxTooHigh {
                kind: "Buy",
                rate: self.buy,
                max: MAX_TAX,
            });
        }
        if self.sell > MAX_TAX {
            return Err(TokenError::TaxTooHigh {
                kind: "Sell",
                rate: self.sell,
                max: MAX_TAX,
            });
        }
        Ok(())
    }

    pub fn rate_for(&self, class: TransferClass) -> u8 {
        match class {
            TransferClass::Buy => self.buy,
            TransferClass::Sell => self.sell,
            TransferClass::Ordinary => 0,
        }
    }

    /// Sum of the bucket weights
    pub fn share_total(&self) -> u64 {
        self.liquidity as u64 + self.marketing as u64 + self.burn as u64
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            buy: DEFAULT_BUY_TAX,
            sell: DEFAULT_SELL_TAX,
            liquidity: DEFAULT_LIQUIDITY_TAX,
            marketing: DEFAULT_MARKETING_TAX,
            burn: DEFAULT_BURN_TAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLimits {
    pub max_transaction_amount: Amount,
    pub max_wallet_amount: Amount,
    /// Seconds between two transfers from the same sender
    pub transaction_cooldown: u64,
    pub max_daily_transactions: u32,
    /// Length of the per-account counting window in seconds
    pub day_window: u64,
}

/// Per-sender cooldown and day-window state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActivity {
    pub last_tx_timestamp: Option<u64>,
    pub tx_count_in_window: u32,
    pub window_start: Option<u64>,
}

impl AccountActivity {
    /// Seconds left before the cooldown expires, if it is still running
    pub fn cooldown_remaining(&self, now: u64, cooldown: u64) -> Option<u64> {
        let last = self.last_tx_timestamp?;
        let elapsed = now.saturating_sub(last);
        if elapsed < cooldown {
            Some(cooldown - elapsed)
        } else {
            None
        }
    }

    /// The state as seen at `now`: a window that has run its full length is
    /// closed and its count dropped.
    pub fn rolled(&self, now: u64, day_window: u64) -> Self {
        match self.window_start {
            Some(start) if now < start.saturating_add(day_window) => *self,
            _ => Self {
                last_tx_timestamp: self.last_tx_timestamp,
                tx_count_in_window: 0,
                window_start: None,
            },
        }
    }

    /// The state after one more transfer at `now`
    pub fn recorded(&self, now: u64, day_window: u64) -> Self {
        let current = self.rolled(now, day_window);
        Self {
            last_tx_timestamp: Some(now),
            tx_count_in_window: current.tx_count_in_window.saturating_add(1),
            window_start: Some(current.window_start.unwrap_or(now)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyStore {
    administrator: Address,
    trading_enabled: bool,
    taxes: TaxRates,
    limits: TransactionLimits,
    pair_address: Option<Address>,
    liquidity_wallet: Address,
    marketing_wallet: Address,
    burn_mode: BurnMode,
    excluded_from_fees: HashSet<Address>,
    excluded_from_limits: HashSet<Address>,
    blacklist: HashSet<Address>,
    activity: HashMap<Address, AccountActivity>,
    /// Collected tax not yet swept out of custody
    pending_taxes: TaxBuckets,
}

impl PolicyStore {
    pub fn new(
        administrator: Address,
        taxes: TaxRates,
        limits: TransactionLimits,
        liquidity_wallet: Address,
        marketing_wallet: Address,
        burn_mode: BurnMode,
    ) -> Self {
        Self {
            administrator,
            trading_enabled: false,
            taxes,
            limits,
            pair_address: None,
            liquidity_wallet,
            marketing_wallet,
            burn_mode,
            excluded_from_fees: HashSet::new(),
            excluded_from_limits: HashSet::new(),
            blacklist: HashSet::new(),
            activity: HashMap::new(),
            pending_taxes: TaxBuckets::default(),
        }
    }

    pub fn administrator(&self) -> Address {
        self.administrator
    }

    pub fn is_administrator(&self, account: &Address) -> bool {
        self.administrator == *account
    }

    pub fn trading_enabled(&self) -> bool {
        self.trading_enabled
    }

    pub fn taxes(&self) -> &TaxRates {
        &self.taxes
    }

    pub fn limits(&self) -> &TransactionLimits {
        &self.limits
    }

    pub fn pair_address(&self) -> Option<Address> {
        self.pair_address
    }

    pub fn is_pair(&self, account: &Address) -> bool {
        self.pair_address.as_ref() == Some(account)
    }

    pub fn liquidity_wallet(&self) -> Address {
        self.liquidity_wallet
    }

    pub fn marketing_wallet(&self) -> Address {
        self.marketing_wallet
    }

    pub fn burn_mode(&self) -> BurnMode {
        self.burn_mode
    }

    pub fn is_excluded_from_fees(&self, account: &Address) -> bool {
        self.excluded_from_fees.contains(account)
    }

    pub fn is_excluded_from_limits(&self, account: &Address) -> bool {
        self.excluded_from_limits.contains(account)
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.blacklist.contains(account)
    }

    pub fn activity(&self, account: &Address) -> AccountActivity {
        self.activity.get(account).copied().unwrap_or_default()
    }

    pub fn pending_taxes(&self) -> &TaxBuckets {
        &self.pending_taxes
    }

    // Setters. Callers are responsible for authorization.

    /// One-way switch
    pub fn enable_trading(&mut self) -> Result<()> {
        if self.trading_enabled {
            return Err(TokenError::AlreadyEnabled);
        }
        self.trading_enabled = true;
        Ok(())
    }

    pub fn set_administrator(&mut self, administrator: Address) {
        self.administrator = administrator;
    }

    pub fn set_taxes(&mut self, taxes: TaxRates) -> Result<()> {
        taxes.validate()?;
        self.taxes = taxes;
        Ok(())
    }

    pub fn set_transaction_limits(&mut self, max_transaction: Amount, max_wallet: Amount) -> Result<()> {
        if max_transaction.is_zero() {
            return Err(TokenError::InvalidLimits(
                "max transaction amount must be non-zero".to_string(),
            ));
        }
        if max_wallet.is_zero() {
            return Err(TokenError::InvalidLimits(
                "max wallet amount must be non-zero".to_string(),
            ));
        }
        self.limits.max_transaction_amount = max_transaction;
        self.limits.max_wallet_amount = max_wallet;
        Ok(())
    }

    pub fn set_trading_controls(&mut self, cooldown: u64, max_daily_transactions: u32) -> Result<()> {
        if max_daily_transactions == 0 {
            return Err(TokenError::InvalidLimits(
                "max daily transactions must be non-zero".to_string(),
            ));
        }
        self.limits.transaction_cooldown = cooldown;
        self.limits.max_daily_transactions = max_daily_transactions;
        Ok(())
    }

    pub fn set_pair_address(&mut self, pair: Address) {
        self.pair_address = Some(pair);
    }

    pub fn set_wallets(&mut self, liquidity: Address, marketing: Address) {
        self.liquidity_wallet = liquidity;
        self.marketing_wallet = marketing;
    }

    pub fn set_excluded_from_fees(&mut self, account: Address, excluded: bool) {
        set_flag(&mut self.excluded_from_fees, account, excluded);
    }

    pub fn set_excluded_from_limits(&mut self, account: Address, excluded: bool) {
        set_flag(&mut self.excluded_from_limits, account, excluded);
    }

    pub fn set_blacklisted(&mut self, account: Address, blacklisted: bool) {
        set_flag(&mut self.blacklist, account, blacklisted);
    }

    pub(crate) fn record_activity(&mut self, account: Address, activity: AccountActivity) {
        self.activity.insert(account, activity);
    }

    pub(crate) fn accrue_taxes(&mut self, buckets: &TaxBuckets) {
        self.pending_taxes.liquidity += buckets.liquidity;
        self.pending_taxes.marketing += buckets.marketing;
        self.pending_taxes.burn += buckets.burn;
    }

    pub(crate) fn take_pending_taxes(&mut self) -> TaxBuckets {
        std::mem::take(&mut self.pending_taxes)
    }
}

fn set_flag(set: &mut HashSet<Address>, account: Address, on: bool) {
    if on {
        set.insert(account);
    } else {
        set.remove(&account);
    }
}
