//! Liquidity Pool Management
//!
//! Tracks each provider's deposit, accrues rewards against it over time and
//! keeps the pool's custody balance in step with its books. Token movements
//! go through a `TokenLedger`, so the manager works over the raw balance
//! ledger or the taxed token alike.

use std::collections::HashMap;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use levy_core::{Address, Amount, CallContext, TokenLedger, BPS_DENOMINATOR};

use crate::config::{check_fees, check_reward_rate, PoolConfig};
use crate::error::{PoolError, Result};
use crate::rewards::accrued_reward;

/// Whether a provider currently has liquidity in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderState {
    NoDeposit,
    Active,
}

/// Per-provider bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub deposited: Amount,
    pub last_accrual_time: u64,
    pub accrued_rewards: Amount,
}

impl Provider {
    pub fn state(&self) -> ProviderState {
        if self.deposited.is_zero() {
            ProviderState::NoDeposit
        } else {
            ProviderState::Active
        }
    }
}

/// Provider view including rewards accrued up to the query time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub deposited: Amount,
    pub last_accrual_time: u64,
    pub pending_rewards: Amount,
    pub state: ProviderState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_providers: u64,
    pub reward_rate: u64,
    pub total_deposited: Amount,
    pub collected_fees: Amount,
    pub add_liquidity_fee: u64,
    pub remove_liquidity_fee: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityPoolManager {
    owner: Address,
    address: Address,
    token: Address,
    pair: Address,
    reward_rate: u64,
    add_liquidity_fee: u64,
    remove_liquidity_fee: u64,
    reward_time_unit: u64,
    total_providers: u64,
    total_deposited: Amount,
    collected_fees: Amount,
    providers: HashMap<Address, Provider>,
}

impl LiquidityPoolManager {
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        log::info!(
            "✓ Liquidity pool {} created for token {} (reward rate {}%)",
            config.address,
            config.token,
            config.reward_rate
        );

        Ok(Self {
            owner: config.owner,
            address: config.address,
            token: config.token,
            pair: config.pair,
            reward_rate: config.reward_rate,
            add_liquidity_fee: config.add_liquidity_fee,
            remove_liquidity_fee: config.remove_liquidity_fee,
            reward_time_unit: config.reward_time_unit,
            total_providers: 0,
            total_deposited: U256::zero(),
            collected_fees: U256::zero(),
            providers: HashMap::new(),
        })
    }

    // ------------------------------------------------------------------
    // Provider operations
    // ------------------------------------------------------------------

    /// Move `amount` from the caller into the pool and credit the caller's
    /// deposit with what arrives, less the add liquidity fee.
    ///
    /// Returns the credited amount.
    pub fn deposit<L: TokenLedger>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        amount: Amount,
    ) -> Result<Amount> {
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount);
        }

        let mut provider = self.settled(&ctx.caller, ctx.timestamp)?;
        let was_active = provider.state() == ProviderState::Active;

        let received = ledger.send(ctx, self.address, amount)?;
        let fee = fee_on(received, self.add_liquidity_fee);
        let credited = received - fee;

        provider.deposited = provider
            .deposited
            .checked_add(credited)
            .ok_or(PoolError::Overflow)?;
        self.total_deposited = self
            .total_deposited
            .checked_add(credited)
            .ok_or(PoolError::Overflow)?;
        self.collected_fees = self
            .collected_fees
            .checked_add(fee)
            .ok_or(PoolError::Overflow)?;

        if !was_active && provider.state() == ProviderState::Active {
            self.total_providers += 1;
        }
        self.store(ctx.caller, provider);

        log::info!(
            "✓ {} deposited {} into pool (fee {})",
            ctx.caller,
            credited,
            fee
        );
        Ok(credited)
    }

    /// Debit `amount` from the caller's deposit and pay it out less the
    /// remove liquidity fee. Returns the amount paid out.
    pub fn withdraw<L: TokenLedger>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        amount: Amount,
    ) -> Result<Amount> {
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount);
        }

        let mut provider = self.settled(&ctx.caller, ctx.timestamp)?;
        if provider.deposited < amount {
            return Err(PoolError::InsufficientDeposit {
                requested: amount,
                deposited: provider.deposited,
            });
        }

        let fee = fee_on(amount, self.remove_liquidity_fee);
        let payout = amount - fee;

        if !payout.is_zero() {
            ledger.send(&ctx.with_caller(self.address), ctx.caller, payout)?;
        }

        provider.deposited -= amount;
        self.total_deposited -= amount;
        self.collected_fees = self
            .collected_fees
            .checked_add(fee)
            .ok_or(PoolError::Overflow)?;

        if provider.state() == ProviderState::NoDeposit {
            self.total_providers = self.total_providers.saturating_sub(1);
        }
        self.store(ctx.caller, provider);

        log::info!(
            "✓ {} withdrew {} from pool (fee {})",
            ctx.caller,
            payout,
            fee
        );
        Ok(payout)
    }

    /// Pay the caller every reward accrued so far out of the pool's reserve.
    pub fn claim_rewards<L: TokenLedger>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
    ) -> Result<Amount> {
        let mut provider = self.settled(&ctx.caller, ctx.timestamp)?;
        let rewards = provider.accrued_rewards;
        if rewards.is_zero() {
            return Err(PoolError::NoRewards);
        }

        let available = self.reward_reserve(ledger);
        if available < rewards {
            log::warn!(
                "⚠️  Reward claim by {} exceeds reserve ({} > {})",
                ctx.caller,
                rewards,
                available
            );
            return Err(PoolError::InsufficientRewardReserve {
                requested: rewards,
                available,
            });
        }

        ledger.send(&ctx.with_caller(self.address), ctx.caller, rewards)?;

        provider.accrued_rewards = U256::zero();
        self.store(ctx.caller, provider);

        log::info!("✓ {} claimed {} in rewards", ctx.caller, rewards);
        Ok(rewards)
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    pub fn update_fees(&mut self, ctx: &CallContext, add_fee: u64, remove_fee: u64) -> Result<()> {
        self.only_owner(ctx)?;
        check_fees(add_fee, remove_fee)?;

        self.add_liquidity_fee = add_fee;
        self.remove_liquidity_fee = remove_fee;
        log::info!("✓ Pool fees updated: add {} bps, remove {} bps", add_fee, remove_fee);
        Ok(())
    }

    /// Changes the reward rate. Rewards up to `ctx.timestamp` are settled at
    /// the old rate first.
    pub fn update_reward_rate(&mut self, ctx: &CallContext, rate: u64) -> Result<()> {
        self.only_owner(ctx)?;
        check_reward_rate(rate)?;

        let accounts: Vec<Address> = self.providers.keys().copied().collect();
        for account in accounts {
            let provider = self.settled(&account, ctx.timestamp)?;
            self.store(account, provider);
        }

        self.reward_rate = rate;
        log::info!("✓ Pool reward rate updated to {}%", rate);
        Ok(())
    }

    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        self.only_owner(ctx)?;
        if new_owner.is_zero() {
            return Err(PoolError::InvalidAddress);
        }
        log::info!("✓ Pool ownership transferred {} -> {}", self.owner, new_owner);
        self.owner = new_owner;
        Ok(())
    }

    fn only_owner(&self, ctx: &CallContext) -> Result<()> {
        if ctx.caller != self.owner {
            log::warn!("⚠️  Unauthorized pool call from {}", ctx.caller);
            return Err(PoolError::Unauthorized(ctx.caller));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn pair(&self) -> Address {
        self.pair
    }

    pub fn reward_rate(&self) -> u64 {
        self.reward_rate
    }

    pub fn add_liquidity_fee(&self) -> u64 {
        self.add_liquidity_fee
    }

    pub fn remove_liquidity_fee(&self) -> u64 {
        self.remove_liquidity_fee
    }

    pub fn total_providers(&self) -> u64 {
        self.total_providers
    }

    pub fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            total_providers: self.total_providers,
            reward_rate: self.reward_rate,
            total_deposited: self.total_deposited,
            collected_fees: self.collected_fees,
            add_liquidity_fee: self.add_liquidity_fee,
            remove_liquidity_fee: self.remove_liquidity_fee,
        }
    }

    pub fn provider_info(&self, account: &Address, now: u64) -> Result<ProviderInfo> {
        let provider = self.settled(account, now)?;
        Ok(ProviderInfo {
            deposited: provider.deposited,
            last_accrual_time: provider.last_accrual_time,
            pending_rewards: provider.accrued_rewards,
            state: provider.state(),
        })
    }

    pub fn pending_rewards(&self, account: &Address, now: u64) -> Result<Amount> {
        Ok(self.settled(account, now)?.accrued_rewards)
    }

    /// Custody balance not owed to providers as deposits or held as fees
    pub fn reward_reserve<L: TokenLedger>(&self, ledger: &L) -> Amount {
        ledger
            .balance_of(&self.address)
            .saturating_sub(self.total_deposited)
            .saturating_sub(self.collected_fees)
    }

    /// Write back a provider record. A record with nothing deposited and
    /// nothing owed is dropped.
    fn store(&mut self, account: Address, provider: Provider) {
        if provider.deposited.is_zero() && provider.accrued_rewards.is_zero() {
            self.providers.remove(&account);
        } else {
            self.providers.insert(account, provider);
        }
    }

    /// Copy of the provider record with rewards accrued up to `now`.
    fn settled(&self, account: &Address, now: u64) -> Result<Provider> {
        let mut provider = self.providers.get(account).cloned().unwrap_or_default();
        let elapsed = now.saturating_sub(provider.last_accrual_time);

        if provider.state() == ProviderState::Active {
            let reward = accrued_reward(
                provider.deposited,
                self.reward_rate,
                elapsed,
                self.reward_time_unit,
            )?;
            provider.accrued_rewards = provider
                .accrued_rewards
                .checked_add(reward)
                .ok_or(PoolError::Overflow)?;
        }
        provider.last_accrual_time = provider.last_accrual_time.max(now);
        Ok(provider)
    }
}

fn fee_on(amount: Amount, bps: u64) -> Amount {
    amount * U256::from(bps) / U256::from(BPS_DENOMINATOR)
}
