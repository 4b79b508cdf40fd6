//! Balance ledger
//!
//! Conventional balance and allowance bookkeeping. Policy (taxes, limits,
//! blacklists) lives above this layer; the ledger only guarantees that every
//! mutation is all-or-nothing and that balances never go negative.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::address::Address;
use crate::amount::Amount;
use crate::context::CallContext;
use crate::error::{Result, TokenError};
use crate::supply::SupplyStats;

/// The transfer primitive other components consume. `send` moves tokens
/// out of `ctx.caller` and returns what `to` actually received.
pub trait TokenLedger {
    fn balance_of(&self, account: &Address) -> Amount;

    fn send(&mut self, ctx: &CallContext, to: Address, amount: Amount) -> Result<Amount>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceLedger {
    balances: HashMap<Address, Amount>,
    /// owner -> spender -> remaining allowance
    allowances: HashMap<Address, HashMap<Address, Amount>>,
    supply: SupplyStats,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> Amount {
        self.supply.circulating_supply
    }

    pub fn supply(&self) -> &SupplyStats {
        &self.supply
    }

    /// Accounts holding a nonzero balance
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter().filter(|(_, balance)| !balance.is_zero())
    }

    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<()> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }

        self.supply
            .circulating_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;

        self.credit(to, amount)?;
        self.supply.record_mint(amount);
        log::debug!("🪙 Minted {} to {}", amount, to);
        Ok(())
    }

    /// Destroy `amount` held by `from`, reducing total supply
    pub fn burn(&mut self, from: Address, amount: Amount) -> Result<()> {
        if from.is_zero() {
            return Err(TokenError::InvalidSender(from));
        }
        self.ensure_balance(&from, amount)?;

        self.debit(from, amount);
        self.supply.record_burn(amount);
        log::debug!("🔥 Burned {} from {}", amount, from);
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.transfer_many(from, &[(to, amount)])
    }

    /// Debit `from` by the sum of `outputs` and credit each output. Either
    /// every output lands or nothing changes.
    pub fn transfer_many(&mut self, from: Address, outputs: &[(Address, Amount)]) -> Result<()> {
        if from.is_zero() {
            return Err(TokenError::InvalidSender(from));
        }

        let mut total = U256::zero();
        for (to, amount) in outputs {
            if to.is_zero() {
                return Err(TokenError::InvalidReceiver(*to));
            }
            total = total.checked_add(*amount).ok_or(TokenError::Overflow)?;
        }

        self.ensure_balance(&from, total)?;

        // Credits cannot overflow: they are bounded by the sender's balance,
        // and every balance is bounded by the circulating supply.
        self.debit(from, total);
        for (to, amount) in outputs {
            if !amount.is_zero() {
                *self.balances.entry(*to).or_default() += *amount;
            }
        }

        Ok(())
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<()> {
        if owner.is_zero() || spender.is_zero() {
            return Err(TokenError::InvalidAddress);
        }

        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
        Ok(())
    }

    /// Fails unless `spender` may move `amount` on behalf of `owner`
    pub fn check_allowance(&self, owner: &Address, spender: &Address, amount: Amount) -> Result<()> {
        let current = self.allowance(owner, spender);
        if current < amount {
            return Err(TokenError::InsufficientAllowance {
                have: current,
                need: amount,
            });
        }
        Ok(())
    }

    /// Consume allowance. `U256::MAX` is treated as unlimited and left as is.
    pub fn spend_allowance(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<()> {
        self.check_allowance(&owner, &spender, amount)?;

        let current = self.allowance(&owner, &spender);
        if current == U256::MAX {
            return Ok(());
        }

        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, current - amount);
        Ok(())
    }

    fn ensure_balance(&self, account: &Address, need: Amount) -> Result<()> {
        let have = self.balance_of(account);
        if have < need {
            return Err(TokenError::InsufficientBalance { have, need });
        }
        Ok(())
    }

    fn credit(&mut self, to: Address, amount: Amount) -> Result<()> {
        let balance = self.balances.entry(to).or_default();
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, from: Address, amount: Amount) {
        if let Some(balance) = self.balances.get_mut(&from) {
            *balance -= amount;
        }
    }
}

impl TokenLedger for BalanceLedger {
    fn balance_of(&self, account: &Address) -> Amount {
        BalanceLedger::balance_of(self, account)
    }

    fn send(&mut self, ctx: &CallContext, to: Address, amount: Amount) -> Result<Amount> {
        self.transfer(ctx.caller, to, amount)?;
        Ok(amount)
    }
}
