//! The token aggregate
//!
//! Owns the balance ledger and the policy store and exposes the ERC-20 style
//! surface. Each public call is atomic: it either commits in full or returns
//! an error with no state changed.

use serde::{Deserialize, Serialize};

use levy_core::{
    Address, Amount, BalanceLedger, CallContext, Result, TokenError, TokenLedger, DECIMALS,
};

use crate::config::TokenConfig;
use crate::limits::{self, TransferRequest};
use crate::policy::PolicyStore;
use crate::router::{TaxBuckets, TransferClass};

/// What a committed transfer did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
    pub net_amount: Amount,
    pub buckets: TaxBuckets,
    pub class: TransferClass,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    name: String,
    symbol: String,
    /// Custody account for collected tax
    pub(crate) address: Address,
    pub(crate) ledger: BalanceLedger,
    pub(crate) policy: PolicyStore,
}

impl Token {
    /// Mint the whole supply to the owner and set up the initial policy
    pub fn new(config: TokenConfig) -> Result<Self> {
        config.validate()?;

        let mut ledger = BalanceLedger::new();
        ledger.mint(config.owner, config.total_supply_units())?;

        let mut policy = PolicyStore::new(
            config.owner,
            config.taxes,
            config.initial_limits(),
            config.liquidity_wallet,
            config.marketing_wallet,
            config.burn_mode,
        );

        for account in [
            config.owner,
            config.contract_address,
            config.liquidity_wallet,
            config.marketing_wallet,
            Address::DEAD,
        ] {
            policy.set_excluded_from_fees(account, true);
            policy.set_excluded_from_limits(account, true);
        }

        log::info!(
            "🪙 Token {} ({}) created: supply {} minted to {}",
            config.name,
            config.symbol,
            config.total_supply,
            config.owner
        );

        Ok(Self {
            name: config.name,
            symbol: config.symbol,
            address: config.contract_address,
            ledger,
            policy,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// The token's own account, where collected tax is held
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn total_burned(&self) -> Amount {
        self.ledger.supply().total_burned
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    pub fn policy(&self) -> &PolicyStore {
        &self.policy
    }

    pub fn transfer(&mut self, ctx: &CallContext, to: Address, amount: Amount) -> Result<TransferReceipt> {
        self.execute_transfer(ctx.caller, to, amount, ctx.timestamp)
    }

    pub fn approve(&mut self, ctx: &CallContext, spender: Address, amount: Amount) -> Result<()> {
        self.ledger.approve(ctx.caller, spender, amount)?;
        log::debug!("Approval: {} -> {} for {}", ctx.caller, spender, amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to` using the caller's allowance. The
    /// allowance is consumed only if the transfer commits.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        self.ledger.check_allowance(&from, &ctx.caller, amount)?;
        let receipt = self.execute_transfer(from, to, amount, ctx.timestamp)?;
        self.ledger.spend_allowance(from, ctx.caller, amount)?;
        Ok(receipt)
    }

    fn execute_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        timestamp: u64,
    ) -> Result<TransferReceipt> {
        if from.is_zero() {
            return Err(TokenError::InvalidSender(from));
        }
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }

        let request = TransferRequest {
            from,
            to,
            amount,
            timestamp,
        };
        let admission = limits::admit(&self.policy, &request, self.ledger.balance_of(&to))?;
        let route = admission.route;

        let tax = route.total_tax();
        let mut outputs = vec![(to, route.net_amount)];
        if !tax.is_zero() {
            outputs.push((self.address, tax));
        }
        self.ledger.transfer_many(from, &outputs)?;

        // Ledger committed; nothing below can fail.
        self.policy.record_activity(from, admission.sender_activity);
        self.policy.accrue_taxes(&route.buckets);

        log::debug!(
            "Transfer [{}] {} -> {}: amount {}, net {}, tax {}",
            route.class,
            from,
            to,
            amount,
            route.net_amount,
            tax
        );

        Ok(TransferReceipt {
            from,
            to,
            amount,
            net_amount: route.net_amount,
            buckets: route.buckets,
            class: route.class,
            timestamp,
        })
    }
}

impl TokenLedger for Token {
    fn balance_of(&self, account: &Address) -> Amount {
        Token::balance_of(self, account)
    }

    fn send(&mut self, ctx: &CallContext, to: Address, amount: Amount) -> Result<Amount> {
        self.transfer(ctx, to, amount).map(|receipt| receipt.net_amount)
    }
}
