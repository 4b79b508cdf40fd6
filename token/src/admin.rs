//! Administrator operations
//!
//! Every operation here starts by checking that the caller is the current
//! administrator and fails with `Unauthorized` otherwise.

use levy_core::{Address, Amount, CallContext, Result, TokenError};

use crate::config::BurnMode;
use crate::policy::TaxRates;
use crate::router::TaxBuckets;
use crate::token::Token;

impl Token {
    pub fn owner(&self) -> Address {
        self.policy.administrator()
    }

    fn only_owner(&self, ctx: &CallContext, operation: &str) -> Result<()> {
        if !self.policy.is_administrator(&ctx.caller) {
            log::warn!("⚠️  Unauthorized {} attempt by {}", operation, ctx.caller);
            return Err(TokenError::Unauthorized(ctx.caller));
        }
        Ok(())
    }

    pub fn enable_trading(&mut self, ctx: &CallContext) -> Result<()> {
        self.only_owner(ctx, "enable_trading")?;
        self.policy.enable_trading()?;
        log::info!("✓ Trading enabled at {}", ctx.timestamp);
        Ok(())
    }

    pub fn update_taxes(
        &mut self,
        ctx: &CallContext,
        buy: u8,
        sell: u8,
        liquidity: u8,
        marketing: u8,
        burn: u8,
    ) -> Result<()> {
        self.only_owner(ctx, "update_taxes")?;
        self.policy.set_taxes(TaxRates {
            buy,
            sell,
            liquidity,
            marketing,
            burn,
        })?;
        log::info!(
            "✓ Taxes updated: buy {}%, sell {}% (liquidity {}, marketing {}, burn {})",
            buy,
            sell,
            liquidity,
            marketing,
            burn
        );
        Ok(())
    }

    pub fn update_transaction_limits(
        &mut self,
        ctx: &CallContext,
        max_transaction: Amount,
        max_wallet: Amount,
    ) -> Result<()> {
        self.only_owner(ctx, "update_transaction_limits")?;
        self.policy.set_transaction_limits(max_transaction, max_wallet)?;
        log::info!(
            "✓ Limits updated: max transaction {}, max wallet {}",
            max_transaction,
            max_wallet
        );
        Ok(())
    }

    pub fn update_trading_controls(
        &mut self,
        ctx: &CallContext,
        cooldown: u64,
        max_daily_transactions: u32,
    ) -> Result<()> {
        self.only_owner(ctx, "update_trading_controls")?;
        self.policy.set_trading_controls(cooldown, max_daily_transactions)?;
        log::info!(
            "✓ Trading controls updated: cooldown {}s, {} transfers per window",
            cooldown,
            max_daily_transactions
        );
        Ok(())
    }

    pub fn set_pair_address(&mut self, ctx: &CallContext, pair: Address) -> Result<()> {
        self.only_owner(ctx, "set_pair_address")?;
        if pair.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.policy.set_pair_address(pair);
        log::info!("✓ Pair address set to {}", pair);
        Ok(())
    }

    pub fn exclude_from_fees(&mut self, ctx: &CallContext, account: Address, excluded: bool) -> Result<()> {
        self.only_owner(ctx, "exclude_from_fees")?;
        self.policy.set_excluded_from_fees(account, excluded);
        log::info!("✓ Fee exclusion for {}: {}", account, excluded);
        Ok(())
    }

    pub fn exclude_from_limits(&mut self, ctx: &CallContext, account: Address, excluded: bool) -> Result<()> {
        self.only_owner(ctx, "exclude_from_limits")?;
        self.policy.set_excluded_from_limits(account, excluded);
        log::info!("✓ Limit exclusion for {}: {}", account, excluded);
        Ok(())
    }

    pub fn update_blacklist(&mut self, ctx: &CallContext, account: Address, blacklisted: bool) -> Result<()> {
        self.only_owner(ctx, "update_blacklist")?;
        self.policy.set_blacklisted(account, blacklisted);
        log::info!("✓ Blacklist for {}: {}", account, blacklisted);
        Ok(())
    }

    /// Replace the tax recipients. New wallets are excluded from fees and
    /// limits like the initial ones.
    pub fn update_wallets(&mut self, ctx: &CallContext, liquidity: Address, marketing: Address) -> Result<()> {
        self.only_owner(ctx, "update_wallets")?;
        if liquidity.is_zero() || marketing.is_zero() {
            return Err(TokenError::InvalidAddress);
        }

        self.policy.set_wallets(liquidity, marketing);
        for wallet in [liquidity, marketing] {
            self.policy.set_excluded_from_fees(wallet, true);
            self.policy.set_excluded_from_limits(wallet, true);
        }
        log::info!("✓ Wallets updated: liquidity {}, marketing {}", liquidity, marketing);
        Ok(())
    }

    /// Sweep collected tax out of custody: liquidity and marketing buckets to
    /// their wallets, the burn bucket per the configured burn mode.
    pub fn distribute_taxes(&mut self, ctx: &CallContext) -> Result<TaxBuckets> {
        self.only_owner(ctx, "distribute_taxes")?;

        let pending = *self.policy.pending_taxes();
        if pending.is_empty() {
            return Ok(pending);
        }

        let custody = self.address;
        let available = self.ledger.balance_of(&custody);
        if available < pending.total() {
            return Err(TokenError::InsufficientBalance {
                have: available,
                need: pending.total(),
            });
        }

        let mut outputs = vec![
            (self.policy.liquidity_wallet(), pending.liquidity),
            (self.policy.marketing_wallet(), pending.marketing),
        ];
        let burn_mode = self.policy.burn_mode();
        if let BurnMode::Sink(sink) = burn_mode {
            outputs.push((sink, pending.burn));
        }
        for (wallet, _) in &outputs {
            if self.policy.is_blacklisted(wallet) {
                log::warn!("⚠️  Tax sweep blocked: {} is blacklisted", wallet);
                return Err(TokenError::Blacklisted(*wallet));
            }
        }

        self.ledger.transfer_many(custody, &outputs)?;
        if burn_mode == BurnMode::Destroy && !pending.burn.is_zero() {
            self.ledger.burn(custody, pending.burn)?;
        }

        let swept = self.policy.take_pending_taxes();
        log::info!(
            "✓ Taxes distributed: liquidity {}, marketing {}, burn {} ({:?})",
            swept.liquidity,
            swept.marketing,
            swept.burn,
            burn_mode
        );
        Ok(swept)
    }

    /// Hand the administrator role to another account
    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        self.only_owner(ctx, "transfer_ownership")?;
        if new_owner.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.policy.set_administrator(new_owner);
        log::info!("✓ Ownership transferred from {} to {}", ctx.caller, new_owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenConfig;
    use levy_core::to_units;
    use primitive_types::U256;

    const OWNER: Address = Address::repeat_byte(0x01);
    const LIQUIDITY: Address = Address::repeat_byte(0x02);
    const MARKETING: Address = Address::repeat_byte(0x03);
    const PAIR: Address = Address::repeat_byte(0x99);
    const ALICE: Address = Address::repeat_byte(0xa1);

    fn owner_ctx() -> CallContext {
        CallContext::new(OWNER, 1)
    }

    fn launched(config: TokenConfig) -> Token {
        let mut token = Token::new(config).unwrap();
        token.enable_trading(&owner_ctx()).unwrap();
        token.set_pair_address(&owner_ctx(), PAIR).unwrap();
        token
    }

    #[test]
    fn test_only_owner() {
        let mut token = Token::new(TokenConfig::default()).unwrap();
        let stranger = CallContext::new(ALICE, 1);

        assert_eq!(token.enable_trading(&stranger), Err(TokenError::Unauthorized(ALICE)));
        assert_eq!(
            token.update_taxes(&stranger, 2, 4, 1, 1, 1),
            Err(TokenError::Unauthorized(ALICE))
        );
        assert!(token.set_pair_address(&stranger, PAIR).is_err());
        assert!(token.update_blacklist(&stranger, PAIR, true).is_err());
        assert!(token.distribute_taxes(&stranger).is_err());
        assert!(!token.policy().trading_enabled());
    }

    #[test]
    fn test_enable_trading_twice() {
        let mut token = Token::new(TokenConfig::default()).unwrap();
        token.enable_trading(&owner_ctx()).unwrap();
        assert_eq!(token.enable_trading(&owner_ctx()), Err(TokenError::AlreadyEnabled));
        assert!(token.policy().trading_enabled());
    }

    #[test]
    fn test_transfer_ownership() {
        let mut token = Token::new(TokenConfig::default()).unwrap();
        token.transfer_ownership(&owner_ctx(), ALICE).unwrap();
        assert_eq!(token.owner(), ALICE);

        assert!(token.enable_trading(&owner_ctx()).is_err());
        token.enable_trading(&CallContext::new(ALICE, 2)).unwrap();
    }

    #[test]
    fn test_distribute_taxes_destroy() {
        let mut token = launched(TokenConfig::default());
        token.transfer(&owner_ctx(), PAIR, to_units(1000)).unwrap();
        token
            .transfer(&CallContext::new(PAIR, 100), ALICE, to_units(1000))
            .unwrap();

        let supply_before = token.total_supply();
        let swept = token.distribute_taxes(&owner_ctx()).unwrap();

        // 30 tokens split 2:2:1
        assert_eq!(swept.liquidity, to_units(12));
        assert_eq!(swept.marketing, to_units(12));
        assert_eq!(swept.burn, to_units(6));
        assert_eq!(token.balance_of(&LIQUIDITY), to_units(12));
        assert_eq!(token.balance_of(&MARKETING), to_units(12));
        assert_eq!(token.balance_of(&token.address()), U256::zero());
        assert_eq!(token.total_supply(), supply_before - to_units(6));
        assert_eq!(token.total_burned(), to_units(6));
        assert!(token.policy().pending_taxes().is_empty());
    }

    #[test]
    fn test_distribute_taxes_sink() {
        let config = TokenConfig {
            burn_mode: BurnMode::Sink(Address::DEAD),
            ..TokenConfig::default()
        };
        let mut token = launched(config);
        token.transfer(&owner_ctx(), PAIR, to_units(1000)).unwrap();
        token
            .transfer(&CallContext::new(PAIR, 100), ALICE, to_units(1000))
            .unwrap();

        let supply_before = token.total_supply();
        token.distribute_taxes(&owner_ctx()).unwrap();

        assert_eq!(token.balance_of(&Address::DEAD), to_units(6));
        assert_eq!(token.total_supply(), supply_before);
    }

    #[test]
    fn test_distribute_taxes_rejects_blacklisted_wallet() {
        let mut token = launched(TokenConfig::default());
        token.transfer(&owner_ctx(), PAIR, to_units(1000)).unwrap();
        token
            .transfer(&CallContext::new(PAIR, 100), ALICE, to_units(1000))
            .unwrap();
        token.update_blacklist(&owner_ctx(), MARKETING, true).unwrap();

        let custody = token.balance_of(&token.address());
        assert_eq!(
            token.distribute_taxes(&owner_ctx()),
            Err(TokenError::Blacklisted(MARKETING))
        );
        assert_eq!(token.balance_of(&token.address()), custody);
        assert_eq!(token.balance_of(&MARKETING), U256::zero());
        assert_eq!(token.balance_of(&LIQUIDITY), U256::zero());
        assert_eq!(token.policy().pending_taxes().marketing, to_units(12));
    }

    #[test]
    fn test_distribute_taxes_rejects_blacklisted_sink() {
        let config = TokenConfig {
            burn_mode: BurnMode::Sink(Address::DEAD),
            ..TokenConfig::default()
        };
        let mut token = launched(config);
        token.transfer(&owner_ctx(), PAIR, to_units(1000)).unwrap();
        token
            .transfer(&CallContext::new(PAIR, 100), ALICE, to_units(1000))
            .unwrap();
        token.update_blacklist(&owner_ctx(), Address::DEAD, true).unwrap();

        assert_eq!(
            token.distribute_taxes(&owner_ctx()),
            Err(TokenError::Blacklisted(Address::DEAD))
        );
        assert_eq!(token.balance_of(&Address::DEAD), U256::zero());
        assert!(!token.policy().pending_taxes().is_empty());
    }

    #[test]
    fn test_distribute_nothing_pending() {
        let mut token = launched(TokenConfig::default());
        let swept = token.distribute_taxes(&owner_ctx()).unwrap();
        assert!(swept.is_empty());
    }

    #[test]
    fn test_update_wallets_excludes_new_wallets() {
        let mut token = Token::new(TokenConfig::default()).unwrap();
        let new_liquidity = Address::repeat_byte(0x22);

        token
            .update_wallets(&owner_ctx(), new_liquidity, MARKETING)
            .unwrap();
        assert_eq!(token.policy().liquidity_wallet(), new_liquidity);
        assert!(token.policy().is_excluded_from_fees(&new_liquidity));
        assert!(token.policy().is_excluded_from_limits(&new_liquidity));

        assert_eq!(
            token.update_wallets(&owner_ctx(), Address::ZERO, MARKETING),
            Err(TokenError::InvalidAddress)
        );
    }

    #[test]
    fn test_update_trading_controls() {
        let mut token = Token::new(TokenConfig::default()).unwrap();
        token.update_trading_controls(&owner_ctx(), 60, 5).unwrap();
        assert_eq!(token.policy().limits().transaction_cooldown, 60);
        assert_eq!(token.policy().limits().max_daily_transactions, 5);
        assert!(token.update_trading_controls(&owner_ctx(), 60, 0).is_err());
    }
}
