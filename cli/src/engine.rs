//! Engine state and the single-call execution path
//!
//! Every mutating command runs exactly one `Action` against a working copy
//! of the engine. The copy replaces the live state only if the action
//! succeeds, so a failed call leaves nothing behind, even when it spans the
//! pool and the token.

use serde::{Deserialize, Serialize};
use std::path::Path;

use levy_core::{format_units, Address, Amount, CallContext};
use levy_liquidity::LiquidityPoolManager;
use levy_storage::{Storage, TransferJournal};
use levy_token::{TaxRates, Token, TransferReceipt};

use crate::config::CliConfig;
use crate::error::{CliError, Result};

const STATE_SNAPSHOT: &str = "engine";
const JOURNAL_FILE: &str = "journal.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub token: Token,
    pub pool: LiquidityPoolManager,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Transfer { to: Address, amount: Amount },
    Approve { spender: Address, amount: Amount },
    TransferFrom { from: Address, to: Address, amount: Amount },
    EnableTrading,
    UpdateTaxes(TaxRates),
    UpdateLimits { max_transaction: Amount, max_wallet: Amount },
    UpdateTradingControls { cooldown: u64, max_daily_transactions: u32 },
    SetPair(Address),
    ExcludeFromFees { account: Address, excluded: bool },
    ExcludeFromLimits { account: Address, excluded: bool },
    UpdateBlacklist { account: Address, blacklisted: bool },
    UpdateWallets { liquidity: Address, marketing: Address },
    DistributeTaxes,
    TransferOwnership(Address),
    PoolDeposit(Amount),
    PoolWithdraw(Amount),
    PoolClaim,
    PoolUpdateFees { add_fee: u64, remove_fee: u64 },
    PoolUpdateRewardRate(u64),
    PoolTransferOwnership(Address),
}

impl Action {
    /// Journal label
    pub fn name(&self) -> &'static str {
        match self {
            Action::Transfer { .. } => "transfer",
            Action::Approve { .. } => "approve",
            Action::TransferFrom { .. } => "transfer-from",
            Action::EnableTrading => "enable-trading",
            Action::UpdateTaxes(_) => "update-taxes",
            Action::UpdateLimits { .. } => "update-limits",
            Action::UpdateTradingControls { .. } => "update-trading-controls",
            Action::SetPair(_) => "set-pair",
            Action::ExcludeFromFees { .. } => "exclude-from-fees",
            Action::ExcludeFromLimits { .. } => "exclude-from-limits",
            Action::UpdateBlacklist { .. } => "update-blacklist",
            Action::UpdateWallets { .. } => "update-wallets",
            Action::DistributeTaxes => "distribute-taxes",
            Action::TransferOwnership(_) => "transfer-ownership",
            Action::PoolDeposit(_) => "pool-deposit",
            Action::PoolWithdraw(_) => "pool-withdraw",
            Action::PoolClaim => "pool-claim",
            Action::PoolUpdateFees { .. } => "pool-update-fees",
            Action::PoolUpdateRewardRate(_) => "pool-update-reward-rate",
            Action::PoolTransferOwnership(_) => "pool-transfer-ownership",
        }
    }
}

/// What a committed action reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub summary: String,
    pub receipt: Option<TransferReceipt>,
}

impl Outcome {
    fn message(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            receipt: None,
        }
    }

    fn transfer(receipt: TransferReceipt) -> Self {
        Self {
            summary: format!(
                "{} transfer of {}: {} received, {} tax",
                receipt.class,
                format_units(receipt.amount),
                format_units(receipt.net_amount),
                format_units(receipt.buckets.total())
            ),
            receipt: Some(receipt),
        }
    }
}

impl Engine {
    /// Fresh state: token minted to its owner and a pool bound to it. The
    /// pool's custody account starts excluded from fees and limits.
    pub fn genesis(config: &CliConfig, at: u64) -> Result<Self> {
        let mut token = Token::new(config.token.clone())?;

        let mut pool_config = config.pool.clone();
        if pool_config.token != token.address() {
            log::warn!(
                "⚠️  [pool] token {} differs from the token address, using {}",
                pool_config.token,
                token.address()
            );
            pool_config.token = token.address();
        }
        let pool = LiquidityPoolManager::new(pool_config)?;

        let admin = CallContext::new(token.owner(), at);
        token.exclude_from_fees(&admin, pool.address(), true)?;
        token.exclude_from_limits(&admin, pool.address(), true)?;

        log::info!(
            "✓ Initialized {} ({}) with supply {}",
            token.name(),
            token.symbol(),
            format_units(token.total_supply())
        );
        Ok(Self { token, pool })
    }

    /// Run one action atomically
    pub fn execute(&mut self, ctx: &CallContext, action: &Action) -> Result<Outcome> {
        let mut working = self.clone();
        let outcome = working.apply(ctx, action)?;
        *self = working;
        Ok(outcome)
    }

    fn apply(&mut self, ctx: &CallContext, action: &Action) -> Result<Outcome> {
        let token = &mut self.token;
        let pool = &mut self.pool;

        let outcome = match action {
            Action::Transfer { to, amount } => Outcome::transfer(token.transfer(ctx, *to, *amount)?),
            Action::Approve { spender, amount } => {
                token.approve(ctx, *spender, *amount)?;
                Outcome::message(format!("Approved {} for {}", spender, format_units(*amount)))
            }
            Action::TransferFrom { from, to, amount } => {
                Outcome::transfer(token.transfer_from(ctx, *from, *to, *amount)?)
            }
            Action::EnableTrading => {
                token.enable_trading(ctx)?;
                Outcome::message("Trading enabled")
            }
            Action::UpdateTaxes(rates) => {
                token.update_taxes(
                    ctx,
                    rates.buy,
                    rates.sell,
                    rates.liquidity,
                    rates.marketing,
                    rates.burn,
                )?;
                Outcome::message(format!("Taxes set: buy {}%, sell {}%", rates.buy, rates.sell))
            }
            Action::UpdateLimits {
                max_transaction,
                max_wallet,
            } => {
                token.update_transaction_limits(ctx, *max_transaction, *max_wallet)?;
                Outcome::message(format!(
                    "Limits set: max transaction {}, max wallet {}",
                    format_units(*max_transaction),
                    format_units(*max_wallet)
                ))
            }
            Action::UpdateTradingControls {
                cooldown,
                max_daily_transactions,
            } => {
                token.update_trading_controls(ctx, *cooldown, *max_daily_transactions)?;
                Outcome::message(format!(
                    "Trading controls set: cooldown {}s, {} per day",
                    cooldown, max_daily_transactions
                ))
            }
            Action::SetPair(pair) => {
                token.set_pair_address(ctx, *pair)?;
                Outcome::message(format!("Pair set to {}", pair))
            }
            Action::ExcludeFromFees { account, excluded } => {
                token.exclude_from_fees(ctx, *account, *excluded)?;
                Outcome::message(format!("{} fee exclusion: {}", account, excluded))
            }
            Action::ExcludeFromLimits { account, excluded } => {
                token.exclude_from_limits(ctx, *account, *excluded)?;
                Outcome::message(format!("{} limit exclusion: {}", account, excluded))
            }
            Action::UpdateBlacklist {
                account,
                blacklisted,
            } => {
                token.update_blacklist(ctx, *account, *blacklisted)?;
                Outcome::message(format!("{} blacklisted: {}", account, blacklisted))
            }
            Action::UpdateWallets {
                liquidity,
                marketing,
            } => {
                token.update_wallets(ctx, *liquidity, *marketing)?;
                Outcome::message(format!("Wallets set: liquidity {}, marketing {}", liquidity, marketing))
            }
            Action::DistributeTaxes => {
                let swept = token.distribute_taxes(ctx)?;
                Outcome::message(format!(
                    "Distributed: liquidity {}, marketing {}, burn {}",
                    format_units(swept.liquidity),
                    format_units(swept.marketing),
                    format_units(swept.burn)
                ))
            }
            Action::TransferOwnership(new_owner) => {
                token.transfer_ownership(ctx, *new_owner)?;
                Outcome::message(format!("Token ownership transferred to {}", new_owner))
            }
            Action::PoolDeposit(amount) => {
                let credited = pool.deposit(token, ctx, *amount)?;
                Outcome::message(format!("Deposited {}", format_units(credited)))
            }
            Action::PoolWithdraw(amount) => {
                let paid = pool.withdraw(token, ctx, *amount)?;
                Outcome::message(format!("Withdrew {}", format_units(paid)))
            }
            Action::PoolClaim => {
                let claimed = pool.claim_rewards(token, ctx)?;
                Outcome::message(format!("Claimed {} in rewards", format_units(claimed)))
            }
            Action::PoolUpdateFees {
                add_fee,
                remove_fee,
            } => {
                pool.update_fees(ctx, *add_fee, *remove_fee)?;
                Outcome::message(format!("Pool fees set: add {} bps, remove {} bps", add_fee, remove_fee))
            }
            Action::PoolUpdateRewardRate(rate) => {
                pool.update_reward_rate(ctx, *rate)?;
                Outcome::message(format!("Pool reward rate set to {}%", rate))
            }
            Action::PoolTransferOwnership(new_owner) => {
                pool.transfer_ownership(ctx, *new_owner)?;
                Outcome::message(format!("Pool ownership transferred to {}", new_owner))
            }
        };

        Ok(outcome)
    }
}

/// Engine snapshot and journal in one data directory
pub struct EngineStore {
    storage: Storage,
}

impl EngineStore {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Ok(Self {
            storage: Storage::open(data_dir)?,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.storage.has_snapshot(STATE_SNAPSHOT)
    }

    pub fn load(&self) -> Result<(Engine, TransferJournal)> {
        if !self.is_initialized() {
            return Err(CliError::NotInitialized(self.storage.data_dir().to_path_buf()));
        }
        let engine = self.storage.load_snapshot(STATE_SNAPSHOT)?;
        let journal = TransferJournal::load_or_new(self.journal_path())?;
        Ok((engine, journal))
    }

    pub fn save(&self, engine: &Engine, journal: &TransferJournal) -> Result<()> {
        self.storage.save_snapshot(STATE_SNAPSHOT, engine)?;
        journal.save(self.journal_path())?;
        Ok(())
    }

    /// Write genesis state, refusing to clobber existing state unless `force`
    pub fn initialize(&self, engine: &Engine, force: bool) -> Result<()> {
        if self.is_initialized() && !force {
            return Err(CliError::AlreadyInitialized(self.storage.data_dir().to_path_buf()));
        }
        self.save(engine, &TransferJournal::new())
    }

    fn journal_path(&self) -> std::path::PathBuf {
        self.storage.data_dir().join(JOURNAL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levy_core::{to_units, TokenError};
    use levy_liquidity::PoolError;
    use tempfile::tempdir;

    const OWNER: Address = Address::repeat_byte(0x01);
    const PAIR: Address = Address::repeat_byte(0x33);
    const ALICE: Address = Address::repeat_byte(0x11);
    const BOB: Address = Address::repeat_byte(0x22);
    const LAUNCH: u64 = 1_700_000_000;

    fn ctx(caller: Address, at: u64) -> CallContext {
        CallContext::new(caller, at)
    }

    fn launched() -> Engine {
        let mut engine = Engine::genesis(&CliConfig::default(), LAUNCH).unwrap();
        let admin = ctx(OWNER, LAUNCH);
        engine.execute(&admin, &Action::SetPair(PAIR)).unwrap();
        engine.execute(&admin, &Action::EnableTrading).unwrap();
        engine
            .execute(
                &admin,
                &Action::Transfer {
                    to: ALICE,
                    amount: to_units(1_000_000),
                },
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_genesis_excludes_pool() {
        let engine = Engine::genesis(&CliConfig::default(), LAUNCH).unwrap();
        let stats = engine.token.account_stats(&engine.pool.address());
        assert!(stats.is_excluded_from_fees);
        assert!(stats.is_excluded_from_limits);
        assert_eq!(engine.pool.token(), engine.token.address());
    }

    #[test]
    fn test_sell_through_engine() {
        let mut engine = launched();
        let outcome = engine
            .execute(
                &ctx(ALICE, LAUNCH + 100),
                &Action::Transfer {
                    to: PAIR,
                    amount: to_units(1_000),
                },
            )
            .unwrap();

        let receipt = outcome.receipt.unwrap();
        assert_eq!(receipt.net_amount, to_units(950));
        assert_eq!(engine.token.balance_of(&PAIR), to_units(950));
        assert!(outcome.summary.starts_with("sell transfer"));
    }

    #[test]
    fn test_failed_action_leaves_state() {
        let mut engine = launched();
        let before = engine.token.balance_of(&ALICE);

        let err = engine
            .execute(&ctx(ALICE, LAUNCH + 100), &Action::PoolWithdraw(to_units(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Pool(PoolError::InsufficientDeposit { .. })
        ));

        let err = engine
            .execute(&ctx(ALICE, LAUNCH + 100), &Action::EnableTrading)
            .unwrap_err();
        assert!(matches!(err, CliError::Token(TokenError::Unauthorized(_))));
        assert_eq!(engine.token.balance_of(&ALICE), before);
    }

    #[test]
    fn test_pool_round_trip() {
        let mut engine = launched();
        let alice = ctx(ALICE, LAUNCH + 100);

        engine
            .execute(&alice, &Action::PoolDeposit(to_units(10_000)))
            .unwrap();
        assert_eq!(engine.pool.total_providers(), 1);
        assert_eq!(engine.token.balance_of(&engine.pool.address()), to_units(10_000));

        engine
            .execute(&ctx(ALICE, LAUNCH + 200), &Action::PoolWithdraw(to_units(10_000)))
            .unwrap();
        assert_eq!(engine.pool.total_providers(), 0);
        assert_eq!(engine.token.balance_of(&ALICE), to_units(1_000_000));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = EngineStore::open(dir.path()).unwrap();
        assert!(matches!(store.load(), Err(CliError::NotInitialized(_))));

        let mut engine = launched();
        store.initialize(&engine, false).unwrap();
        assert!(matches!(
            store.initialize(&engine, false),
            Err(CliError::AlreadyInitialized(_))
        ));

        let (_, mut journal) = store.load().unwrap();
        let action = Action::Transfer {
            to: BOB,
            amount: to_units(5),
        };
        let alice = ctx(ALICE, LAUNCH + 100);
        let outcome = engine.execute(&alice, &action).unwrap();
        journal.record(ALICE, alice.timestamp, action.name(), outcome.receipt);
        store.save(&engine, &journal).unwrap();

        let (loaded, journal) = store.load().unwrap();
        assert_eq!(loaded.token.balance_of(&BOB), to_units(5));
        assert_eq!(journal.for_account(&BOB).count(), 1);
        assert!(loaded.token.trading_enabled());
    }
}
