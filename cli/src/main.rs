//! Levy CLI - administer and query a levy token deployment
//!
//! State lives in a data directory as an engine snapshot plus a journal.
//! Every mutating command loads the snapshot, runs one call, and writes the
//! snapshot back only if the call succeeded.

mod config;
mod display;
mod engine;
mod error;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use levy_core::{parse_units, Address, Amount, CallContext};
use levy_token::TaxRates;

use crate::config::CliConfig;
use crate::engine::{Action, Engine, EngineStore};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

#[derive(Parser)]
#[command(name = "levy")]
#[command(about = "Levy token administration tool", version, long_version = LONG_VERSION)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides [storage] data_dir)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Account making the call (defaults to the token owner)
    #[arg(long, value_name = "ADDR", global = true)]
    caller: Option<Address>,

    /// Call timestamp in unix seconds (defaults to now)
    #[arg(long, value_name = "UNIX_SECONDS", global = true)]
    at: Option<u64>,

    /// Print query results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create fresh state from the configuration
    Init {
        /// Overwrite existing state
        #[arg(long)]
        force: bool,
    },

    /// Token metadata and supply
    Info,

    /// Transfer tokens from the caller
    Transfer {
        to: Address,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Set the allowance of a spender over the caller's tokens
    Approve {
        spender: Address,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Transfer on behalf of `from` using the caller's allowance
    TransferFrom {
        from: Address,
        to: Address,
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Open trading (one-way)
    EnableTrading,

    /// Set buy/sell rates and the bucket split (percent)
    UpdateTaxes {
        #[arg(long)]
        buy: u8,
        #[arg(long)]
        sell: u8,
        #[arg(long)]
        liquidity: u8,
        #[arg(long)]
        marketing: u8,
        #[arg(long)]
        burn: u8,
    },

    /// Set the max transaction and max wallet amounts
    UpdateLimits {
        #[arg(long, value_parser = parse_amount)]
        max_transaction: Amount,
        #[arg(long, value_parser = parse_amount)]
        max_wallet: Amount,
    },

    /// Set the sender cooldown and daily transfer count
    UpdateTradingControls {
        /// Seconds between transfers
        #[arg(long)]
        cooldown: u64,
        #[arg(long)]
        max_daily: u32,
    },

    /// Set the liquidity pair address
    SetPair { pair: Address },

    ExcludeFromFees {
        account: Address,
        /// Remove the exclusion instead
        #[arg(long)]
        clear: bool,
    },

    ExcludeFromLimits {
        account: Address,
        /// Remove the exclusion instead
        #[arg(long)]
        clear: bool,
    },

    UpdateBlacklist {
        account: Address,
        /// Remove from the blacklist instead
        #[arg(long)]
        clear: bool,
    },

    /// Replace the liquidity and marketing wallets
    UpdateWallets {
        #[arg(long)]
        liquidity: Address,
        #[arg(long)]
        marketing: Address,
    },

    /// Sweep collected taxes to the wallets and burn
    DistributeTaxes,

    TransferOwnership { new_owner: Address },

    /// Current tax rates and pending buckets
    TaxInfo,

    /// Trading flag and limits
    LimitsInfo,

    /// Balance, exclusions and activity of an account
    Account { address: Address },

    /// Journaled operations
    History {
        /// Only entries involving this account
        #[arg(long)]
        account: Option<Address>,

        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Liquidity pool operations
    #[command(subcommand)]
    Pool(PoolCommands),
}

#[derive(Subcommand)]
enum PoolCommands {
    /// Deposit tokens from the caller
    Deposit {
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Withdraw part of the caller's deposit
    Withdraw {
        #[arg(value_parser = parse_amount)]
        amount: Amount,
    },

    /// Claim accrued rewards
    Claim,

    /// Set add/remove liquidity fees (basis points)
    UpdateFees {
        #[arg(long)]
        add: u64,
        #[arg(long)]
        remove: u64,
    },

    UpdateRewardRate { rate: u64 },

    TransferOwnership { new_owner: Address },

    Stats,

    /// Deposit and pending rewards of a provider
    Provider { address: Address },
}

fn parse_amount(s: &str) -> std::result::Result<Amount, String> {
    parse_units(s).map_err(|e| e.to_string())
}

impl Commands {
    /// The engine action for a mutating command
    fn action(&self) -> Option<Action> {
        let action = match self {
            Commands::Transfer { to, amount } => Action::Transfer {
                to: *to,
                amount: *amount,
            },
            Commands::Approve { spender, amount } => Action::Approve {
                spender: *spender,
                amount: *amount,
            },
            Commands::TransferFrom { from, to, amount } => Action::TransferFrom {
                from: *from,
                to: *to,
                amount: *amount,
            },
            Commands::EnableTrading => Action::EnableTrading,
            Commands::UpdateTaxes {
                buy,
                sell,
                liquidity,
                marketing,
                burn,
            } => Action::UpdateTaxes(TaxRates {
                buy: *buy,
                sell: *sell,
                liquidity: *liquidity,
                marketing: *marketing,
                burn: *burn,
            }),
            Commands::UpdateLimits {
                max_transaction,
                max_wallet,
            } => Action::UpdateLimits {
                max_transaction: *max_transaction,
                max_wallet: *max_wallet,
            },
            Commands::UpdateTradingControls { cooldown, max_daily } => {
                Action::UpdateTradingControls {
                    cooldown: *cooldown,
                    max_daily_transactions: *max_daily,
                }
            }
            Commands::SetPair { pair } => Action::SetPair(*pair),
            Commands::ExcludeFromFees { account, clear } => Action::ExcludeFromFees {
                account: *account,
                excluded: !clear,
            },
            Commands::ExcludeFromLimits { account, clear } => Action::ExcludeFromLimits {
                account: *account,
                excluded: !clear,
            },
            Commands::UpdateBlacklist { account, clear } => Action::UpdateBlacklist {
                account: *account,
                blacklisted: !clear,
            },
            Commands::UpdateWallets {
                liquidity,
                marketing,
            } => Action::UpdateWallets {
                liquidity: *liquidity,
                marketing: *marketing,
            },
            Commands::DistributeTaxes => Action::DistributeTaxes,
            Commands::TransferOwnership { new_owner } => Action::TransferOwnership(*new_owner),
            Commands::Pool(pool) => match pool {
                PoolCommands::Deposit { amount } => Action::PoolDeposit(*amount),
                PoolCommands::Withdraw { amount } => Action::PoolWithdraw(*amount),
                PoolCommands::Claim => Action::PoolClaim,
                PoolCommands::UpdateFees { add, remove } => Action::PoolUpdateFees {
                    add_fee: *add,
                    remove_fee: *remove,
                },
                PoolCommands::UpdateRewardRate { rate } => Action::PoolUpdateRewardRate(*rate),
                PoolCommands::TransferOwnership { new_owner } => {
                    Action::PoolTransferOwnership(*new_owner)
                }
                PoolCommands::Stats | PoolCommands::Provider { .. } => return None,
            },
            Commands::Init { .. }
            | Commands::Info
            | Commands::TaxInfo
            | Commands::LimitsInfo
            | Commands::Account { .. }
            | Commands::History { .. } => return None,
        };
        Some(action)
    }
}

fn now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = CliConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.storage.data_dir());
    let store = EngineStore::open(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    let at = cli.at.unwrap_or_else(now);

    if let Commands::Init { force } = cli.command {
        let engine = Engine::genesis(&config, at)?;
        store.initialize(&engine, force)?;
        println!(
            "{} {} initialized in {}",
            "✓".green(),
            engine.token.symbol().bold(),
            data_dir.display()
        );
        return Ok(());
    }

    let (mut engine, mut journal) = store.load()?;
    let caller = cli.caller.unwrap_or_else(|| engine.token.owner());

    if let Some(action) = cli.command.action() {
        let ctx = CallContext::new(caller, at);
        match engine.execute(&ctx, &action) {
            Ok(outcome) => {
                journal.record(caller, at, action.name(), outcome.receipt);
                store.save(&engine, &journal)?;
                println!("{} {}", "✓".green(), outcome.summary);
                return Ok(());
            }
            Err(e) => {
                log::warn!("⚠️  {} rejected: {}", action.name(), e);
                return Err(e).with_context(|| format!("{} failed", action.name()));
            }
        }
    }

    match &cli.command {
        Commands::Info => display::token_info(&engine.token, cli.json),
        Commands::TaxInfo => display::tax_info(&engine.token, cli.json),
        Commands::LimitsInfo => display::limits_info(&engine.token, cli.json),
        Commands::Account { address } => display::account(&engine.token, address, cli.json),
        Commands::History { account, limit } => {
            match account {
                Some(account) => {
                    let matching: Vec<_> = journal.for_account(account).collect();
                    let start = matching.len().saturating_sub(*limit);
                    display::history(matching[start..].iter().copied(), cli.json)
                }
                None => display::history(journal.recent(*limit).iter(), cli.json),
            }
        }
        Commands::Pool(PoolCommands::Stats) => {
            display::pool_stats(&engine.pool, &engine.token, cli.json)
        }
        Commands::Pool(PoolCommands::Provider { address }) => {
            display::provider(&engine.pool, address, at, cli.json)?
        }
        _ => {}
    }

    Ok(())
}
