//! Terminal output for query commands

use owo_colors::OwoColorize;
use serde_json::{json, Value};

use levy_core::{format_units, Address};
use levy_liquidity::LiquidityPoolManager;
use levy_storage::JournalEntry;
use levy_token::Token;

const RULE: &str = "═══════════════════════════════════";

fn header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", RULE.bright_black());
}

fn field(label: &str, value: impl std::fmt::Display) {
    println!("{:<24}{}", format!("{}:", label).yellow().bold(), value);
}

fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn token_info(token: &Token, json: bool) {
    let pair = token.pair_address().map(|a| a.to_string());
    if json {
        return print_json(&json!({
            "name": token.name(),
            "symbol": token.symbol(),
            "decimals": token.decimals(),
            "total_supply": format_units(token.total_supply()),
            "total_burned": format_units(token.total_burned()),
            "owner": token.owner(),
            "address": token.address(),
            "pair": pair,
            "liquidity_wallet": token.liquidity_wallet(),
            "marketing_wallet": token.marketing_wallet(),
        }));
    }

    header(&format!("🪙 {} ({})", token.name(), token.symbol()));
    field("Decimals", token.decimals());
    field("Total Supply", format_units(token.total_supply()).green());
    field("Total Burned", format_units(token.total_burned()));
    field("Owner", token.owner());
    field("Tax Custody", token.address());
    field("Pair", pair.unwrap_or_else(|| "not set".to_string()));
    field("Liquidity Wallet", token.liquidity_wallet());
    field("Marketing Wallet", token.marketing_wallet());
    println!();
}

pub fn tax_info(token: &Token, json: bool) {
    let rates = token.tax_info();
    let pending = token.pending_taxes();
    if json {
        return print_json(&json!({
            "buy": rates.buy,
            "sell": rates.sell,
            "liquidity": rates.liquidity,
            "marketing": rates.marketing,
            "burn": rates.burn,
            "pending": {
                "liquidity": format_units(pending.liquidity),
                "marketing": format_units(pending.marketing),
                "burn": format_units(pending.burn),
            },
        }));
    }

    header("💸 Tax Info");
    field("Buy Tax", format!("{}%", rates.buy));
    field("Sell Tax", format!("{}%", rates.sell));
    field(
        "Split",
        format!(
            "liquidity {} / marketing {} / burn {}",
            rates.liquidity, rates.marketing, rates.burn
        ),
    );
    field("Pending Liquidity", format_units(pending.liquidity));
    field("Pending Marketing", format_units(pending.marketing));
    field("Pending Burn", format_units(pending.burn));
    println!();
}

pub fn limits_info(token: &Token, json: bool) {
    let limits = token.limits_info();
    if json {
        return print_json(&json!({
            "trading_enabled": limits.trading_enabled,
            "max_transaction_amount": format_units(limits.max_transaction_amount),
            "max_wallet_amount": format_units(limits.max_wallet_amount),
            "transaction_cooldown": limits.transaction_cooldown,
            "max_daily_transactions": limits.max_daily_transactions,
        }));
    }

    header("🛡️  Limits");
    let trading = if limits.trading_enabled {
        "enabled".green().to_string()
    } else {
        "disabled".red().to_string()
    };
    field("Trading", trading);
    field("Max Transaction", format_units(limits.max_transaction_amount));
    field("Max Wallet", format_units(limits.max_wallet_amount));
    field("Cooldown", format!("{}s", limits.transaction_cooldown));
    field("Max Daily Transfers", limits.max_daily_transactions);
    println!();
}

pub fn account(token: &Token, account: &Address, json: bool) {
    let stats = token.account_stats(account);
    let activity = token.account_activity(account);
    if json {
        return print_json(&json!({
            "address": account,
            "balance": format_units(stats.balance),
            "excluded_from_fees": stats.is_excluded_from_fees,
            "excluded_from_limits": stats.is_excluded_from_limits,
            "blacklisted": stats.is_blacklisted,
            "last_tx_timestamp": activity.last_tx_timestamp,
            "tx_count_in_window": activity.tx_count_in_window,
            "window_start": activity.window_start,
        }));
    }

    header("💰 Account");
    field("Address", account);
    field("Balance", format!("{} {}", format_units(stats.balance), token.symbol()));
    field("Fee Excluded", stats.is_excluded_from_fees);
    field("Limit Excluded", stats.is_excluded_from_limits);
    if stats.is_blacklisted {
        field("Blacklisted", "yes".red());
    } else {
        field("Blacklisted", "no");
    }
    field(
        "Last Transfer",
        activity
            .last_tx_timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| "never".to_string()),
    );
    field("Transfers In Window", activity.tx_count_in_window);
    println!();
}

pub fn history<'a>(entries: impl Iterator<Item = &'a JournalEntry>, json: bool) {
    let entries: Vec<&JournalEntry> = entries.collect();
    if json {
        let rows: Vec<Value> = entries
            .iter()
            .map(|e| {
                json!({
                    "sequence": e.sequence,
                    "recorded_at": e.recorded_at.to_rfc3339(),
                    "timestamp": e.timestamp,
                    "caller": e.caller,
                    "operation": e.operation,
                    "receipt": e.receipt.map(|r| json!({
                        "from": r.from,
                        "to": r.to,
                        "class": r.class.to_string(),
                        "amount": format_units(r.amount),
                        "net_amount": format_units(r.net_amount),
                    })),
                })
            })
            .collect();
        return print_json(&Value::Array(rows));
    }

    header(&format!("📜 History ({})", entries.len()));
    for entry in entries {
        let detail = match &entry.receipt {
            Some(r) => format!(
                "{} {} -> {}: {} (net {})",
                r.class,
                r.from,
                r.to,
                format_units(r.amount),
                format_units(r.net_amount)
            ),
            None => format!("by {}", entry.caller),
        };
        println!(
            "  #{:<4} {} {:<24} {}",
            entry.sequence,
            entry.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black(),
            entry.operation.bright_white(),
            detail
        );
    }
    println!();
}

pub fn pool_stats(pool: &LiquidityPoolManager, token: &Token, json: bool) {
    let stats = pool.pool_stats();
    let reserve = pool.reward_reserve(token);
    if json {
        return print_json(&json!({
            "address": pool.address(),
            "owner": pool.owner(),
            "pair": pool.pair(),
            "total_providers": stats.total_providers,
            "reward_rate": stats.reward_rate,
            "total_deposited": format_units(stats.total_deposited),
            "collected_fees": format_units(stats.collected_fees),
            "reward_reserve": format_units(reserve),
            "add_liquidity_fee": stats.add_liquidity_fee,
            "remove_liquidity_fee": stats.remove_liquidity_fee,
        }));
    }

    header("🏊 Liquidity Pool");
    field("Address", pool.address());
    field("Owner", pool.owner());
    field("Pair", pool.pair());
    field("Providers", stats.total_providers);
    field("Reward Rate", format!("{}%", stats.reward_rate));
    field("Total Deposited", format_units(stats.total_deposited));
    field("Collected Fees", format_units(stats.collected_fees));
    field("Reward Reserve", format_units(reserve));
    field(
        "Fees (add/remove)",
        format!("{} / {} bps", stats.add_liquidity_fee, stats.remove_liquidity_fee),
    );
    println!();
}

pub fn provider(pool: &LiquidityPoolManager, account: &Address, now: u64, json: bool) -> levy_liquidity::Result<()> {
    let info = pool.provider_info(account, now)?;
    if json {
        print_json(&json!({
            "address": account,
            "deposited": format_units(info.deposited),
            "last_accrual_time": info.last_accrual_time,
            "pending_rewards": format_units(info.pending_rewards),
            "state": format!("{:?}", info.state),
        }));
        return Ok(());
    }

    header("👤 Provider");
    field("Address", account);
    field("Deposited", format_units(info.deposited));
    field("Pending Rewards", format_units(info.pending_rewards).green());
    field("State", format!("{:?}", info.state));
    println!();
    Ok(())
}
