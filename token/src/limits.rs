//! Limit enforcement pipeline
//!
//! Every transfer passes these gates in a fixed order before the ledger is
//! touched. The first failing gate decides the error; a rejected transfer
//! changes nothing.
//!
//! 1. Blacklist (never bypassed)
//! 2. Trading enabled (the administrator may always move tokens)
//! 3. Zero amount
//! 4. Max transaction
//! 5. Max wallet (needs the routed net amount)
//! 6. Cooldown
//! 7. Daily count

use primitive_types::U256;
use std::fmt;

use levy_core::{Address, Amount, Result, TokenError};

use crate::policy::{AccountActivity, PolicyStore};
use crate::router::{self, RouteOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Blacklist,
    TradingEnabled,
    ZeroAmount,
    MaxTransaction,
    MaxWallet,
    Cooldown,
    DailyCount,
}

impl Gate {
    pub const ORDER: [Gate; 7] = [
        Gate::Blacklist,
        Gate::TradingEnabled,
        Gate::ZeroAmount,
        Gate::MaxTransaction,
        Gate::MaxWallet,
        Gate::Cooldown,
        Gate::DailyCount,
    ];
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gate::Blacklist => "blacklist",
            Gate::TradingEnabled => "trading-enabled",
            Gate::ZeroAmount => "zero-amount",
            Gate::MaxTransaction => "max-transaction",
            Gate::MaxWallet => "max-wallet",
            Gate::Cooldown => "cooldown",
            Gate::DailyCount => "daily-count",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
    /// Unix seconds
    pub timestamp: u64,
}

/// A transfer that cleared every gate, with the state to commit once the
/// ledger has applied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub route: RouteOutcome,
    pub sender_activity: AccountActivity,
}

struct Gates<'a> {
    policy: &'a PolicyStore,
    request: &'a TransferRequest,
}

impl<'a> Gates<'a> {
    fn limit_exempt(&self) -> bool {
        self.policy.is_excluded_from_limits(&self.request.from)
            || self.policy.is_excluded_from_limits(&self.request.to)
    }

    fn blacklist(&self) -> Result<()> {
        for account in [self.request.from, self.request.to] {
            if self.policy.is_blacklisted(&account) {
                return Err(TokenError::Blacklisted(account));
            }
        }
        Ok(())
    }

    fn trading_enabled(&self) -> Result<()> {
        if self.policy.trading_enabled()
            || self.policy.is_administrator(&self.request.from)
            || self.policy.is_administrator(&self.request.to)
        {
            return Ok(());
        }
        Err(TokenError::TradingDisabled)
    }

    fn zero_amount(&self) -> Result<()> {
        if self.request.amount.is_zero() {
            return Err(TokenError::ZeroAmount);
        }
        Ok(())
    }

    fn max_transaction(&self) -> Result<()> {
        let max = self.policy.limits().max_transaction_amount;
        if self.request.amount > max && !self.limit_exempt() {
            return Err(TokenError::ExceedsMaxTransaction {
                amount: self.request.amount,
                max,
            });
        }
        Ok(())
    }

    fn max_wallet(&self, recipient_balance: Amount, net_amount: Amount) -> Result<()> {
        let to = &self.request.to;
        // A self-transfer never grows the balance
        if self.limit_exempt() || self.policy.is_pair(to) || self.request.from == *to {
            return Ok(());
        }

        let max = self.policy.limits().max_wallet_amount;
        let resulting = recipient_balance
            .checked_add(net_amount)
            .unwrap_or(U256::MAX);
        if resulting > max {
            return Err(TokenError::ExceedsMaxWallet { resulting, max });
        }
        Ok(())
    }

    fn cooldown(&self, activity: &AccountActivity) -> Result<()> {
        if self.policy.is_excluded_from_limits(&self.request.from) {
            return Ok(());
        }

        let cooldown = self.policy.limits().transaction_cooldown;
        match activity.cooldown_remaining(self.request.timestamp, cooldown) {
            Some(remaining) => Err(TokenError::CooldownActive { remaining }),
            None => Ok(()),
        }
    }

    fn daily_count(&self, activity: &AccountActivity) -> Result<()> {
        if self.policy.is_excluded_from_limits(&self.request.from) {
            return Ok(());
        }

        let limits = self.policy.limits();
        let current = activity.rolled(self.request.timestamp, limits.day_window);
        if current.tx_count_in_window >= limits.max_daily_transactions {
            return Err(TokenError::DailyLimitExceeded {
                count: current.tx_count_in_window,
                max: limits.max_daily_transactions,
            });
        }
        Ok(())
    }
}

/// Run the gates and route the transfer. `recipient_balance` is the
/// recipient's balance before the transfer.
pub fn admit(
    policy: &PolicyStore,
    request: &TransferRequest,
    recipient_balance: Amount,
) -> Result<Admission> {
    let gates = Gates { policy, request };

    gates.blacklist()?;
    gates.trading_enabled()?;
    gates.zero_amount()?;
    gates.max_transaction()?;

    let route = router::route(&request.from, &request.to, request.amount, policy)?;
    gates.max_wallet(recipient_balance, route.net_amount)?;

    let activity = policy.activity(&request.from);
    gates.cooldown(&activity)?;
    gates.daily_count(&activity)?;

    Ok(Admission {
        route,
        sender_activity: activity.recorded(request.timestamp, policy.limits().day_window),
    })
}
