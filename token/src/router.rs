//! Transfer classification and fee routing
//!
//! Pure computation: given who sends to whom and the current policy, decide
//! whether the transfer is a buy, a sell or an ordinary transfer, and how the
//! amount splits into the net credit and the three tax buckets. Nothing here
//! touches balances.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

use levy_core::{Address, Amount, Result, TokenError, PERCENT_DENOMINATOR};

use crate::policy::{PolicyStore, TaxRates};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferClass {
    /// Tokens leave the liquidity pair
    Buy,
    /// Tokens enter the liquidity pair
    Sell,
    Ordinary,
}

impl fmt::Display for TransferClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferClass::Buy => write!(f, "buy"),
            TransferClass::Sell => write!(f, "sell"),
            TransferClass::Ordinary => write!(f, "ordinary"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBuckets {
    pub liquidity: Amount,
    pub marketing: Amount,
    pub burn: Amount,
}

impl TaxBuckets {
    pub fn total(&self) -> Amount {
        self.liquidity + self.marketing + self.burn
    }

    pub fn is_empty(&self) -> bool {
        self.total().is_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOutcome {
    pub class: TransferClass,
    pub net_amount: Amount,
    pub buckets: TaxBuckets,
}

impl RouteOutcome {
    pub fn total_tax(&self) -> Amount {
        self.buckets.total()
    }
}

/// Buy if the sender is the pair, sell if the recipient is, otherwise ordinary
pub fn classify(sender: &Address, recipient: &Address, policy: &PolicyStore) -> TransferClass {
    if policy.is_pair(sender) {
        TransferClass::Buy
    } else if policy.is_pair(recipient) {
        TransferClass::Sell
    } else {
        TransferClass::Ordinary
    }
}

pub fn route(
    sender: &Address,
    recipient: &Address,
    amount: Amount,
    policy: &PolicyStore,
) -> Result<RouteOutcome> {
    if amount.is_zero() {
        return Err(TokenError::InvalidAmount);
    }
    if sender.is_zero() || recipient.is_zero() {
        return Err(TokenError::InvalidAddress);
    }

    let fee_exempt =
        policy.is_excluded_from_fees(sender) || policy.is_excluded_from_fees(recipient);
    let class = if fee_exempt {
        TransferClass::Ordinary
    } else {
        classify(sender, recipient, policy)
    };

    let rate = policy.taxes().rate_for(class);
    let buckets = split_tax(amount, rate, policy.taxes())?;

    Ok(RouteOutcome {
        class,
        net_amount: amount - buckets.total(),
        buckets,
    })
}

/// `amount * rate / 100`, split by bucket weight. Every division floors and
/// the burn bucket takes the remainder, so the buckets always sum to the
/// collected tax exactly.
pub fn split_tax(amount: Amount, rate: u8, rates: &TaxRates) -> Result<TaxBuckets> {
    let total_tax = amount
        .checked_mul(U256::from(rate))
        .ok_or(TokenError::Overflow)?
        / U256::from(PERCENT_DENOMINATOR);

    if total_tax.is_zero() {
        return Ok(TaxBuckets::default());
    }

    let share_total = rates.share_total();
    if share_total == 0 {
        return Ok(TaxBuckets {
            burn: total_tax,
            ..TaxBuckets::default()
        });
    }

    let portion = |weight: u8| -> Result<Amount> {
        Ok(total_tax
            .checked_mul(U256::from(weight))
            .ok_or(TokenError::Overflow)?
            / U256::from(share_total))
    };

    let liquidity = portion(rates.liquidity)?;
    let marketing = portion(rates.marketing)?;

    Ok(TaxBuckets {
        liquidity,
        marketing,
        burn: total_tax - liquidity - marketing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BurnMode;
    use crate::policy::TransactionLimits;

    fn pair() -> Address {
        Address::repeat_byte(0x99)
    }

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    fn policy() -> PolicyStore {
        let mut policy = PolicyStore::new(
            Address::repeat_byte(1),
            TaxRates::default(),
            TransactionLimits {
                max_transaction_amount: U256::MAX,
                max_wallet_amount: U256::MAX,
                transaction_cooldown: 0,
                max_daily_transactions: 10,
                day_window: 86_400,
            },
            Address::repeat_byte(2),
            Address::repeat_byte(3),
            BurnMode::Destroy,
        );
        policy.set_pair_address(pair());
        policy
    }

    #[test]
    fn test_buy_tax() {
        let outcome = route(&pair(), &alice(), U256::from(1000), &policy()).unwrap();

        assert_eq!(outcome.class, TransferClass::Buy);
        assert_eq!(outcome.net_amount, U256::from(970));
        assert_eq!(outcome.total_tax(), U256::from(30));
        // 30 split 2:2:1
        assert_eq!(outcome.buckets.liquidity, U256::from(12));
        assert_eq!(outcome.buckets.marketing, U256::from(12));
        assert_eq!(outcome.buckets.burn, U256::from(6));
    }

    #[test]
    fn test_sell_tax() {
        let outcome = route(&alice(), &pair(), U256::from(1000), &policy()).unwrap();

        assert_eq!(outcome.class, TransferClass::Sell);
        assert_eq!(outcome.net_amount, U256::from(950));
        assert_eq!(outcome.total_tax(), U256::from(50));
    }

    #[test]
    fn test_ordinary_is_tax_free() {
        let outcome = route(&alice(), &bob(), U256::from(1000), &policy()).unwrap();

        assert_eq!(outcome.class, TransferClass::Ordinary);
        assert_eq!(outcome.net_amount, U256::from(1000));
        assert!(outcome.buckets.is_empty());
    }

    #[test]
    fn test_fee_exclusion_forces_ordinary() {
        let mut policy = policy();
        policy.set_excluded_from_fees(alice(), true);

        let buy = route(&pair(), &alice(), U256::from(1000), &policy).unwrap();
        assert_eq!(buy.class, TransferClass::Ordinary);
        assert_eq!(buy.net_amount, U256::from(1000));

        let sell = route(&alice(), &pair(), U256::from(1000), &policy).unwrap();
        assert_eq!(sell.class, TransferClass::Ordinary);
        assert!(sell.buckets.is_empty());
    }

    #[test]
    fn test_truncation_and_remainder_to_burn() {
        // 3% of 99 = 2.97 -> 2; split 2:2:1 of 2 -> 0, 0, remainder 2
        let outcome = route(&pair(), &alice(), U256::from(99), &policy()).unwrap();
        assert_eq!(outcome.total_tax(), U256::from(2));
        assert_eq!(outcome.buckets.liquidity, U256::zero());
        assert_eq!(outcome.buckets.marketing, U256::zero());
        assert_eq!(outcome.buckets.burn, U256::from(2));
        assert_eq!(outcome.net_amount, U256::from(97));

        // 3% of 33 floors to 0
        let tiny = route(&pair(), &alice(), U256::from(33), &policy()).unwrap();
        assert_eq!(tiny.net_amount, U256::from(33));
        assert!(tiny.buckets.is_empty());
    }

    #[test]
    fn test_zero_weights_send_everything_to_burn() {
        let rates = TaxRates {
            buy: 5,
            sell: 5,
            liquidity: 0,
            marketing: 0,
            burn: 0,
        };
        let buckets = split_tax(U256::from(1000), 5, &rates).unwrap();
        assert_eq!(buckets.burn, U256::from(50));
        assert_eq!(buckets.total(), U256::from(50));
    }

    #[test]
    fn test_conservation_over_many_amounts() {
        let policy = policy();
        for raw in [1u64, 7, 100, 101, 999, 1_000_003, 123_456_789] {
            let amount = U256::from(raw);
            for (from, to) in [(pair(), alice()), (alice(), pair()), (alice(), bob())] {
                let outcome = route(&from, &to, amount, &policy).unwrap();
                assert_eq!(outcome.net_amount + outcome.total_tax(), amount);
            }
        }
    }

    #[test]
    fn test_rejects_zero_amount_and_address() {
        let policy = policy();
        assert_eq!(
            route(&alice(), &bob(), U256::zero(), &policy),
            Err(TokenError::InvalidAmount)
        );
        assert_eq!(
            route(&alice(), &Address::ZERO, U256::one(), &policy),
            Err(TokenError::InvalidAddress)
        );
    }

    #[test]
    fn test_no_pair_means_ordinary() {
        let policy = PolicyStore::new(
            Address::repeat_byte(1),
            TaxRates::default(),
            policy().limits().clone(),
            Address::repeat_byte(2),
            Address::repeat_byte(3),
            BurnMode::Destroy,
        );
        let outcome = route(&alice(), &bob(), U256::from(500), &policy).unwrap();
        assert_eq!(outcome.class, TransferClass::Ordinary);
    }
}
