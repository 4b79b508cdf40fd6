//! Supply tracking

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyStats {
    pub total_minted: Amount,
    pub total_burned: Amount,
    pub circulating_supply: Amount,
}

impl SupplyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_mint(&mut self, amount: Amount) {
        self.total_minted += amount;
        self.circulating_supply += amount;
    }

    pub(crate) fn record_burn(&mut self, amount: Amount) {
        self.total_burned += amount;
        self.circulating_supply = self.circulating_supply.saturating_sub(amount);
    }

    pub fn net_supply(&self) -> Amount {
        self.total_minted.saturating_sub(self.total_burned)
    }
}
