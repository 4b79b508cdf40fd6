//! Levy Core Library
//!
//! Shared primitives for the levy token workspace: account identities,
//! 256-bit amounts, the call context handed in by the host, the categorical
//! error type and the plain balance ledger every other crate builds on.

pub mod address;
pub mod amount;
pub mod context;
pub mod error;
pub mod ledger;
pub mod supply;

// Re-export main types
pub use address::{Address, AddressParseError};
pub use amount::{format_units, parse_units, to_units, Amount, DECIMALS};
pub use context::CallContext;
pub use error::{Result, TokenError};
pub use ledger::{BalanceLedger, TokenLedger};
pub use supply::SupplyStats;

/// Basis points denominator (100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Percentage denominator used by the tax rates
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Seconds in one day
pub const SECONDS_PER_DAY: u64 = 86_400;
