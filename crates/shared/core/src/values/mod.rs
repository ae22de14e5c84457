//! Scalar aliases shared by every crate
//!
//! Prices and quantities are exact decimals so that `price * amount`
//! settles without rounding drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub type Price = Decimal;

pub type Quantity = Decimal;

/// Trade time, always UTC
pub type Timestamp = DateTime<Utc>;

/// Name of a traded good; any string, compared exactly
pub type Symbol = String;

/// Ledger account identifier, owned by the accounts capability
pub type AccountId = i64;

/// Last price reported for a symbol that has never traded
pub const DEFAULT_LAST_PRICE: Price = Decimal::ONE;
