use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrderType;
use crate::values::{AccountId, Price, Quantity, Symbol};

/// Unique identifier for a bid
pub type BidId = Uuid;

/// Lifecycle state of a bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    /// Resting or still matching
    Pending,
    /// Fully filled
    Filled,
    /// Retired because the buyer could not pay for a fill
    Rejected,
}

impl BidStatus {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, BidStatus::Filled | BidStatus::Rejected)
    }
}

/// Buy-side order
///
/// `amount` is the remaining quantity. Once `nsf` is set the bid is
/// permanently inactive, whatever quantity remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub order_type: OrderType,
    /// Buyer account debited on each fill
    pub account: AccountId,
    pub symbol: Symbol,
    /// Ceiling price; ignored for market bids
    pub price: Price,
    pub amount: Quantity,
    /// Insufficient funds
    pub nsf: bool,
}

impl Bid {
    /// Create a market bid that buys at whatever the book asks
    pub fn market(account: AccountId, symbol: impl Into<Symbol>, amount: Quantity) -> Self {
        Self {
            id: Uuid::nil(),
            order_type: OrderType::Market,
            account,
            symbol: symbol.into(),
            price: Decimal::ZERO,
            amount,
            nsf: false,
        }
    }

    /// Create a limit bid that never pays more than `price`
    pub fn limit(
        account: AccountId,
        symbol: impl Into<Symbol>,
        amount: Quantity,
        price: Price,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            order_type: OrderType::Limit,
            account,
            symbol: symbol.into(),
            price,
            amount,
            nsf: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.amount > Decimal::ZERO && !self.nsf
    }

    pub fn status(&self) -> BidStatus {
        if self.nsf {
            BidStatus::Rejected
        } else if self.amount > Decimal::ZERO {
            BidStatus::Pending
        } else {
            BidStatus::Filled
        }
    }
}
