use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BidId, OfferId};
use crate::values::{Price, Quantity, Timestamp};

/// Unique identifier for a transaction
pub type TransactionId = Uuid;

/// Immutable record of one fill between a bid and an offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub bid_id: BidId,
    pub offer_id: OfferId,
    pub price: Price,
    /// Quantity exchanged in this fill, not the original order size
    pub amount: Quantity,
    pub timestamp: Timestamp,
}

impl Transaction {
    /// Create an unrecorded transaction; the order book assigns the id
    pub fn new(
        bid_id: BidId,
        offer_id: OfferId,
        price: Price,
        amount: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            bid_id,
            offer_id,
            price,
            amount,
            timestamp,
        }
    }

    /// Funds moved from buyer to seller (price * amount)
    pub fn notional(&self) -> Price {
        self.price * self.amount
    }
}
