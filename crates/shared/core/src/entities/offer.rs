use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OrderType;
use crate::values::{AccountId, Price, Quantity, Symbol};

/// Unique identifier for an offer
pub type OfferId = Uuid;

/// Lifecycle state of an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferStatus {
    /// Still has quantity to sell
    Pending,
    /// Fully consumed
    Filled,
}

/// Sell-side order
///
/// `amount` is the remaining quantity and only ever decreases.
/// The identity is assigned by the order book when the offer is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub order_type: OrderType,
    /// Seller account credited on each fill
    pub account: AccountId,
    pub symbol: Symbol,
    /// Floor price; ignored for market offers
    pub price: Price,
    pub amount: Quantity,
}

impl Offer {
    /// Create a market offer that sells at whatever the book values it
    pub fn market(account: AccountId, symbol: impl Into<Symbol>, amount: Quantity) -> Self {
        Self {
            id: Uuid::nil(),
            order_type: OrderType::Market,
            account,
            symbol: symbol.into(),
            price: Decimal::ZERO,
            amount,
        }
    }

    /// Create a limit offer that never sells below `price`
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
        }
    }

    /// An offer takes part in matching while it has quantity left
    pub fn is_active(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn status(&self) -> OfferStatus {
        if self.is_active() {
            OfferStatus::Pending
        } else {
            OfferStatus::Filled
        }
    }
}
