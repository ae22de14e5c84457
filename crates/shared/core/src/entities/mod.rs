mod bid;
mod offer;
mod order_type;
mod transaction;

pub use bid::{Bid, BidId, BidStatus};
pub use offer::{Offer, OfferId, OfferStatus};
pub use order_type::{OrderType, OrderTypeError};
pub use transaction::{Transaction, TransactionId};
