//! Economy Core Domain
//!
//! Pure domain types for the economy matching engine.
//! This crate contains no locking, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Bid, BidId, BidStatus, Offer, OfferId, OfferStatus, OrderType, OrderTypeError, Transaction,
    TransactionId,
};
pub use values::{AccountId, DEFAULT_LAST_PRICE, Price, Quantity, Symbol, Timestamp};
