//! Economy Ports
//!
//! Port definitions (traits) for the economy matching engine.
//! These define the boundaries between the matching core and the
//! collaborators it is driven by: the ledger, the time source and the
//! order book store.

mod accounts;
mod clock;
mod order_book;

pub use accounts::Accounts;
pub use clock::Clock;
pub use order_book::OrderBook;
