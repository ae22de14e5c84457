//! Economy Market
//!
//! The continuous two-sided market: an in-memory order book store, an
//! in-memory ledger, the `Market` orchestrator that serializes every order
//! behind one lock, and a text snapshot codec for the store.

pub mod accounts;
pub mod error;
pub mod market;
pub mod snapshot;
pub mod store;

pub use accounts::InMemoryAccounts;
pub use error::{MarketError, Result};
pub use market::{Market, validate_bid, validate_offer};
pub use snapshot::{SnapshotError, read_snapshot, write_snapshot};
pub use store::MemoryBook;

// Re-export the matching seams so callers need only this crate
pub use economy_matching::{MatchContext, OrderProcessor, ProcessorTable};
pub use economy_ports::{Accounts, Clock, OrderBook};
