//! Economy Matching
//!
//! Order processors and the settlement routine.
//!
//! Each order type has a processor that runs the matching loop for
//! incoming orders of that type and values resting orders of that type
//! when another processor trades against them. Processors are looked up
//! through a [`ProcessorTable`] fixed at construction, which is what makes
//! mixed market/limit matching work.

mod limit;
mod market;
mod processor;
mod settlement;

#[cfg(test)]
mod testing;

pub use limit::{LimitOrderProcessor, limit_bid_trade_price, limit_offer_trade_price};
pub use market::MarketOrderProcessor;
pub use processor::{MatchContext, OrderProcessor, ProcessorTable};
pub use settlement::{Fill, fill_bid};

// Re-export the ports the processors are driven through
pub use economy_ports::{Accounts, Clock, OrderBook};
