use economy_core::{Bid, Offer, OrderType, Price};
use economy_ports::{Accounts, Clock, OrderBook};

use crate::limit::LimitOrderProcessor;
use crate::market::MarketOrderProcessor;
use crate::settlement::{Fill, fill_bid};

/// Matching behaviour of one order type
///
/// `try_fill_bid`/`try_sell` run the matching loop for an incoming order of
/// this processor's type. `asking_price`/`bid_price` value a resting order
/// of this processor's type when the other side trades against it.
pub trait OrderProcessor: Send + Sync {
    fn name(&self) -> &str;

    /// Match a bid against resting offers until it is exhausted, the book
    /// runs dry, prices stop crossing or the buyer runs out of funds
    fn try_fill_bid(&self, ctx: &mut MatchContext<'_>, bid: Bid);

    /// Match an offer against resting bids, symmetric to `try_fill_bid`
    fn try_sell(&self, ctx: &mut MatchContext<'_>, offer: Offer);

    fn asking_price(&self, book: &dyn OrderBook, offer: &Offer) -> Price;

    fn bid_price(&self, book: &dyn OrderBook, bid: &Bid) -> Price;
}

/// One processor per order type, resolved once when the market is built
pub struct ProcessorTable {
    market: Box<dyn OrderProcessor>,
    limit: Box<dyn OrderProcessor>,
}

impl ProcessorTable {
    pub fn new(market: Box<dyn OrderProcessor>, limit: Box<dyn OrderProcessor>) -> Self {
        Self { market, limit }
    }

    /// Replace the processor for one order type
    pub fn with(mut self, order_type: OrderType, processor: Box<dyn OrderProcessor>) -> Self {
        match order_type {
            OrderType::Market => self.market = processor,
            OrderType::Limit => self.limit = processor,
        }
        self
    }

    pub fn get(&self, order_type: OrderType) -> &dyn OrderProcessor {
        match order_type {
            OrderType::Market => self.market.as_ref(),
            OrderType::Limit => self.limit.as_ref(),
        }
    }
}

impl Default for ProcessorTable {
    fn default() -> Self {
        Self::new(
            Box::new(MarketOrderProcessor::new()),
            Box::new(LimitOrderProcessor::new()),
        )
    }
}

/// Everything a matching loop touches, borrowed for one top-level call
///
/// Built by the market while it holds the book lock.
pub struct MatchContext<'a> {
    pub book: &'a mut dyn OrderBook,
    pub accounts: &'a dyn Accounts,
    pub clock: &'a dyn Clock,
    pub processors: &'a ProcessorTable,
}

impl<'a> MatchContext<'a> {
    pub fn new(
        book: &'a mut dyn OrderBook,
        accounts: &'a dyn Accounts,
        clock: &'a dyn Clock,
        processors: &'a ProcessorTable,
    ) -> Self {
        Self {
            book,
            accounts,
            clock,
            processors,
        }
    }

    /// Price of a resting offer, as valued by the processor of its type
    pub fn asking_price(&self, offer: &Offer) -> Price {
        self.processors
            .get(offer.order_type)
            .asking_price(&*self.book, offer)
    }

    /// Price of a resting bid, as valued by the processor of its type
    pub fn bid_price(&self, bid: &Bid) -> Price {
        self.processors
            .get(bid.order_type)
            .bid_price(&*self.book, bid)
    }

    pub fn last_price(&self, symbol: &str) -> Price {
        self.book.last_price(symbol)
    }

    /// Run one fill step at `price`, timestamped by the injected clock
    pub fn settle(&mut self, bid: Bid, offer: Offer, price: Price) -> Fill {
        let now = self.clock.now();
        fill_bid(&mut *self.book, self.accounts, now, bid, offer, price)
    }

    /// Dispatch an incoming bid to the processor of its type
    pub fn fill_bid(&mut self, bid: Bid) {
        let processors = self.processors;
        processors.get(bid.order_type).try_fill_bid(self, bid);
    }

    /// Dispatch an incoming offer to the processor of its type
    pub fn sell(&mut self, offer: Offer) {
        let processors = self.processors;
        processors.get(offer.order_type).try_sell(self, offer);
    }
}
