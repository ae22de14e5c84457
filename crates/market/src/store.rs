use std::collections::{BTreeSet, HashMap};

use economy_core::{
    Bid, BidId, DEFAULT_LAST_PRICE, Offer, OfferId, OrderType, Price, Symbol, Transaction,
    TransactionId,
};
use economy_ports::OrderBook;
use indexmap::IndexMap;
use uuid::Uuid;

/// In-memory order book store
///
/// Orders live in insertion-ordered arenas keyed by id, so filled and NSF
/// orders stay addressable and best-price scans are deterministic. Not
/// synchronized: wrap it in a `Market`, which owns the lock.
#[derive(Debug, Clone, Default)]
pub struct MemoryBook {
    offers: IndexMap<OfferId, Offer>,
    bids: IndexMap<BidId, Bid>,
    transactions: Vec<Transaction>,
    last_prices: HashMap<Symbol, Price>,
}

impl MemoryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// All offers ever added, in insertion order
    pub fn offers(&self) -> impl Iterator<Item = &Offer> {
        self.offers.values()
    }

    /// All bids ever added, in insertion order
    pub fn bids(&self) -> impl Iterator<Item = &Bid> {
        self.bids.values()
    }

    /// Recorded last prices, sorted by symbol
    pub fn last_prices(&self) -> Vec<(Symbol, Price)> {
        let mut prices: Vec<(Symbol, Price)> = self
            .last_prices
            .iter()
            .map(|(symbol, price)| (symbol.clone(), *price))
            .collect();
        prices.sort();
        prices
    }

    /// Insert an offer under its existing id, used when restoring a snapshot
    pub(crate) fn restore_offer(&mut self, offer: Offer) {
        self.offers.insert(offer.id, offer);
    }

    pub(crate) fn restore_bid(&mut self, bid: Bid) {
        self.bids.insert(bid.id, bid);
    }

    pub(crate) fn restore_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    fn comparison_price(&self, order_type: OrderType, own: Price, symbol: &str) -> Price {
        match order_type {
            OrderType::Limit => own,
            OrderType::Market => self.last_price(symbol),
        }
    }
}

impl OrderBook for MemoryBook {
    fn add_offer(&mut self, mut offer: Offer) -> OfferId {
        offer.id = Uuid::new_v4();
        let id = offer.id;
        self.offers.insert(id, offer);
        id
    }

    fn add_bid(&mut self, mut bid: Bid) -> BidId {
        bid.id = Uuid::new_v4();
        let id = bid.id;
        self.bids.insert(id, bid);
        id
    }

    fn best_offer(&self, symbol: &str) -> Option<Offer> {
        let mut best: Option<(&Offer, Price)> = None;
        for offer in self
            .offers
            .values()
            .filter(|o| o.symbol == symbol && o.is_active())
        {
            let price = self.comparison_price(offer.order_type, offer.price, symbol);
            // strict comparison keeps the earliest offer on ties
            if best.is_none_or(|(_, current)| price < current) {
                best = Some((offer, price));
            }
        }
        best.map(|(offer, _)| offer.clone())
    }

    fn best_bid(&self, symbol: &str) -> Option<Bid> {
        let mut best: Option<(&Bid, Price)> = None;
        for bid in self
            .bids
            .values()
            .filter(|b| b.symbol == symbol && b.is_active())
        {
            let price = self.comparison_price(bid.order_type, bid.price, symbol);
            if best.is_none_or(|(_, current)| price > current) {
                best = Some((bid, price));
            }
        }
        best.map(|(bid, _)| bid.clone())
    }

    fn update_offer(&mut self, offer: Offer) {
        self.offers.insert(offer.id, offer);
    }

    fn update_bid(&mut self, bid: Bid) {
        self.bids.insert(bid.id, bid);
    }

    fn find_bid(&self, id: BidId) -> Option<Bid> {
        self.bids.get(&id).cloned()
    }

    fn find_offer(&self, id: OfferId) -> Option<Offer> {
        self.offers.get(&id).cloned()
    }

    fn new_transaction(&mut self, mut tx: Transaction) -> TransactionId {
        tx.id = Uuid::new_v4();
        let id = tx.id;
        self.transactions.push(tx);
        id
    }

    fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn last_price(&self, symbol: &str) -> Price {
        self.last_prices
            .get(symbol)
            .copied()
            .unwrap_or(DEFAULT_LAST_PRICE)
    }

    fn set_last_price(&mut self, symbol: &str, price: Price) {
        self.last_prices.insert(symbol.to_string(), price);
    }

    fn all_symbols(&self) -> Vec<Symbol> {
        let symbols: BTreeSet<&Symbol> = self
            .last_prices
            .keys()
            .chain(self.offers.values().map(|o| &o.symbol))
            .collect();
        symbols.into_iter().cloned().collect()
    }
}
