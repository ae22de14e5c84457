//! Minimal in-crate order book and ledger for exercising the processors

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use economy_core::{
    AccountId, Bid, BidId, DEFAULT_LAST_PRICE, Offer, OfferId, OrderType, Price, Symbol,
    Timestamp, Transaction, TransactionId,
};
use economy_ports::{Accounts, OrderBook};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn epoch() -> Timestamp {
    Timestamp::from_timestamp(0, 0).unwrap()
}

#[derive(Default)]
pub struct VecBook {
    offers: Vec<Offer>,
    bids: Vec<Bid>,
    transactions: Vec<Transaction>,
    prices: HashMap<Symbol, Price>,
}

impl VecBook {
    fn comparison_price(&self, order_type: OrderType, price: Price, symbol: &str) -> Price {
        match order_type {
            OrderType::Limit => price,
            OrderType::Market => self.last_price(symbol),
        }
    }
}

impl OrderBook for VecBook {
    fn add_offer(&mut self, mut offer: Offer) -> OfferId {
        offer.id = Uuid::new_v4();
        let id = offer.id;
        self.offers.push(offer);
        id
    }

    fn add_bid(&mut self, mut bid: Bid) -> BidId {
        bid.id = Uuid::new_v4();
        let id = bid.id;
        self.bids.push(bid);
        id
    }

    fn best_offer(&self, symbol: &str) -> Option<Offer> {
        let mut best: Option<(&Offer, Price)> = None;
        for offer in self.offers.iter().filter(|o| o.symbol == symbol && o.is_active()) {
            let price = self.comparison_price(offer.order_type, offer.price, symbol);
            if best.is_none_or(|(_, p)| price < p) {
                best = Some((offer, price));
            }
        }
        best.map(|(o, _)| o.clone())
    }

    fn best_bid(&self, symbol: &str) -> Option<Bid> {
        let mut best: Option<(&Bid, Price)> = None;
        for bid in self.bids.iter().filter(|b| b.symbol == symbol && b.is_active()) {
            let price = self.comparison_price(bid.order_type, bid.price, symbol);
            if best.is_none_or(|(_, p)| price > p) {
                best = Some((bid, price));
            }
        }
        best.map(|(b, _)| b.clone())
    }

    fn update_offer(&mut self, offer: Offer) {
        if let Some(slot) = self.offers.iter_mut().find(|o| o.id == offer.id) {
            *slot = offer;
        }
    }

    fn update_bid(&mut self, bid: Bid) {
        if let Some(slot) = self.bids.iter_mut().find(|b| b.id == bid.id) {
            *slot = bid;
        }
    }

    fn find_bid(&self, id: BidId) -> Option<Bid> {
        self.bids.iter().find(|b| b.id == id).cloned()
    }

    fn find_offer(&self, id: OfferId) -> Option<Offer> {
        self.offers.iter().find(|o| o.id == id).cloned()
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
        self.prices.get(symbol).copied().unwrap_or(DEFAULT_LAST_PRICE)
    }

    fn set_last_price(&mut self, symbol: &str, price: Price) {
        self.prices.insert(symbol.to_string(), price);
    }

    fn all_symbols(&self) -> Vec<Symbol> {
        let symbols: BTreeSet<Symbol> = self
            .prices
            .keys()
            .cloned()
            .chain(self.offers.iter().map(|o| o.symbol.clone()))
            .collect();
        symbols.into_iter().collect()
    }
}

/// Ledger that lets balances go negative unless an account is rejected
#[derive(Default)]
pub struct StubAccounts {
    balances: Mutex<HashMap<AccountId, Decimal>>,
    rejects: Mutex<HashSet<AccountId>>,
}

impl StubAccounts {
    pub fn reject(&self, account: AccountId) {
        self.rejects.lock().unwrap().insert(account);
    }

    pub fn balance(&self, account: AccountId) -> Decimal {
        self.balances
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }
}

impl Accounts for StubAccounts {
    fn credit(&self, account: AccountId, amount: Price) {
        *self.balances.lock().unwrap().entry(account).or_default() += amount;
    }

    fn debit_if_possible(&self, account: AccountId, amount: Price) -> bool {
        if self.rejects.lock().unwrap().contains(&account) {
            return false;
        }
        *self.balances.lock().unwrap().entry(account).or_default() -= amount;
        true
    }
}
