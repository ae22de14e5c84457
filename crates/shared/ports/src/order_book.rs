use economy_core::{Bid, BidId, Offer, OfferId, Price, Symbol, Transaction, TransactionId};

/// Port for the order book store
///
/// Holds resting bids and offers, the last traded price of every symbol and
/// the transaction log. Implementations are not synchronized: every call is
/// made while the caller holds the market's global lock.
pub trait OrderBook: Send {
    /// Assign a fresh identity to the offer and insert it
    fn add_offer(&mut self, offer: Offer) -> OfferId;

    /// Assign a fresh identity to the bid and insert it
    fn add_bid(&mut self, bid: Bid) -> BidId;

    /// Cheapest active offer for the symbol
    ///
    /// Limit offers compare at their own price, market offers at the
    /// symbol's last price.
    fn best_offer(&self, symbol: &str) -> Option<Offer>;

    /// Highest active bid for the symbol, with the same price substitution
    fn best_bid(&self, symbol: &str) -> Option<Bid>;

    /// Persist a mutated offer. Inactive offers are kept.
    fn update_offer(&mut self, offer: Offer);

    /// Persist a mutated bid. Inactive bids are kept.
    fn update_bid(&mut self, bid: Bid);

    fn find_bid(&self, id: BidId) -> Option<Bid>;

    fn find_offer(&self, id: OfferId) -> Option<Offer>;

    /// Look up a bid the store issued
    ///
    /// # Panics
    ///
    /// Panics if the id is unknown: returning a wrong order would corrupt
    /// accounting.
    fn get_bid(&self, id: BidId) -> Bid {
        match self.find_bid(id) {
            Some(bid) => bid,
            None => panic!("Bid {id} not found"),
        }
    }

    /// Look up an offer the store issued
    ///
    /// # Panics
    ///
    /// Panics if the id is unknown.
    fn get_offer(&self, id: OfferId) -> Offer {
        match self.find_offer(id) {
            Some(offer) => offer,
            None => panic!("Offer {id} not found"),
        }
    }

    /// Assign an identity to the transaction and append it to the log
    fn new_transaction(&mut self, tx: Transaction) -> TransactionId;

    /// The transaction log, oldest first
    fn transactions(&self) -> &[Transaction];

    /// Last traded price, or 1 if the symbol never traded
    fn last_price(&self, symbol: &str) -> Price;

    fn set_last_price(&mut self, symbol: &str, price: Price);

    /// Symbols with a recorded price or any offer, sorted
    fn all_symbols(&self) -> Vec<Symbol>;
}
