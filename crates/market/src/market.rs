use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use economy_core::{Bid, BidId, Offer, OfferId, OrderType, Price, Quantity, Symbol, Transaction};
use economy_matching::{MatchContext, ProcessorTable};
use economy_ports::{Accounts, Clock, OrderBook};
use log::info;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;

use crate::error::{MarketError, Result};
use crate::snapshot::{read_snapshot, write_snapshot};
use crate::store::MemoryBook;

/// Continuous two-sided market
///
/// Every operation holds one lock over the whole book, across all symbols,
/// for its full duration, including the matching loop and every settlement
/// it triggers. Share it between threads through an `Arc`.
pub struct Market<B, A, C> {
    book: Mutex<B>,
    accounts: A,
    clock: C,
    processors: ProcessorTable,
}

impl<B, A, C> Market<B, A, C>
where
    B: OrderBook,
    A: Accounts,
    C: Clock,
{
    /// Market with the default market and limit processors
    pub fn new(book: B, accounts: A, clock: C) -> Self {
        Self::with_processors(book, accounts, clock, ProcessorTable::default())
    }

    pub fn with_processors(book: B, accounts: A, clock: C, processors: ProcessorTable) -> Self {
        Self {
            book: Mutex::new(book),
            accounts,
            clock,
            processors,
        }
    }

    /// Add an offer and sell it against resting bids
    ///
    /// Whatever is not sold rests in the book. Returns the assigned id.
    pub fn offer(&self, offer: Offer) -> OfferId {
        let mut book = self.book.lock();
        let id = book.add_offer(offer);
        let offer = book.get_offer(id);
        info!(
            "Offer accepted: id={}, type={:?}, account={}, symbol={}, amount={}, price={}",
            id, offer.order_type, offer.account, offer.symbol, offer.amount, offer.price
        );

        let mut ctx = MatchContext::new(&mut *book, &self.accounts, &self.clock, &self.processors);
        ctx.sell(offer);
        id
    }

    /// Add a bid and fill it against resting offers
    ///
    /// The bid rests when the book runs dry or prices stop crossing, and is
    /// retired if the buyer cannot pay. Returns the assigned id.
    pub fn bid(&self, bid: Bid) -> BidId {
        let mut book = self.book.lock();
        let id = book.add_bid(bid);
        let bid = book.get_bid(id);
        info!(
            "Bid accepted: id={}, type={:?}, account={}, symbol={}, amount={}, price={}",
            id, bid.order_type, bid.account, bid.symbol, bid.amount, bid.price
        );

        let mut ctx = MatchContext::new(&mut *book, &self.accounts, &self.clock, &self.processors);
        ctx.fill_bid(bid);
        id
    }

    /// # Panics
    ///
    /// Panics if the market never issued this id.
    pub fn get_bid(&self, id: BidId) -> Bid {
        self.book.lock().get_bid(id)
    }

    /// # Panics
    ///
    /// Panics if the market never issued this id.
    pub fn get_offer(&self, id: OfferId) -> Offer {
        self.book.lock().get_offer(id)
    }

    pub fn all_symbols(&self) -> Vec<Symbol> {
        self.book.lock().all_symbols()
    }

    pub fn last_price(&self, symbol: &str) -> Price {
        self.book.lock().last_price(symbol)
    }

    /// Copy of the transaction log, oldest first
    pub fn transactions(&self) -> Vec<Transaction> {
        self.book.lock().transactions().to_vec()
    }

    /// Hold the market lock and reach the store directly
    ///
    /// No order can be processed while the guard lives.
    pub fn lock(&self) -> MutexGuard<'_, B> {
        self.book.lock()
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<A, C> Market<MemoryBook, A, C>
where
    A: Accounts,
    C: Clock,
{
    /// Write a snapshot of the book while holding the lock
    pub fn save<W: Write>(&self, w: W) -> Result<()> {
        write_snapshot(&self.lock(), w)?;
        Ok(())
    }

    /// Replace the whole book with a snapshot
    pub fn load<R: BufRead>(&self, r: R) -> Result<()> {
        let book = read_snapshot(r)?;
        *self.lock() = book;
        Ok(())
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.save(BufWriter::new(file))
    }

    /// Load the book from `path`, leaving it untouched if the file does not exist
    ///
    /// Returns whether a snapshot was read.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<bool> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        self.load(BufReader::new(file))?;
        Ok(true)
    }
}

/// Reject bids a client should never submit
pub fn validate_bid(bid: &Bid) -> Result<()> {
    validate(&bid.symbol, bid.order_type, bid.amount, bid.price)
}

/// Reject offers a client should never submit
pub fn validate_offer(offer: &Offer) -> Result<()> {
    validate(&offer.symbol, offer.order_type, offer.amount, offer.price)
}

fn validate(symbol: &str, order_type: OrderType, amount: Quantity, price: Price) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(MarketError::InvalidOrder("symbol must not be empty".to_string()));
    }
    if amount <= Decimal::ZERO {
        return Err(MarketError::InvalidOrder(format!(
            "amount must be positive, got {amount}"
        )));
    }
    if order_type == OrderType::Limit && price <= Decimal::ZERO {
        return Err(MarketError::InvalidOrder(format!(
            "limit price must be positive, got {price}"
        )));
    }
    Ok(())
}
