//! Concurrent submission through a shared market
//!
//! Many threads submit bids and offers against one `Arc<Market>`. The
//! global lock must keep every order, the ledger and the transaction log
//! consistent with each other.

use std::sync::Arc;
use std::thread;

use economy_clock::SystemClock;
use economy_core::{Bid, Offer};
use economy_market::{InMemoryAccounts, Market, MemoryBook};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const THREADS: i64 = 8;
const ORDERS_PER_THREAD: i64 = 50;

#[test]
fn test_concurrent_orders_conserve_funds() {
    let _ = env_logger::try_init();
    let market = Arc::new(Market::new(
        MemoryBook::new(),
        InMemoryAccounts::new(),
        SystemClock::new(),
    ));
    for account in 0..THREADS {
        market.accounts().set_balance(account, dec!(500));
    }
    let initial = market.accounts().total();

    let handles: Vec<_> = (0..THREADS)
        .map(|account| {
            let market = Arc::clone(&market);
            thread::spawn(move || {
                let mut bids = Vec::new();
                let mut offers = Vec::new();
                for i in 0..ORDERS_PER_THREAD {
                    let price = Decimal::from(1 + (i + account) % 5);
                    if (i + account) % 2 == 0 {
                        bids.push(market.bid(Bid::limit(account, "m", dec!(2), price)));
                    } else {
                        offers.push(market.offer(Offer::limit(account, "m", dec!(3), price)));
                    }
                }
                (bids, offers)
            })
        })
        .collect();

    let mut bids = Vec::new();
    let mut offers = Vec::new();
    for handle in handles {
        let (b, o) = handle.join().unwrap();
        bids.extend(b);
        offers.extend(o);
    }

    assert_eq!(market.accounts().total(), initial);
    for account in 0..THREADS {
        assert!(market.accounts().balance(account) >= Decimal::ZERO);
    }

    let txs = market.transactions();
    for id in &bids {
        let bid = market.get_bid(*id);
        let traded: Decimal = txs.iter().filter(|t| t.bid_id == *id).map(|t| t.amount).sum();
        assert_eq!(traded + bid.amount, dec!(2));
        assert!(txs.iter().filter(|t| t.bid_id == *id).all(|t| t.price <= bid.price));
    }
    for id in &offers {
        let offer = market.get_offer(*id);
        let traded: Decimal = txs.iter().filter(|t| t.offer_id == *id).map(|t| t.amount).sum();
        assert_eq!(traded + offer.amount, dec!(3));
        assert!(txs.iter().filter(|t| t.offer_id == *id).all(|t| t.price >= offer.price));
    }

    // no book state can still cross after every submission settled
    let book = market.lock();
    let best_bid = economy_market::OrderBook::best_bid(&*book, "m");
    let best_offer = economy_market::OrderBook::best_offer(&*book, "m");
    if let (Some(bid), Some(offer)) = (best_bid, best_offer) {
        assert!(bid.price < offer.price);
    }
}

#[test]
fn test_market_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Market<MemoryBook, InMemoryAccounts, SystemClock>>();
}
