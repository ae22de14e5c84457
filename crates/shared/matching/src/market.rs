use economy_core::{Bid, Offer, Price};
use economy_ports::OrderBook;
use log::debug;

use crate::processor::{MatchContext, OrderProcessor};

/// Processor for market orders
///
/// Market orders never reject on price: they take whatever the opposing
/// order is valued at, and stop only when the book runs dry or the buyer
/// cannot pay. When valued by the other side, a market order is worth the
/// symbol's last traded price.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarketOrderProcessor;

impl MarketOrderProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl OrderProcessor for MarketOrderProcessor {
    fn name(&self) -> &str {
        "Market"
    }

    fn try_fill_bid(&self, ctx: &mut MatchContext<'_>, mut bid: Bid) {
        while bid.is_active() {
            let Some(offer) = ctx.book.best_offer(&bid.symbol) else {
                debug!("Market bid {} rests: no offers for {}", bid.id, bid.symbol);
                return;
            };
            let price = ctx.asking_price(&offer);
            let fill = ctx.settle(bid, offer, price);
            bid = fill.bid;
            if !fill.filled {
                return;
            }
        }
    }

    fn try_sell(&self, ctx: &mut MatchContext<'_>, mut offer: Offer) {
        while offer.is_active() {
            let Some(bid) = ctx.book.best_bid(&offer.symbol) else {
                debug!("Market offer {} rests: no bids for {}", offer.id, offer.symbol);
                return;
            };
            let price = ctx.bid_price(&bid);
            let fill = ctx.settle(bid, offer, price);
            offer = fill.offer;
            if !fill.filled {
                return;
            }
        }
    }

    fn asking_price(&self, book: &dyn OrderBook, offer: &Offer) -> Price {
        book.last_price(&offer.symbol)
    }

    fn bid_price(&self, book: &dyn OrderBook, bid: &Bid) -> Price {
        book.last_price(&bid.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ProcessorTable;
    use crate::testing::{StubAccounts, VecBook};
    use economy_core::Timestamp;
    use economy_ports::Accounts;
    use rust_decimal_macros::dec;

    fn clock() -> Timestamp {
        Timestamp::from_timestamp(0, 0).unwrap()
    }

    fn run_bid(book: &mut VecBook, accounts: &dyn Accounts, bid: Bid) -> Bid {
        let table = ProcessorTable::default();
        let id = book.add_bid(bid);
        let bid = book.get_bid(id);
        let mut ctx = MatchContext::new(&mut *book, accounts, &clock, &table);
        MarketOrderProcessor.try_fill_bid(&mut ctx, bid);
        book.get_bid(id)
    }

    fn run_offer(book: &mut VecBook, accounts: &dyn Accounts, offer: Offer) -> Offer {
        let table = ProcessorTable::default();
        let id = book.add_offer(offer);
        let offer = book.get_offer(id);
        let mut ctx = MatchContext::new(&mut *book, accounts, &clock, &table);
        MarketOrderProcessor.try_sell(&mut ctx, offer);
        book.get_offer(id)
    }

    #[test]
    fn test_fill_by_exact_market_offer_at_last_price() {
        let mut book = VecBook::default();
        book.add_offer(Offer::market(2, "m", dec!(10)));
        book.set_last_price("m", dec!(7));

        let bid = run_bid(&mut book, &StubAccounts::default(), Bid::market(1, "m", dec!(10)));

        assert_eq!(bid.amount, dec!(0));
        assert_eq!(book.last_price("m"), dec!(7));
    }

    #[test]
    fn test_partial_fill_rests() {
        let mut book = VecBook::default();
        book.add_offer(Offer::limit(2, "m", dec!(5), dec!(20)));

        let bid = run_bid(&mut book, &StubAccounts::default(), Bid::market(1, "m", dec!(10)));

        assert_eq!(bid.amount, dec!(5));
        assert!(bid.is_active());
        assert_eq!(book.last_price("m"), dec!(20));
    }

    #[test]
    fn test_fill_across_two_offers() {
        let mut book = VecBook::default();
        let first = book.add_offer(Offer::limit(2, "m", dec!(8), dec!(20)));
        let second = book.add_offer(Offer::limit(3, "m", dec!(8), dec!(20)));

        let bid = run_bid(&mut book, &StubAccounts::default(), Bid::market(1, "m", dec!(10)));

        assert_eq!(bid.amount, dec!(0));
        assert_eq!(book.get_offer(first).amount, dec!(0));
        assert_eq!(book.get_offer(second).amount, dec!(6));
        assert_eq!(book.transactions().len(), 2);
        assert_eq!(book.last_price("m"), dec!(20));
    }

    #[test]
    fn test_nsf_stops_matching() {
        let mut book = VecBook::default();
        let offer = book.add_offer(Offer::limit(2, "m", dec!(8), dec!(20)));
        let accounts = StubAccounts::default();
        accounts.reject(1);

        let bid = run_bid(&mut book, &accounts, Bid::market(1, "m", dec!(10)));

        assert!(bid.nsf);
        assert_eq!(bid.amount, dec!(10));
        assert_eq!(book.get_offer(offer).amount, dec!(8));
        assert!(book.transactions().is_empty());
    }

    #[test]
    fn test_sell_to_two_bids() {
        let mut book = VecBook::default();
        let bid0 = book.add_bid(Bid::market(1, "m", dec!(10)));
        let bid1 = book.add_bid(Bid::market(2, "m", dec!(10)));

        let offer = run_offer(&mut book, &StubAccounts::default(), Offer::market(3, "m", dec!(20)));

        assert!(!offer.is_active());
        assert!(!book.get_bid(bid0).is_active());
        assert!(!book.get_bid(bid1).is_active());
    }

    #[test]
    fn test_sell_with_no_bids_rests() {
        let mut book = VecBook::default();

        let offer = run_offer(&mut book, &StubAccounts::default(), Offer::market(3, "m", dec!(10)));

        assert!(offer.is_active());
        assert_eq!(offer.amount, dec!(10));
    }

    #[test]
    fn test_sell_takes_limit_bid_price() {
        let mut book = VecBook::default();
        let bid = book.add_bid(Bid::limit(1, "m", dec!(5), dec!(12)));

        let offer = run_offer(&mut book, &StubAccounts::default(), Offer::market(3, "m", dec!(10)));

        assert_eq!(offer.amount, dec!(5));
        assert!(!book.get_bid(bid).is_active());
        assert_eq!(book.transactions()[0].price, dec!(12));
    }
}
