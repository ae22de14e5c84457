use economy_core::{Bid, Offer, Price};
use economy_ports::OrderBook;
use log::debug;

use crate::processor::{MatchContext, OrderProcessor};

/// Trade price for a limit bid with ceiling `limit` against an offer asking `ask`.
///
/// With `market` at or above the ask, trade at the market price clamped to
/// the ceiling; with the market below the ask, trade at the ask.
/// Callers must have checked `ask <= limit`.
pub fn limit_bid_trade_price(market: Price, ask: Price, limit: Price) -> Price {
    if market >= ask { market.min(limit) } else { ask }
}

/// Trade price for a limit offer with floor `floor` against a bid worth `bid`.
///
/// Mirror image of [`limit_bid_trade_price`]: with `market` at or below the
/// bid, trade at the market price raised to the floor; with the market
/// above the bid, trade at the bid. Callers must have checked `bid >= floor`.
pub fn limit_offer_trade_price(market: Price, bid: Price, floor: Price) -> Price {
    if market <= bid { market.max(floor) } else { bid }
}

/// Processor for limit orders
///
/// A limit bid trades only at or below its price, a limit offer only at or
/// above it. When valued by the other side, a limit order is worth its own
/// stated price.
#[derive(Debug, Default, Clone, Copy)]
pub struct LimitOrderProcessor;

impl LimitOrderProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl OrderProcessor for LimitOrderProcessor {
    fn name(&self) -> &str {
        "Limit"
    }

    fn try_fill_bid(&self, ctx: &mut MatchContext<'_>, mut bid: Bid) {
        while bid.is_active() {
            let Some(offer) = ctx.book.best_offer(&bid.symbol) else {
                return;
            };
            let ask = ctx.asking_price(&offer);
            if ask > bid.price {
                debug!(
                    "Limit bid {} rests: best ask {} above limit {}",
                    bid.id, ask, bid.price
                );
                return;
            }
            let price = limit_bid_trade_price(ctx.last_price(&bid.symbol), ask, bid.price);
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
                return;
            };
            let bid_price = ctx.bid_price(&bid);
            if bid_price < offer.price {
                debug!(
                    "Limit offer {} rests: best bid {} below limit {}",
                    offer.id, bid_price, offer.price
                );
                return;
            }
            let price =
                limit_offer_trade_price(ctx.last_price(&offer.symbol), bid_price, offer.price);
            let fill = ctx.settle(bid, offer, price);
            offer = fill.offer;
            if !fill.filled {
                return;
            }
        }
    }

    fn asking_price(&self, _book: &dyn OrderBook, offer: &Offer) -> Price {
        offer.price
    }

    fn bid_price(&self, _book: &dyn OrderBook, bid: &Bid) -> Price {
        bid.price
    }
}
