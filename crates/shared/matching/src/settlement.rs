use economy_core::{Bid, Offer, Price, Timestamp, Transaction};
use economy_ports::{Accounts, OrderBook};
use log::{debug, warn};

/// Outcome of one settlement step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    /// The bid as persisted after the step
    pub bid: Bid,
    /// The offer as persisted after the step
    pub offer: Offer,
    /// False if the buyer could not pay; nothing but the bid's NSF flag changed
    pub filled: bool,
}

/// Exchange `min(bid.amount, offer.amount)` between a matched pair at `price`.
///
/// The buyer is debited before the seller is credited. If the debit is
/// refused, or the total does not fit in a `Decimal`, the bid is marked NSF
/// and persisted, and the step stops there: the offer is untouched and no
/// transaction is recorded.
pub fn fill_bid(
    book: &mut dyn OrderBook,
    accounts: &dyn Accounts,
    now: Timestamp,
    mut bid: Bid,
    mut offer: Offer,
    price: Price,
) -> Fill {
    let amount = offer.amount.min(bid.amount);
    let Some(total) = amount.checked_mul(price) else {
        warn!(
            "Total overflows: bid={}, account={}, amount={}, price={}",
            bid.id, bid.account, amount, price
        );
        return refuse(book, bid, offer);
    };

    if !accounts.debit_if_possible(bid.account, total) {
        warn!(
            "Insufficient funds: bid={}, account={}, required={}",
            bid.id, bid.account, total
        );
        return refuse(book, bid, offer);
    }
    accounts.credit(offer.account, total);

    bid.amount -= amount;
    offer.amount -= amount;

    let tx_id = book.new_transaction(Transaction::new(bid.id, offer.id, price, amount, now));
    debug!(
        "Fill: tx={}, symbol={}, bid={}, offer={}, price={}, amount={}",
        tx_id, offer.symbol, bid.id, offer.id, price, amount
    );

    book.update_offer(offer.clone());
    book.update_bid(bid.clone());
    book.set_last_price(&offer.symbol, price);

    Fill {
        bid,
        offer,
        filled: true,
    }
}

fn refuse(book: &mut dyn OrderBook, mut bid: Bid, offer: Offer) -> Fill {
    bid.nsf = true;
    book.update_bid(bid.clone());
    Fill {
        bid,
        offer,
        filled: false,
    }
}
