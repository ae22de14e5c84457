use std::io::Write;
use std::path::PathBuf;

use economy_core::{Bid, Offer};
use economy_market::{
    InMemoryAccounts, Market, MarketError, MemoryBook, validate_bid, validate_offer,
};
use log::{debug, info};
use rust_decimal::Decimal;

use crate::command::{Command, HELP, OrderRequest};

/// Market wired to the CLI's ledger and the snapshot file
pub struct Session<C> {
    market: Market<MemoryBook, InMemoryAccounts, C>,
    data_file: PathBuf,
}

impl<C: economy_market::Clock> Session<C> {
    pub fn new(accounts: InMemoryAccounts, clock: C, data_file: PathBuf) -> Self {
        Self {
            market: Market::new(MemoryBook::new(), accounts, clock),
            data_file,
        }
    }

    #[cfg(test)]
    pub fn market(&self) -> &Market<MemoryBook, InMemoryAccounts, C> {
        &self.market
    }

    /// Run one command, writing its report to `out`
    ///
    /// `bid` and `offer` reload the book from the data file first and save
    /// it afterwards; `market` only reloads it.
    pub fn execute<W: Write>(&self, command: Command, out: &mut W) -> Result<(), MarketError> {
        match command {
            Command::Help => write!(out, "{HELP}")?,
            Command::Account { id, balance } => {
                self.market.accounts().set_balance(id, balance);
                writeln!(out, "Account {id} now has {balance}")?;
            }
            Command::Accounts => {
                writeln!(out, "AccountID   Balance")?;
                for (id, balance) in self.market.accounts().list() {
                    writeln!(out, "{id:>9} {balance:>9}")?;
                }
            }
            Command::Bid(request) => {
                self.load()?;
                let bid = self.bid(&request)?;
                self.save()?;
                let paid: Decimal = self
                    .market
                    .transactions()
                    .iter()
                    .filter(|tx| tx.bid_id == bid.id)
                    .map(|tx| tx.notional())
                    .sum();
                write!(
                    out,
                    "Bid {} for account {}: {:?}, {} {} remaining, paid {}",
                    bid.id,
                    bid.account,
                    bid.status(),
                    bid.amount,
                    bid.symbol,
                    paid
                )?;
                if bid.status().is_terminal() {
                    write!(out, " (closed)")?;
                }
                writeln!(out)?;
            }
            Command::Offer(request) => {
                self.load()?;
                let offer = self.offer(&request)?;
                self.save()?;
                let received: Decimal = self
                    .market
                    .transactions()
                    .iter()
                    .filter(|tx| tx.offer_id == offer.id)
                    .map(|tx| tx.notional())
                    .sum();
                writeln!(
                    out,
                    "Offer {} for account {}: {:?}, {} {} remaining, received {}",
                    offer.id,
                    offer.account,
                    offer.status(),
                    offer.amount,
                    offer.symbol,
                    received
                )?;
            }
            Command::Market => {
                self.load()?;
                writeln!(out, "Symbol Last Price")?;
                for symbol in self.market.all_symbols() {
                    let price = self.market.last_price(&symbol);
                    writeln!(out, "{symbol:>6} {price:>10}")?;
                }
            }
            Command::Quit => {}
        }
        Ok(())
    }

    fn bid(&self, request: &OrderRequest) -> Result<Bid, MarketError> {
        let bid = request.to_bid();
        validate_bid(&bid)?;
        let id = self.market.bid(bid);
        Ok(self.market.get_bid(id))
    }

    fn offer(&self, request: &OrderRequest) -> Result<Offer, MarketError> {
        let offer = request.to_offer();
        validate_offer(&offer)?;
        let id = self.market.offer(offer);
        Ok(self.market.get_offer(id))
    }

    fn load(&self) -> Result<(), MarketError> {
        if self.market.load_file(&self.data_file)? {
            debug!("Loaded book from {}", self.data_file.display());
        }
        Ok(())
    }

    fn save(&self) -> Result<(), MarketError> {
        self.market.save_file(&self.data_file)?;
        info!("Saved book to {}", self.data_file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use economy_clock::SimulationClock;
    use rust_decimal_macros::dec;

    fn temp_data_file() -> PathBuf {
        std::env::temp_dir().join(format!("economy-cli-{}.data", uuid::Uuid::new_v4()))
    }

    fn run(session: &Session<SimulationClock>, line: &str) -> String {
        let mut out = Vec::new();
        session.execute(parse(line).unwrap(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_accounts_listing() {
        let session = Session::new(
            InMemoryAccounts::new(),
            SimulationClock::fixed(),
            temp_data_file(),
        );
        assert_eq!(run(&session, "account 2 50"), "Account 2 now has 50\n");
        run(&session, "account 1 10");

        let listing = run(&session, "accounts");
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "AccountID   Balance");
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["1", "10"]);
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), ["2", "50"]);
    }

    #[test]
    fn test_book_persists_between_sessions() {
        let path = temp_data_file();
        let accounts = InMemoryAccounts::new();
        accounts.set_balance(1, dec!(100));

        let first = Session::new(accounts.clone(), SimulationClock::fixed(), path.clone());
        let report = run(&first, "offer 2 wheat 10 limit 3");
        assert!(report.contains("Pending, 10 wheat remaining, received 0"));
        assert!(!report.contains("(closed)"));

        // a fresh session sees the resting offer through the data file
        let second = Session::new(accounts.clone(), SimulationClock::fixed(), path.clone());
        let report = run(&second, "bid 1 wheat 4");
        assert!(report.trim_end().ends_with("Filled, 0 wheat remaining, paid 12 (closed)"));
        assert_eq!(accounts.balance(1), dec!(88));
        assert_eq!(accounts.balance(2), dec!(12));

        let prices = run(&second, "market");
        assert!(prices.lines().any(|l| l.split_whitespace().eq(["wheat", "3"])));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_order_is_rejected_before_submission() {
        let path = temp_data_file();
        let session = Session::new(InMemoryAccounts::new(), SimulationClock::fixed(), path.clone());

        let mut out = Vec::new();
        let err = session
            .execute(parse("bid 1 wheat 0").unwrap(), &mut out)
            .unwrap_err();

        assert!(matches!(err, MarketError::InvalidOrder(_)));
        assert!(session.market().transactions().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_market_with_no_data_file() {
        let session = Session::new(
            InMemoryAccounts::new(),
            SimulationClock::fixed(),
            temp_data_file(),
        );
        assert_eq!(run(&session, "market"), "Symbol Last Price\n");
    }
}
