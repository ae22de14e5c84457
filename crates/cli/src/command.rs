use std::str::FromStr;

use economy_core::{AccountId, Bid, Offer, Price, Quantity, Symbol};
use rust_decimal::Decimal;
use thiserror::Error;

pub const HELP: &str = "
Use this CLI to experiment with the market.

Market activity is saved to a data file, so it persists across runs
until the file is deleted. Account balances live only for the session.

Commands:
help - this message
account <id> <balance> - create or update an account with the given balance
accounts - list all known accounts
offer <account> <symbol> <volume> - sell <volume> of <symbol> at the market price
offer <account> <symbol> <volume> limit <price> - sell at or above <price>
bid <account> <symbol> <volume> - buy <volume> of <symbol> at the market price
bid <account> <symbol> <volume> limit <price> - buy at or below <price>
market - last price of every known symbol
quit - leave
";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unrecognized command '{0}'")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Account ID must be an integer, got '{0}'")]
    InvalidAccount(String),
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parameters shared by `bid` and `offer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub account: AccountId,
    pub symbol: Symbol,
    pub volume: Quantity,
    /// Set for limit orders
    pub limit: Option<Price>,
}

impl OrderRequest {
    pub fn to_bid(&self) -> Bid {
        match self.limit {
            Some(price) => Bid::limit(self.account, self.symbol.clone(), self.volume, price),
            None => Bid::market(self.account, self.symbol.clone(), self.volume),
        }
    }

    pub fn to_offer(&self) -> Offer {
        match self.limit {
            Some(price) => Offer::limit(self.account, self.symbol.clone(), self.volume, price),
            None => Offer::market(self.account, self.symbol.clone(), self.volume),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Account { id: AccountId, balance: Decimal },
    Accounts,
    Offer(OrderRequest),
    Bid(OrderRequest),
    Market,
    Quit,
}

const ACCOUNT_USAGE: &str = "account <id> <balance>";
const OFFER_USAGE: &str = "offer <account> <symbol> <volume> [limit <price>]";
const BID_USAGE: &str = "bid <account> <symbol> <volume> [limit <price>]";

/// Parse one input line. Whitespace runs are collapsed and the command
/// word is case-insensitive.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = tokens.split_first() else {
        return Err(CommandError::Empty);
    };

    match head.to_lowercase().as_str() {
        "help" => Ok(Command::Help),
        "accounts" => Ok(Command::Accounts),
        "market" => Ok(Command::Market),
        "quit" | "exit" => Ok(Command::Quit),
        "account" => match args {
            [id, balance] => Ok(Command::Account {
                id: parse_account(id)?,
                balance: parse_decimal("Balance", balance)?,
            }),
            _ => Err(CommandError::Usage(ACCOUNT_USAGE)),
        },
        "offer" => parse_order(args, OFFER_USAGE).map(Command::Offer),
        "bid" => parse_order(args, BID_USAGE).map(Command::Bid),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_order(args: &[&str], usage: &'static str) -> Result<OrderRequest, CommandError> {
    let (account, symbol, volume, limit) = match args {
        [account, symbol, volume] => (account, symbol, volume, None),
        [account, symbol, volume, keyword, price] if keyword.eq_ignore_ascii_case("limit") => {
            (account, symbol, volume, Some(parse_decimal("Price", price)?))
        }
        _ => return Err(CommandError::Usage(usage)),
    };

    Ok(OrderRequest {
        account: parse_account(account)?,
        symbol: symbol.to_string(),
        volume: parse_decimal("Volume", volume)?,
        limit,
    })
}

fn parse_account(value: &str) -> Result<AccountId, CommandError> {
    AccountId::from_str(value).map_err(|_| CommandError::InvalidAccount(value.to_string()))
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(value).map_err(|_| CommandError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
