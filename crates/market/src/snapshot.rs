//! Text snapshot of a [`MemoryBook`]
//!
//! Four comma-delimited sections, each closed by a line holding only `EOF`:
//!
//! ```text
//! offers:       id,type,account,symbol,price,amount
//! prices:       symbol,price
//! bids:         id,type,account,symbol,price,amount,nsf
//! transactions: id,bid_id,offer_id,price,amount,epoch_millis
//! ```
//!
//! Order types are written as their numeric code. Fields containing a comma,
//! a quote or a line break are quoted, with inner quotes doubled.

use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::DateTime;
use economy_core::{AccountId, Bid, Offer, OrderType, OrderTypeError, Transaction};
use economy_ports::OrderBook;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::store::MemoryBook;

const SENTINEL: &str = "EOF";

const OFFERS: &str = "offers";
const PRICES: &str = "prices";
const BIDS: &str = "bids";
const TRANSACTIONS: &str = "transactions";

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed {section} record at line {line}: {reason}")]
    MalformedRecord {
        section: &'static str,
        line: usize,
        reason: String,
    },

    #[error("Line {line}: {source}")]
    UnknownOrderType {
        line: usize,
        #[source]
        source: OrderTypeError,
    },

    #[error("Invalid number '{value}' at line {line}")]
    InvalidNumber { line: usize, value: String },

    #[error("Invalid id '{value}' at line {line}")]
    InvalidId { line: usize, value: String },

    #[error("Invalid boolean '{value}' at line {line}")]
    InvalidBool { line: usize, value: String },

    #[error("Missing EOF sentinel after {section} section")]
    MissingSentinel { section: &'static str },
}

/// Write every order, price and transaction of the book
pub fn write_snapshot<W: Write>(book: &MemoryBook, mut w: W) -> Result<(), SnapshotError> {
    for offer in book.offers() {
        write_record(
            &mut w,
            &[
                offer.id.to_string(),
                offer.order_type.code().to_string(),
                offer.account.to_string(),
                offer.symbol.clone(),
                offer.price.to_string(),
                offer.amount.to_string(),
            ],
        )?;
    }
    writeln!(w, "{SENTINEL}")?;

    for (symbol, price) in book.last_prices() {
        write_record(&mut w, &[symbol, price.to_string()])?;
    }
    writeln!(w, "{SENTINEL}")?;

    for bid in book.bids() {
        write_record(
            &mut w,
            &[
                bid.id.to_string(),
                bid.order_type.code().to_string(),
                bid.account.to_string(),
                bid.symbol.clone(),
                bid.price.to_string(),
                bid.amount.to_string(),
                bid.nsf.to_string(),
            ],
        )?;
    }
    writeln!(w, "{SENTINEL}")?;

    for tx in book.transactions() {
        write_record(
            &mut w,
            &[
                tx.id.to_string(),
                tx.bid_id.to_string(),
                tx.offer_id.to_string(),
                tx.price.to_string(),
                tx.amount.to_string(),
                tx.timestamp.timestamp_millis().to_string(),
            ],
        )?;
    }
    writeln!(w, "{SENTINEL}")?;

    w.flush()?;
    Ok(())
}

/// Rebuild a book from a snapshot produced by [`write_snapshot`]
pub fn read_snapshot<R: BufRead>(r: R) -> Result<MemoryBook, SnapshotError> {
    let mut reader = RecordReader::new(r);
    let mut book = MemoryBook::new();

    for offer in reader.section(OFFERS, 6, parse_offer)? {
        book.restore_offer(offer);
    }
    for (symbol, price) in reader.section(PRICES, 2, parse_price)? {
        book.set_last_price(&symbol, price);
    }
    for bid in reader.section(BIDS, 7, parse_bid)? {
        book.restore_bid(bid);
    }
    for tx in reader.section(TRANSACTIONS, 6, parse_transaction)? {
        book.restore_transaction(tx);
    }

    Ok(book)
}

fn write_record<W: Write>(w: &mut W, fields: &[String]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(w, "{line}")
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one record into fields. None if a quoted field is still open.
fn split_record(record: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match (in_quotes, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            (true, '"') => in_quotes = false,
            (true, c) => field.push(c),
            (false, '"') if field.is_empty() => in_quotes = true,
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (false, c) => field.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field);
    Some(fields)
}

struct RecordReader<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> RecordReader<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    /// Next physical line without its `\n`; a `\r` before it is kept
    fn next_line(&mut self) -> Result<Option<String>, SnapshotError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        if line.ends_with('\n') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Read records up to the section sentinel, parsing each one
    fn section<T>(
        &mut self,
        section: &'static str,
        width: usize,
        parse: impl Fn(usize, &[String]) -> Result<T, SnapshotError>,
    ) -> Result<Vec<T>, SnapshotError> {
        let mut items = Vec::new();
        loop {
            let Some(mut record) = self.next_line()? else {
                return Err(SnapshotError::MissingSentinel { section });
            };
            if record.strip_suffix('\r').unwrap_or(&record) == SENTINEL {
                return Ok(items);
            }

            let start = self.line;
            let fields = loop {
                // a trailing \r outside quotes is a CRLF line ending
                let complete = record.strip_suffix('\r').unwrap_or(&record);
                if let Some(fields) = split_record(complete) {
                    break fields;
                }
                // quoted line break, keep reading
                match self.next_line()? {
                    Some(next) => {
                        record.push('\n');
                        record.push_str(&next);
                    }
                    None => {
                        return Err(SnapshotError::MalformedRecord {
                            section,
                            line: start,
                            reason: "unterminated quoted field".to_string(),
                        });
                    }
                }
            };

            if fields.len() != width {
                return Err(SnapshotError::MalformedRecord {
                    section,
                    line: start,
                    reason: format!("expected {width} fields, found {}", fields.len()),
                });
            }
            items.push(parse(start, &fields)?);
        }
    }
}

fn parse_offer(line: usize, f: &[String]) -> Result<Offer, SnapshotError> {
    Ok(Offer {
        id: parse_id(line, &f[0])?,
        order_type: parse_order_type(line, &f[1])?,
        account: parse_account(line, &f[2])?,
        symbol: f[3].clone(),
        price: parse_decimal(line, &f[4])?,
        amount: parse_decimal(line, &f[5])?,
    })
}

fn parse_price(line: usize, f: &[String]) -> Result<(String, Decimal), SnapshotError> {
    Ok((f[0].clone(), parse_decimal(line, &f[1])?))
}

fn parse_bid(line: usize, f: &[String]) -> Result<Bid, SnapshotError> {
    Ok(Bid {
        id: parse_id(line, &f[0])?,
        order_type: parse_order_type(line, &f[1])?,
        account: parse_account(line, &f[2])?,
        symbol: f[3].clone(),
        price: parse_decimal(line, &f[4])?,
        amount: parse_decimal(line, &f[5])?,
        nsf: parse_bool(line, &f[6])?,
    })
}

fn parse_transaction(line: usize, f: &[String]) -> Result<Transaction, SnapshotError> {
    let millis = i64::from_str(&f[5]).map_err(|_| invalid_number(line, &f[5]))?;
    let timestamp =
        DateTime::from_timestamp_millis(millis).ok_or_else(|| invalid_number(line, &f[5]))?;
    Ok(Transaction {
        id: parse_id(line, &f[0])?,
        bid_id: parse_id(line, &f[1])?,
        offer_id: parse_id(line, &f[2])?,
        price: parse_decimal(line, &f[3])?,
        amount: parse_decimal(line, &f[4])?,
        timestamp,
    })
}

fn parse_id(line: usize, value: &str) -> Result<Uuid, SnapshotError> {
    Uuid::parse_str(value).map_err(|_| SnapshotError::InvalidId {
        line,
        value: value.to_string(),
    })
}

fn parse_order_type(line: usize, value: &str) -> Result<OrderType, SnapshotError> {
    let code = u8::from_str(value).map_err(|_| invalid_number(line, value))?;
    OrderType::try_from(code).map_err(|source| SnapshotError::UnknownOrderType { line, source })
}

fn parse_account(line: usize, value: &str) -> Result<AccountId, SnapshotError> {
    AccountId::from_str(value).map_err(|_| invalid_number(line, value))
}

fn parse_decimal(line: usize, value: &str) -> Result<Decimal, SnapshotError> {
    Decimal::from_str(value).map_err(|_| invalid_number(line, value))
}

fn parse_bool(line: usize, value: &str) -> Result<bool, SnapshotError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SnapshotError::InvalidBool {
            line,
            value: value.to_string(),
        }),
    }
}

fn invalid_number(line: usize, value: &str) -> SnapshotError {
    SnapshotError::InvalidNumber {
        line,
        value: value.to_string(),
    }
}
