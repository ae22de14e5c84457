use thiserror::Error;

use crate::snapshot::SnapshotError;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarketError>;
