use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::Currency;

/// Failures on the binary surface: config, input and report I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("config: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Reasons a single trade is rejected at ingestion, before sorting, so one
/// malformed trade cannot corrupt ledger ordering for the rest.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidTrade {
    #[error("amount {amount} is negative")]
    NegativeAmount { amount: Decimal },
    #[error("fee amount {amount} is negative")]
    NegativeFee { amount: Decimal },
    #[error("major and minor are both {currency}")]
    SamePair { currency: Currency },
}

#[derive(Debug, Error)]
pub enum RejectReason {
    #[error("malformed row: {0}")]
    Malformed(String),
    #[error(transparent)]
    Invalid(#[from] InvalidTrade),
}

/// A trade dropped at ingestion, with the CSV line it came from.
#[derive(Debug)]
pub struct RejectedTrade {
    pub line: u64,
    pub reason: RejectReason,
}

/// A disposal found no acquisition history left for its currency.
///
/// The unmatched remainder was taxed at a zero cost basis and processing
/// continued; the warning is kept so reporting can flag the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct DataGap {
    pub currency: Currency,
    pub missing_amount: Decimal,
    pub disposal_rate: Decimal,
    pub timestamp: DateTime<Utc>,
}
