use std::io;

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::currency::Currency;
use crate::error::{Error, RejectReason, RejectedTrade};
use crate::trade::{Side, TradeRecord};

/// Raw CSV row; symbols are normalized when converted into a `TradeRecord`.
#[derive(Debug, Deserialize)]
struct RawTrade {
    timestamp: DateTime<Utc>,
    side: Side,
    major: String,
    minor: String,
    amount: Decimal,
    major_rate: Decimal,
    minor_rate: Decimal,
    local_rate: Decimal,
    fee_currency: String,
    fee_amount: Decimal,
    fee_rate: Decimal,
}

impl RawTrade {
    fn into_trade(self) -> TradeRecord {
        TradeRecord {
            timestamp: self.timestamp,
            side: self.side,
            major: Currency::new(&self.major),
            minor: Currency::new(&self.minor),
            amount: self.amount,
            major_rate: self.major_rate,
            minor_rate: self.minor_rate,
            local_rate: self.local_rate,
            fee_currency: Currency::new(&self.fee_currency),
            fee_amount: self.fee_amount,
            fee_rate: self.fee_rate,
        }
    }
}

#[derive(Debug)]
pub struct LoadedTrades {
    pub trades: Vec<TradeRecord>,
    pub rejected: Vec<RejectedTrade>,
}

pub fn load_trades(path: &str) -> Result<LoadedTrades, Error> {
    let reader = csv::Reader::from_path(path)?;
    read_trades(reader)
}

/// Reads and validates trades row by row. Malformed or invalid rows are
/// rejected individually so the valid remainder still processes.
pub fn read_trades<R: io::Read>(mut reader: csv::Reader<R>) -> Result<LoadedTrades, Error> {
    let mut trades = Vec::new();
    let mut rejected = Vec::new();

    for (i, row) in reader.deserialize::<RawTrade>().enumerate() {
        // Line 1 is the header.
        let line = (i + 2) as u64;
        match row {
            Ok(raw) => {
                let trade = raw.into_trade();
                match trade.validate() {
                    Ok(()) => trades.push(trade),
                    Err(invalid) => {
                        warn!("rejecting trade at line {}: {}", line, invalid);
                        rejected.push(RejectedTrade {
                            line,
                            reason: invalid.into(),
                        });
                    }
                }
            }
            Err(err) => {
                warn!("rejecting row at line {}: {}", line, err);
                rejected.push(RejectedTrade {
                    line,
                    reason: RejectReason::Malformed(err.to_string()),
                });
            }
        }
    }

    Ok(LoadedTrades { trades, rejected })
}
