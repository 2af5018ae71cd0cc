use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::error::InvalidTrade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

/// One transaction as supplied by the loader.
///
/// For a `Buy`, `major` is acquired using `minor`; for a `Sell`, `major` is
/// disposed of in exchange for `minor`. `major_rate`, `minor_rate` and
/// `fee_rate` are fiat-equivalent unit prices at trade time; `local_rate`
/// converts an amount of `major` into the equivalent amount of `minor`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub side: Side,
    pub major: Currency,
    pub minor: Currency,
    pub amount: Decimal,
    pub major_rate: Decimal,
    pub minor_rate: Decimal,
    pub local_rate: Decimal,
    pub fee_currency: Currency,
    pub fee_amount: Decimal,
    pub fee_rate: Decimal,
}

impl TradeRecord {
    /// Rejects trades that would corrupt the ledger if processed.
    pub fn validate(&self) -> Result<(), InvalidTrade> {
        if self.major == self.minor {
            return Err(InvalidTrade::SamePair {
                currency: self.major.clone(),
            });
        }
        if self.amount < Decimal::ZERO {
            return Err(InvalidTrade::NegativeAmount {
                amount: self.amount,
            });
        }
        if self.fee_amount < Decimal::ZERO {
            return Err(InvalidTrade::NegativeFee {
                amount: self.fee_amount,
            });
        }
        Ok(())
    }
}

/// A `TradeRecord` with its realized gain/loss.
///
/// `gain_loss` accumulates the primary leg and, when the fee was paid in a
/// crypto currency, the fee disposal of the same trade.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTrade {
    pub trade: TradeRecord,
    pub gain_loss: Decimal,
}
