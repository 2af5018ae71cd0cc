use std::io;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::Currency;
use crate::error::Error;
use crate::ledger::LotLedger;
use crate::trade::{AnnotatedTrade, Side};

#[derive(Debug, Serialize)]
struct GainLossRow<'a> {
    timestamp: DateTime<Utc>,
    side: Side,
    major: &'a Currency,
    minor: &'a Currency,
    amount: Decimal,
    major_rate: Decimal,
    minor_rate: Decimal,
    local_rate: Decimal,
    fee_currency: &'a Currency,
    fee_amount: Decimal,
    fee_rate: Decimal,
    gain_loss: Decimal,
}

/// The annotated trades of one run, rendered to CSV in processing order.
pub struct CapitalGainsReport {
    records: Vec<AnnotatedTrade>,
}

impl CapitalGainsReport {
    pub fn new(records: Vec<AnnotatedTrade>) -> CapitalGainsReport {
        CapitalGainsReport { records }
    }

    pub fn records(&self) -> &[AnnotatedTrade] {
        &self.records
    }

    pub fn total_gain_loss(&self) -> Decimal {
        self.records.iter().map(|r| r.gain_loss).sum()
    }

    pub fn write_to_file(&self, path: &str) -> Result<(), Error> {
        self.write(csv::Writer::from_path(path)?)
    }

    pub fn write<W: io::Write>(&self, mut writer: csv::Writer<W>) -> Result<(), Error> {
        for record in self.records.iter() {
            let trade = &record.trade;
            writer.serialize(GainLossRow {
                timestamp: trade.timestamp,
                side: trade.side,
                major: &trade.major,
                minor: &trade.minor,
                amount: trade.amount,
                major_rate: trade.major_rate,
                minor_rate: trade.minor_rate,
                local_rate: trade.local_rate,
                fee_currency: &trade.fee_currency,
                fee_amount: trade.fee_amount,
                fee_rate: trade.fee_rate,
                gain_loss: record.gain_loss,
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct OpenLotRow<'a> {
    currency: &'a Currency,
    acquired: DateTime<Utc>,
    amount: Decimal,
    rate: Decimal,
}

/// The lots left open after a run, to carry into the next accounting period.
/// Currencies are sorted so reruns write identical files.
pub struct OpenLotsReport<'a> {
    ledger: &'a LotLedger,
}

impl<'a> OpenLotsReport<'a> {
    pub fn new(ledger: &'a LotLedger) -> OpenLotsReport<'a> {
        OpenLotsReport { ledger }
    }

    pub fn write_to_file(&self, path: &str) -> Result<(), Error> {
        self.write(csv::Writer::from_path(path)?)
    }

    pub fn write<W: io::Write>(&self, mut writer: csv::Writer<W>) -> Result<(), Error> {
        let mut positions: Vec<_> = self.ledger.open_positions().collect();
        positions.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (currency, lots) in positions {
            for lot in lots {
                writer.serialize(OpenLotRow {
                    currency,
                    acquired: lot.acquired,
                    amount: lot.amount,
                    rate: lot.rate,
                })?;
            }
        }
        Ok(())
    }
}
