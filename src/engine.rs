use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;

use crate::currency::{Currency, Taxonomy};
use crate::error::DataGap;
use crate::ledger::LotLedger;
use crate::trade::{AnnotatedTrade, Side, TradeRecord};

/// Runs a batch of trades against a FIFO lot ledger and annotates each trade
/// with its realized gain/loss.
///
/// One engine owns one ledger; independent accounting runs each build their
/// own engine.
pub struct Engine<'a> {
    taxonomy: &'a Taxonomy,
    ledger: LotLedger,
    warnings: Vec<DataGap>,
}

impl<'a> Engine<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Engine<'a> {
        Engine {
            taxonomy,
            ledger: LotLedger::new(),
            warnings: Vec::new(),
        }
    }

    /// Sorts the trades chronologically and processes each in turn.
    ///
    /// The sort is stable, so trades sharing a timestamp keep their input
    /// order and reruns are deterministic. FIFO accounting depends on this
    /// ordering: acquisitions must reach the ledger before the disposals
    /// that consume them.
    pub fn process_all(&mut self, mut trades: Vec<TradeRecord>) -> Vec<AnnotatedTrade> {
        trades.sort_by_key(|trade| trade.timestamp);
        trades.into_iter().map(|trade| self.process(trade)).collect()
    }

    fn process(&mut self, trade: TradeRecord) -> AnnotatedTrade {
        let mut gain_loss = Decimal::ZERO;

        match trade.side {
            // A buy creates a lot of `major`; paying with crypto `minor`
            // is itself a disposal of that minor.
            Side::Buy => {
                if !self.taxonomy.is_fiat(&trade.major) {
                    self.ledger.add_lot(
                        &trade.major,
                        trade.timestamp,
                        trade.amount,
                        trade.major_rate,
                    );
                }
                if !self.taxonomy.is_fiat(&trade.minor) {
                    gain_loss += self.dispose(
                        &trade.minor,
                        trade.amount * trade.local_rate,
                        trade.minor_rate,
                        trade.timestamp,
                    );
                }
            }
            // A sell disposes of `major`; receiving crypto `minor`
            // simultaneously acquires a lot of it.
            Side::Sell => {
                if !self.taxonomy.is_fiat(&trade.major) {
                    gain_loss += self.dispose(
                        &trade.major,
                        trade.amount,
                        trade.major_rate,
                        trade.timestamp,
                    );
                }
                if !self.taxonomy.is_fiat(&trade.minor) {
                    self.ledger.add_lot(
                        &trade.minor,
                        trade.timestamp,
                        trade.amount * trade.local_rate,
                        trade.minor_rate,
                    );
                }
            }
        }

        // A crypto fee is a disposal of its own. It settles after the
        // primary leg, so when both draw on the same currency the primary
        // disposal takes the older lots.
        if !self.taxonomy.is_fiat(&trade.fee_currency) {
            gain_loss += self.dispose(
                &trade.fee_currency,
                trade.fee_amount,
                trade.fee_rate,
                trade.timestamp,
            );
        }

        AnnotatedTrade { trade, gain_loss }
    }

    fn dispose(
        &mut self,
        currency: &Currency,
        amount: Decimal,
        rate: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Decimal {
        let consumption = self.ledger.consume(currency, amount, rate);
        if consumption.unmatched > Decimal::ZERO {
            warn!(
                "no acquisition history for {} {} sold at {}; assuming a zero cost basis (fork or airdrop?)",
                consumption.unmatched, currency, rate
            );
            self.warnings.push(DataGap {
                currency: currency.clone(),
                missing_amount: consumption.unmatched,
                disposal_rate: rate,
                timestamp,
            });
        }
        consumption.gain_loss
    }

    /// Ledger state after the trades processed so far; the remaining lots
    /// are the open positions to carry into the next period.
    pub fn ledger(&self) -> &LotLedger {
        &self.ledger
    }

    /// Data-quality warnings collected while processing.
    pub fn warnings(&self) -> &[DataGap] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, d, 0, 0, 0).unwrap()
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(vec!["CAD", "USD"])
    }

    fn buy(day_of_month: u32, major: &str, minor: &str, amount: &str, major_rate: &str) -> TradeRecord {
        TradeRecord {
            timestamp: day(day_of_month),
            side: Side::Buy,
            major: Currency::new(major),
            minor: Currency::new(minor),
            amount: dec(amount),
            major_rate: dec(major_rate),
            minor_rate: Decimal::ONE,
            local_rate: dec(major_rate),
            fee_currency: Currency::new("CAD"),
            fee_amount: Decimal::ZERO,
            fee_rate: Decimal::ONE,
        }
    }

    fn sell(day_of_month: u32, major: &str, minor: &str, amount: &str, major_rate: &str) -> TradeRecord {
        let mut trade = buy(day_of_month, major, minor, amount, major_rate);
        trade.side = Side::Sell;
        trade
    }

    #[test]
    fn buy_then_sell_realizes_fifo_gain() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![
            buy(1, "BTC", "CAD", "0.5", "100"),
            sell(30, "BTC", "CAD", "0.4", "4000"),
        ]);

        assert_eq!(annotated[0].gain_loss, Decimal::ZERO);
        assert_eq!(annotated[1].gain_loss, dec("1560.00"));

        let lots: Vec<_> = engine.ledger().lots(&Currency::new("BTC")).collect();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].amount, dec("0.1"));
        assert_eq!(lots[0].rate, dec("100"));
        assert!(engine.warnings().is_empty());
    }

    #[test]
    fn input_order_does_not_matter_chronology_does() {
        let taxonomy = taxonomy();
        let trades = vec![
            sell(30, "BTC", "CAD", "0.4", "4000"),
            buy(1, "BTC", "CAD", "0.5", "100"),
        ];

        let mut engine = Engine::new(&taxonomy);
        let annotated = engine.process_all(trades);

        // The buy is processed first despite arriving second.
        assert_eq!(annotated[0].trade.side, Side::Buy);
        assert_eq!(annotated[1].gain_loss, dec("1560.00"));
        assert!(engine.warnings().is_empty());
    }

    #[test]
    fn buy_paid_with_crypto_disposes_the_minor() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![
            buy(1, "ETH", "CAD", "10", "20"),
            {
                // 1 BTC acquired for 5 ETH, ETH now worth 30 each.
                let mut trade = buy(2, "BTC", "ETH", "1", "150");
                trade.local_rate = dec("5");
                trade.minor_rate = dec("30");
                trade
            },
        ]);

        assert_eq!(annotated[1].gain_loss, dec("50"));
        assert_eq!(engine.ledger().balance(&Currency::new("ETH")), dec("5"));
        assert_eq!(engine.ledger().balance(&Currency::new("BTC")), dec("1"));
    }

    #[test]
    fn sell_for_crypto_acquires_the_minor() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        engine.process_all(vec![
            buy(1, "BTC", "CAD", "1", "100"),
            {
                // Sell 0.5 BTC for 10 ETH at 40 each.
                let mut trade = sell(2, "BTC", "ETH", "0.5", "800");
                trade.local_rate = dec("20");
                trade.minor_rate = dec("40");
                trade
            },
        ]);

        let lots: Vec<_> = engine.ledger().lots(&Currency::new("ETH")).collect();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].amount, dec("10.0"));
        assert_eq!(lots[0].rate, dec("40"));
    }

    #[test]
    fn crypto_fee_adds_to_the_primary_gain() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![
            buy(1, "ETH", "CAD", "10", "20"),
            {
                // Fiat-funded buy, so the fee disposal is the only gain.
                let mut trade = buy(2, "BTC", "CAD", "1", "30000");
                trade.fee_currency = Currency::new("ETH");
                trade.fee_amount = dec("2");
                trade.fee_rate = dec("25");
                trade
            },
        ]);

        assert_eq!(annotated[1].gain_loss, dec("10"));
        assert_eq!(engine.ledger().balance(&Currency::new("ETH")), dec("8"));
    }

    #[test]
    fn fee_in_the_sold_currency_settles_after_the_primary_leg() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![
            buy(1, "BTC", "CAD", "1", "100"),
            buy(2, "BTC", "CAD", "1", "200"),
            {
                // The sale drains the day-1 lot; the fee must then draw on
                // the day-2 lot.
                let mut trade = sell(3, "BTC", "CAD", "1", "500");
                trade.fee_currency = Currency::new("BTC");
                trade.fee_amount = dec("0.1");
                trade.fee_rate = dec("500");
                trade
            },
        ]);

        // Primary: (500 - 100) * 1. Fee: (500 - 200) * 0.1.
        assert_eq!(annotated[2].gain_loss, dec("430.0"));
        assert_eq!(engine.ledger().balance(&Currency::new("BTC")), dec("0.9"));
    }

    #[test]
    fn fiat_for_fiat_never_touches_the_ledger() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![sell(1, "USD", "CAD", "100", "1.3")]);

        assert_eq!(annotated[0].gain_loss, Decimal::ZERO);
        assert_eq!(engine.ledger().open_positions().count(), 0);
        assert!(engine.warnings().is_empty());
    }

    #[test]
    fn zero_amount_trade_is_an_identity() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![sell(1, "BTC", "CAD", "0", "4000")]);

        assert_eq!(annotated[0].gain_loss, Decimal::ZERO);
        assert_eq!(engine.ledger().open_positions().count(), 0);
        assert!(engine.warnings().is_empty());
    }

    #[test]
    fn selling_without_history_warns_and_continues() {
        let taxonomy = taxonomy();
        let mut engine = Engine::new(&taxonomy);

        let annotated = engine.process_all(vec![sell(1, "XVG", "CAD", "1.0", "50")]);

        assert_eq!(annotated[0].gain_loss, dec("50.0"));
        assert_eq!(engine.warnings().len(), 1);
        let gap = &engine.warnings()[0];
        assert_eq!(gap.currency, Currency::new("XVG"));
        assert_eq!(gap.missing_amount, dec("1.0"));
        assert_eq!(gap.disposal_rate, dec("50"));
        assert_eq!(gap.timestamp, day(1));
    }
}
