use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::currency::Currency;

/// A parcel of one currency acquired at a known rate and date, tracked until
/// fully consumed. Each lot is owned by exactly one queue slot; `amount`
/// only ever decreases and stays non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub acquired: DateTime<Utc>,
    pub amount: Decimal,
    pub rate: Decimal,
}

/// Result of a single `consume` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Consumption {
    pub gain_loss: Decimal,
    /// Amount with no acquisition history, taxed at a zero cost basis.
    pub unmatched: Decimal,
}

/// One FIFO lot queue per crypto currency, oldest lot first.
#[derive(Debug, Default)]
pub struct LotLedger {
    queues: HashMap<Currency, VecDeque<Lot>>,
}

impl LotLedger {
    pub fn new() -> LotLedger {
        LotLedger {
            queues: HashMap::new(),
        }
    }

    /// Appends a freshly acquired lot to the tail of the currency's queue.
    /// A zero amount is legal and leaves the ledger untouched.
    pub fn add_lot(
        &mut self,
        currency: &Currency,
        acquired: DateTime<Utc>,
        amount: Decimal,
        rate: Decimal,
    ) {
        assert!(
            amount >= Decimal::ZERO,
            "negative lot amount {} for {}",
            amount,
            currency
        );
        if amount.is_zero() {
            return;
        }
        self.queues
            .entry(currency.clone())
            .or_insert_with(VecDeque::new)
            .push_back(Lot {
                acquired,
                amount,
                rate,
            });
    }

    /// Consumes `amount` of `currency` front-to-back, realizing
    /// `(disposal_rate - lot.rate) * taken` per lot touched.
    ///
    /// A lot larger than the remainder is shrunk in place; smaller or equal
    /// lots are drained and popped. If the queue runs out first, the
    /// remainder carries a zero cost basis and is reported as `unmatched`
    /// rather than failing the run.
    pub fn consume(
        &mut self,
        currency: &Currency,
        amount: Decimal,
        disposal_rate: Decimal,
    ) -> Consumption {
        assert!(
            amount >= Decimal::ZERO,
            "negative consumption {} for {}",
            amount,
            currency
        );
        if amount.is_zero() {
            return Consumption::default();
        }

        let queue = match self.queues.get_mut(currency) {
            Some(queue) => queue,
            None => {
                return Consumption {
                    gain_loss: disposal_rate * amount,
                    unmatched: amount,
                }
            }
        };

        let mut remaining = amount;
        let mut gain_loss = Decimal::ZERO;
        while remaining > Decimal::ZERO {
            let lot = match queue.front_mut() {
                Some(lot) => lot,
                None => {
                    return Consumption {
                        gain_loss: gain_loss + disposal_rate * remaining,
                        unmatched: remaining,
                    };
                }
            };

            if lot.amount > remaining {
                lot.amount -= remaining;
                gain_loss += (disposal_rate - lot.rate) * remaining;
                remaining = Decimal::ZERO;
            } else {
                gain_loss += (disposal_rate - lot.rate) * lot.amount;
                remaining -= lot.amount;
                queue.pop_front();
            }
        }

        Consumption {
            gain_loss,
            unmatched: Decimal::ZERO,
        }
    }

    /// Open lots of one currency, oldest first.
    pub fn lots(&self, currency: &Currency) -> impl Iterator<Item = &Lot> {
        self.queues.get(currency).into_iter().flatten()
    }

    /// Total open amount of one currency.
    pub fn balance(&self, currency: &Currency) -> Decimal {
        self.lots(currency).map(|lot| lot.amount).sum()
    }

    /// Currencies with at least one open lot, with their queues.
    pub fn open_positions(&self) -> impl Iterator<Item = (&Currency, &VecDeque<Lot>)> {
        self.queues.iter().filter(|(_, queue)| !queue.is_empty())
    }
}
