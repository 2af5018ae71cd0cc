use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A currency symbol such as "BTC" or "CAD".
///
/// The symbol itself is an opaque comparable key; whether it is fiat or
/// crypto is decided by the `Taxonomy`, so new assets never require a code
/// change here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(symbol: &str) -> Currency {
        Currency(symbol.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(symbol: &str) -> Currency {
        Currency::new(symbol)
    }
}

/// Fiat/crypto classification for a set of currencies.
///
/// Fiat currencies have a fixed cost basis and are exempt from lot tracking;
/// everything not listed as fiat is treated as a crypto asset.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    fiat: HashSet<Currency>,
}

impl Taxonomy {
    pub fn new<I, S>(fiat_symbols: I) -> Taxonomy
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Taxonomy {
            fiat: fiat_symbols
                .into_iter()
                .map(|s| Currency::new(s.as_ref()))
                .collect(),
        }
    }

    pub fn is_fiat(&self, currency: &Currency) -> bool {
        self.fiat.contains(currency)
    }
}
