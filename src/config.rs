use serde::{Deserialize, Serialize};

use crate::currency::Taxonomy;
use crate::error::Error;

/// Run configuration, read from a YAML file.
///
/// The fiat list is the currency taxonomy: any symbol not in it is tracked
/// as a crypto asset, so new coins never require a code change.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub fiat_currencies: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            fiat_currencies: vec![
                "CAD".to_string(),
                "USD".to_string(),
                "EUR".to_string(),
                "GBP".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Config, Error> {
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })?;
        let config = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Loads the config, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &str) -> Result<Config, Error> {
        match Config::load(path) {
            Ok(config) => Ok(config),
            Err(Error::Io { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(Config::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn taxonomy(&self) -> Taxonomy {
        Taxonomy::new(&self.fiat_currencies)
    }
}
