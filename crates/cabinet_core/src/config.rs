use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::query::{ResponseFormat, WIKIDATA_SPARQL_URL};

const DEFAULT_USER_AGENT: &str = "cabinet-scraper/0.1 (Wikidata position holders)";

/// Run settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub database: String,
    pub table: String,
    pub format: ResponseFormat,
    /// People per query in the `people` run.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: WIKIDATA_SPARQL_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 60,
            database: "data.sqlite".to_string(),
            table: "data".to_string(),
            format: ResponseFormat::Json,
            batch_size: 50,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config_str = fs::read_to_string(path)?;
        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(config_str).map_err(|e| Error::Config(e.to_string()))?;
        if config.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        Ok(config)
    }
}
