//! HTTP access to the SPARQL endpoint and response decoding.
//!
//! JSON and CSV responses both decode to [`ResultRow`]s so the mapper only
//! ever sees one shape.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::query::{request_url, ResponseFormat};
use crate::schema::{ResultRow, SparqlResults};

pub struct SparqlClient {
    client: Client,
    endpoint: String,
}

impl SparqlClient {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.endpoint,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Run `query` and decode every row. The body is read in full first.
    pub fn fetch(&self, query: &str, format: ResponseFormat) -> Result<Vec<ResultRow>> {
        let url = request_url(&self.endpoint, query, format);
        debug!(endpoint = %self.endpoint, format = format.param(), "sending SPARQL query");
        trace!(%query);

        let transport = |message: String| Error::Transport {
            query: query.to_string(),
            message,
        };
        let body = self
            .client
            .get(&url)
            .header(ACCEPT, format.accept())
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| transport(e.to_string()))?;
        trace!(bytes = body.len(), "received SPARQL response");

        let rows = match format {
            ResponseFormat::Json => parse_json(&body)?,
            ResponseFormat::Csv => parse_csv(&body)?,
        };
        debug!(rows = rows.len(), "decoded SPARQL response");
        Ok(rows)
    }
}

pub fn parse_json(body: &str) -> Result<Vec<ResultRow>> {
    let results: SparqlResults =
        serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))?;
    Ok(results.into_rows())
}

/// Header names become column names; empty cells are unbound.
pub fn parse_csv(body: &str) -> Result<Vec<ResultRow>> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| Error::Decode(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::Decode(e.to_string()))?;
        let row: ResultRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(column, cell)| (column.to_string(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
