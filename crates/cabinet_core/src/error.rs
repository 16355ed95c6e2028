use std::io;

use thiserror::Error;

/// Failures surfaced by the fetch and persistence layers.
///
/// Sparse data is not represented here: missing columns, unparsable
/// ordinals and unknown date precisions all degrade to empty values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Wikidata query {query} failed: {message}")]
    Transport { query: String, message: String },
    #[error("could not decode SPARQL response: {0}")]
    Decode(String),
    #[error("'{0}' is not a Wikidata entity id")]
    InvalidEntity(String),
    #[error("invalid SQL identifier: {0}")]
    InvalidIdentifier(String),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
