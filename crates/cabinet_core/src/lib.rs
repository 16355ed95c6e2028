//! Wikidata position-holder extraction: query building, fetching, mapping
//! result rows to flat membership records, and SQLite persistence.

pub mod config;
pub mod db;
pub mod error;
pub mod fetch;
pub mod mapper;
pub mod query;
pub mod schema;
pub mod wikidate;

pub use error::{Error, Result};
pub use schema::{Membership, Position, ResultRow};
