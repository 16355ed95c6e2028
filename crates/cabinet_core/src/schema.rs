use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One result row: column name to the bound value string.
///
/// Unbound columns are simply absent; they are never an error.
pub type ResultRow = BTreeMap<String, String>;

/// A single position-holding statement, flattened for storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Membership {
    pub id: Option<String>,          // person QID, e.g. "Q567"
    pub name: Option<String>,        // person label
    pub position_id: Option<String>, // statement id, e.g. "Q567-1a2b..."
    pub position: Option<String>,    // position QID
    pub label: Option<String>,       // position label
    pub start_date: Option<String>,  // "YYYY", "YYYY-MM" or "YYYY-MM-DD"
    pub end_date: Option<String>,
    pub ordinal: i64, // 0 when unknown
}

/// A position (P39) statement held by a person, with its qualifiers.
///
/// Qualifier fields hold the QID of the qualifier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub id: Option<String>,
    pub name: Option<String>,
    pub position_id: Option<String>,
    pub position: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub start_date: String, // empty when unknown, so the key is always bound
    pub end_date: Option<String>,
    pub ordinal: i64,
    pub party: Option<String>,        // P102
    pub constituency: Option<String>, // P768
    pub term: Option<String>,         // P2937
    pub election: Option<String>,     // P2715
    pub of: Option<String>,           // P642
    pub body: Option<String>,         // P194
    pub follows: Option<String>,      // P155
    pub followed_by: Option<String>,  // P156
    pub replaces: Option<String>,     // P1365
    pub replaced_by: Option<String>,  // P1366
}

/// `application/sparql-results+json` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    pub results: SparqlBindings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlBindings {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlCell>>,
}

/// A bound cell. `type`, `datatype` and `xml:lang` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlCell {
    pub value: String,
}

impl SparqlResults {
    /// Flatten the bindings into the row shape the mapper consumes.
    pub fn into_rows(self) -> Vec<ResultRow> {
        self.results
            .bindings
            .into_iter()
            .map(|binding| {
                binding
                    .into_iter()
                    .map(|(column, cell)| (column, cell.value))
                    .collect()
            })
            .collect()
    }
}
