//! SPARQL templates for position-holder lookups.

use crate::error::{Error, Result};

pub const WIKIDATA_SPARQL_URL: &str = "https://query.wikidata.org/sparql";

/// Output format requested from the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Csv,
}

impl ResponseFormat {
    pub fn param(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Csv => "csv",
        }
    }

    pub fn accept(self) -> &'static str {
        match self {
            ResponseFormat::Json => "application/sparql-results+json",
            ResponseFormat::Csv => "text/csv",
        }
    }
}

impl std::str::FromStr for ResponseFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "csv" => Ok(ResponseFormat::Csv),
            other => Err(Error::Config(format!("unknown response format '{other}'"))),
        }
    }
}

/// Accept only `Q<digits>`.
pub fn validate_qid(qid: &str) -> Result<&str> {
    let digits = qid.strip_prefix('Q').unwrap_or("");
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(qid)
    } else {
        Err(Error::InvalidEntity(qid.to_string()))
    }
}

const SELECT_COLUMNS: &str = "?ps ?item ?itemLabel ?minister ?ministerLabel ?ordinal ?start ?startprecision ?end ?endprecision";

const QUALIFIERS: &str = r#"
      OPTIONAL { ?ps pq:P1545 ?ordinal }
      OPTIONAL { ?ps pqv:P580 [wikibase:timeValue ?start ; wikibase:timePrecision ?startprecision ] }
      OPTIONAL { ?ps pqv:P582 [wikibase:timeValue ?end   ; wikibase:timePrecision ?endprecision ] }"#;

const LABELS: &str = r#"SERVICE wikibase:label { bd:serviceParam wikibase:language "en". }"#;

/// Holders of any position that is a subclass of `position`, restricted to
/// ministerial posts whose jurisdiction matches `jurisdiction` when both
/// sides declare one. Without a jurisdiction the position itself is used.
pub fn cabinet_query(position: &str, jurisdiction: Option<&str>) -> Result<String> {
    let position = validate_qid(position)?;
    let jurisdiction = validate_qid(jurisdiction.unwrap_or(position))?;
    Ok(format!(
        r#"SELECT DISTINCT {SELECT_COLUMNS} {{
  {{
    SELECT DISTINCT ?ps ?item ?minister ?ordinal ?start ?startprecision ?end ?endprecision {{
      ?item p:P39/ps:P39 wd:{position} .
      ?item p:P39 ?ps .
      ?ps ps:P39 ?minister .
      ?minister wdt:P279* wd:Q83307 .{QUALIFIERS}

      OPTIONAL {{ wd:{jurisdiction} wdt:P1001 ?legislative_jurisdiction }}
      OPTIONAL {{ ?minister wdt:P1001 ?executive_jurisdiction }}
      FILTER (!BOUND(?legislative_jurisdiction) || !BOUND(?executive_jurisdiction) || (?legislative_jurisdiction = ?executive_jurisdiction))
    }}
  }}
  {LABELS}
}}
"#
    ))
}

/// Qualifiers stored on a people run, as (property, SPARQL variable).
pub const PEOPLE_QUALIFIERS: [(&str, &str); 10] = [
    ("P102", "party"),
    ("P768", "constituency"),
    ("P2937", "term"),
    ("P2715", "election"),
    ("P642", "of"),
    ("P194", "body"),
    ("P155", "follows"),
    ("P156", "followedBy"),
    ("P1365", "replaces"),
    ("P1366", "replacedBy"),
];

/// Qualifiers read through the shared ordinal and date bindings.
pub const TIME_QUALIFIERS: [&str; 3] = ["P1545", "P580", "P582"];

/// Every position (P39) statement held by the listed people, with its
/// qualifiers and the position description. `?qualifiers` lists every
/// qualifier property present on the statement, space separated.
pub fn people_query(people: &[&str]) -> Result<String> {
    let values = people
        .iter()
        .map(|qid| validate_qid(qid).map(|qid| format!("wd:{qid}")))
        .collect::<Result<Vec<_>>>()?
        .join(" ");
    let columns = PEOPLE_QUALIFIERS
        .iter()
        .map(|(_, var)| format!("?{var}"))
        .collect::<Vec<_>>()
        .join(" ");
    let optionals: String = PEOPLE_QUALIFIERS
        .iter()
        .map(|(prop, var)| format!("\n  OPTIONAL {{ ?ps pq:{prop} ?{var} }}"))
        .collect();
    Ok(format!(
        r#"SELECT DISTINCT {SELECT_COLUMNS} ?ministerDescription {columns} ?qualifiers {{
  VALUES ?item {{ {values} }}
  ?item p:P39 ?ps .
  ?ps ps:P39 ?minister .{QUALIFIERS}{optionals}
  OPTIONAL {{
    SELECT ?ps (GROUP_CONCAT(DISTINCT STRAFTER(STR(?pq), "/prop/qualifier/"); separator=" ") AS ?qualifiers) {{
      VALUES ?item {{ {values} }}
      ?item p:P39 ?ps .
      ?ps ?pq [] .
      FILTER(STRSTARTS(STR(?pq), "http://www.wikidata.org/prop/qualifier/P"))
    }} GROUP BY ?ps
  }}
  {LABELS}
}}
"#
    ))
}

pub fn request_url(endpoint: &str, query: &str, format: ResponseFormat) -> String {
    format!(
        "{}?format={}&query={}",
        endpoint,
        format.param(),
        urlencoding::encode(query)
    )
}
