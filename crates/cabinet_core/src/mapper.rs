//! Row to [`Membership`] and [`Position`] mapping.
//!
//! Every field is extracted on its own and degrades to empty when its
//! column is unbound, so a sparse row still produces a record.

use tracing::warn;

use crate::query::{PEOPLE_QUALIFIERS, TIME_QUALIFIERS};
use crate::schema::{Membership, Position, ResultRow, SparqlResults};
use crate::wikidate::Wikidate;

fn value<'a>(row: &'a ResultRow, column: &str) -> Option<&'a str> {
    row.get(column).map(String::as_str)
}

/// The part after the final `/` of a URI-shaped value.
///
/// A value ending in `/` has no segment and yields `None`, rather than the
/// empty string or the segment before the slash.
pub fn last_segment(uri: &str) -> Option<String> {
    let segment = uri.rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

/// Parse the leading integer of `raw`, returning 0 when there is none.
pub fn lenient_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let end = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed.len(), |i| sign_len + i);
    trimmed[..end].parse::<i64>().unwrap_or(0)
}

pub fn id(row: &ResultRow) -> Option<String> {
    value(row, "item").and_then(last_segment)
}

pub fn name(row: &ResultRow) -> Option<String> {
    value(row, "itemLabel").map(str::to_string)
}

pub fn position_id(row: &ResultRow) -> Option<String> {
    value(row, "ps").and_then(last_segment)
}

pub fn position(row: &ResultRow) -> Option<String> {
    value(row, "minister").and_then(last_segment)
}

pub fn label(row: &ResultRow) -> Option<String> {
    value(row, "ministerLabel").map(str::to_string)
}

pub fn ordinal(row: &ResultRow) -> i64 {
    value(row, "ordinal").map(lenient_int).unwrap_or(0)
}

pub fn start_date(row: &ResultRow) -> Option<String> {
    Wikidate::new(value(row, "start"), value(row, "startprecision")).as_string()
}

pub fn end_date(row: &ResultRow) -> Option<String> {
    Wikidate::new(value(row, "end"), value(row, "endprecision")).as_string()
}

pub fn map_row(row: &ResultRow) -> Membership {
    Membership {
        id: id(row),
        name: name(row),
        position_id: position_id(row),
        position: position(row),
        label: label(row),
        start_date: start_date(row),
        end_date: end_date(row),
        ordinal: ordinal(row),
    }
}

pub fn map_rows(rows: &[ResultRow]) -> Vec<Membership> {
    rows.iter().map(map_row).collect()
}

pub fn map_results(results: SparqlResults) -> Vec<Membership> {
    map_rows(&results.into_rows())
}

fn qualifier(row: &ResultRow, var: &str) -> Option<String> {
    value(row, var).and_then(last_segment)
}

/// Qualifier properties on the statement that no column captures.
pub fn unknown_qualifiers(row: &ResultRow) -> Vec<String> {
    value(row, "qualifiers")
        .unwrap_or("")
        .split_whitespace()
        .filter(|prop| {
            !TIME_QUALIFIERS.iter().any(|known| known == prop)
                && !PEOPLE_QUALIFIERS.iter().any(|(known, _)| known == prop)
        })
        .map(str::to_string)
        .collect()
}

pub fn map_position_row(row: &ResultRow) -> Position {
    let record = Position {
        id: id(row),
        name: name(row),
        position_id: position_id(row),
        position: position(row),
        label: label(row),
        description: value(row, "ministerDescription").map(str::to_string),
        start_date: start_date(row).unwrap_or_default(),
        end_date: end_date(row),
        ordinal: ordinal(row),
        party: qualifier(row, "party"),
        constituency: qualifier(row, "constituency"),
        term: qualifier(row, "term"),
        election: qualifier(row, "election"),
        of: qualifier(row, "of"),
        body: qualifier(row, "body"),
        follows: qualifier(row, "follows"),
        followed_by: qualifier(row, "followedBy"),
        replaces: qualifier(row, "replaces"),
        replaced_by: qualifier(row, "replacedBy"),
    };
    let unknown = unknown_qualifiers(row);
    if !unknown.is_empty() {
        warn!(
            person = record.id.as_deref().unwrap_or("?"),
            position = record.position.as_deref().unwrap_or("?"),
            unknown = %unknown.join(", "),
            "statement has unmapped qualifiers"
        );
    }
    record
}

pub fn map_position_rows(rows: &[ResultRow]) -> Vec<Position> {
    rows.iter().map(map_position_row).collect()
}
