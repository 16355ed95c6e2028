use crate::error::{Error, Result};
use crate::schema::{Membership, Position};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, Row};
use tracing::info;

pub fn open(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(conn)
}

/// A flat record stored one per table row.
pub trait Record: Sized {
    /// Column names and SQL declarations, in storage order.
    const COLUMNS: &'static [(&'static str, &'static str)];

    /// Bound values, in `COLUMNS` order.
    fn values(&self) -> Vec<&dyn ToSql>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Record for Membership {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "TEXT"),
        ("name", "TEXT"),
        ("position_id", "TEXT"),
        ("position", "TEXT"),
        ("label", "TEXT"),
        ("start_date", "TEXT"),
        ("end_date", "TEXT"),
        ("ordinal", "INTEGER NOT NULL DEFAULT 0"),
    ];

    fn values(&self) -> Vec<&dyn ToSql> {
        params![
            self.id,
            self.name,
            self.position_id,
            self.position,
            self.label,
            self.start_date,
            self.end_date,
            self.ordinal
        ]
        .to_vec()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Membership {
            id: row.get(0)?,
            name: row.get(1)?,
            position_id: row.get(2)?,
            position: row.get(3)?,
            label: row.get(4)?,
            start_date: row.get(5)?,
            end_date: row.get(6)?,
            ordinal: row.get(7)?,
        })
    }
}

impl Record for Position {
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("id", "TEXT"),
        ("name", "TEXT"),
        ("position_id", "TEXT"),
        ("position", "TEXT"),
        ("label", "TEXT"),
        ("description", "TEXT"),
        ("start_date", "TEXT NOT NULL DEFAULT ''"),
        ("end_date", "TEXT"),
        ("ordinal", "INTEGER NOT NULL DEFAULT 0"),
        ("party", "TEXT"),
        ("constituency", "TEXT"),
        ("term", "TEXT"),
        ("election", "TEXT"),
        ("of", "TEXT"),
        ("body", "TEXT"),
        ("follows", "TEXT"),
        ("followed_by", "TEXT"),
        ("replaces", "TEXT"),
        ("replaced_by", "TEXT"),
    ];

    fn values(&self) -> Vec<&dyn ToSql> {
        params![
            self.id,
            self.name,
            self.position_id,
            self.position,
            self.label,
            self.description,
            self.start_date,
            self.end_date,
            self.ordinal,
            self.party,
            self.constituency,
            self.term,
            self.election,
            self.of,
            self.body,
            self.follows,
            self.followed_by,
            self.replaces,
            self.replaced_by
        ]
        .to_vec()
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Position {
            id: row.get(0)?,
            name: row.get(1)?,
            position_id: row.get(2)?,
            position: row.get(3)?,
            label: row.get(4)?,
            description: row.get(5)?,
            start_date: row.get(6)?,
            end_date: row.get(7)?,
            ordinal: row.get(8)?,
            party: row.get(9)?,
            constituency: row.get(10)?,
            term: row.get(11)?,
            election: row.get(12)?,
            of: row.get(13)?,
            body: row.get(14)?,
            follows: row.get(15)?,
            followed_by: row.get(16)?,
            replaces: row.get(17)?,
            replaced_by: row.get(18)?,
        })
    }
}

fn check_identifier(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

fn column_list<R: Record>() -> String {
    R::COLUMNS
        .iter()
        .map(|(name, _)| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drop `table`, recreate it with a unique index over `key_fields`, and
/// store `rows`. Rows sharing a key overwrite earlier ones.
pub fn replace_table<R: Record>(
    conn: &mut Connection,
    table: &str,
    key_fields: &[&str],
    rows: &[R],
) -> Result<()> {
    let table = check_identifier(table)?;
    if key_fields.is_empty() {
        return Err(Error::InvalidIdentifier("no key fields given".into()));
    }
    for field in key_fields {
        if !R::COLUMNS.iter().any(|(name, _)| name == field) {
            return Err(Error::InvalidIdentifier(format!(
                "{field} is not a column of {table}"
            )));
        }
    }

    let columns = R::COLUMNS
        .iter()
        .map(|(name, decl)| format!("\"{name}\" {decl}"))
        .collect::<Vec<_>>()
        .join(",\n          ");
    let keys = key_fields
        .iter()
        .map(|field| format!("\"{field}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=R::COLUMNS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        r#"
        DROP TABLE IF EXISTS "{table}";

        CREATE TABLE "{table}" (
          {columns}
        );

        CREATE UNIQUE INDEX "{table}_key" ON "{table}" ({keys});
        "#
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            r#"INSERT OR REPLACE INTO "{table}" ({}) VALUES ({placeholders})"#,
            column_list::<R>()
        ))?;
        for record in rows {
            stmt.execute(record.values().as_slice())?;
        }
    }
    tx.commit()?;

    info!(table, rows = rows.len(), keys = ?key_fields, "saved records");
    Ok(())
}

pub fn load_table<R: Record>(conn: &Connection, table: &str) -> Result<Vec<R>> {
    let table = check_identifier(table)?;
    let mut stmt = conn.prepare(&format!(
        r#"SELECT {} FROM "{table}" ORDER BY rowid"#,
        column_list::<R>()
    ))?;

    let rows = stmt.query_map([], |row| R::from_row(row))?;

    let mut records = Vec::new();
    for r in rows {
        records.push(r?);
    }
    Ok(records)
}
