//! SQL schema for the TapNote SQLite store.
//!
//! One table per record collection; its name and primary key column come
//! from the caller. The schema version lives in `PRAGMA user_version`, and an
//! upgrade drops and recreates the collection.

use crate::{Error, Result};

/// Connection-level settings, applied on every open.
pub const CONNECTION_SETUP: &str = "
PRAGMA journal_mode = WAL;
";

/// Non-key columns of a note record.
const VALUE_COLUMNS: [&str; 4] = ["title", "text", "poster_type", "poster"];

/// Validated names of the record collection and its key column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSchema {
  table:       String,
  primary_key: String,
}

impl StoreSchema {
  pub fn new(table: &str, primary_key: &str) -> Result<Self> {
    for ident in [table, primary_key] {
      if !is_identifier(ident) {
        return Err(Error::InvalidSchema(format!("not a valid identifier: {ident:?}")));
      }
    }
    if VALUE_COLUMNS.contains(&primary_key) {
      return Err(Error::InvalidSchema(format!(
        "primary key {primary_key:?} clashes with a value column"
      )));
    }
    Ok(Self { table: table.to_owned(), primary_key: primary_key.to_owned() })
  }

  pub fn table(&self) -> &str { &self.table }

  /// Drop-and-create DDL, stamping `version` into the file header.
  pub fn upgrade_sql(&self, version: u32) -> String {
    let (t, pk) = (&self.table, &self.primary_key);
    format!(
      "DROP TABLE IF EXISTS \"{t}\";
       CREATE TABLE \"{t}\" (
           \"{pk}\"     INTEGER PRIMARY KEY,   -- milliseconds since epoch
           title        TEXT NOT NULL,
           text         TEXT NOT NULL,
           poster_type  TEXT,                  -- MIME type of poster
           poster       BLOB                   -- NULL for text-only notes
       );
       PRAGMA user_version = {version};"
    )
  }

  pub fn upsert_sql(&self) -> String {
    format!(
      "INSERT OR REPLACE INTO \"{}\" (\"{}\", title, text, poster_type, poster)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      self.table, self.primary_key
    )
  }

  pub fn delete_sql(&self) -> String {
    format!("DELETE FROM \"{}\" WHERE \"{}\" = ?1", self.table, self.primary_key)
  }

  /// Every record from key 0 upwards, newest first.
  pub fn list_sql(&self) -> String {
    let (t, pk) = (&self.table, &self.primary_key);
    format!(
      "SELECT \"{pk}\", title, text, poster_type, poster
       FROM \"{t}\"
       WHERE \"{pk}\" >= 0
       ORDER BY \"{pk}\" DESC"
    )
  }
}

fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
