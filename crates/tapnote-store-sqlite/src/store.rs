//! [`SqliteStore`]: the SQLite implementation of [`NoteStore`].

use std::{path::Path, sync::Arc};

use tapnote_core::{note::Note, store::NoteStore};

use crate::{
  Error, Result,
  encode::{RawNote, encode_poster},
  schema::{CONNECTION_SETUP, StoreSchema},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A note collection backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  schema: Arc<StoreSchema>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` at schema `version`.
  ///
  /// A `version` of 0 means 1. A version above the stored one recreates the
  /// collection, discarding its records.
  pub async fn open(path: impl AsRef<Path>, schema: StoreSchema, version: u32) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, schema, version).await
  }

  /// Open an in-memory store.
  pub async fn open_in_memory(schema: StoreSchema, version: u32) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, schema, version).await
  }

  async fn init(conn: tokio_rusqlite::Connection, schema: StoreSchema, version: u32) -> Result<Self> {
    if i32::try_from(version).is_err() {
      return Err(Error::VersionOutOfRange(version));
    }
    let store = Self { conn, schema: Arc::new(schema) };
    store.upgrade(version.max(1)).await?;
    Ok(store)
  }

  /// The schema version recorded in the database file.
  pub async fn version(&self) -> Result<u32> {
    let version = self
      .conn
      .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?))
      .await?;
    Ok(version)
  }

  async fn upgrade(&self, version: u32) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_SETUP)?;
        Ok(())
      })
      .await?;

    let current = self.version().await?;
    if version < current {
      return Err(Error::VersionTooLow { requested: version, current });
    }
    if version == current {
      return Ok(());
    }

    let sql = self.schema.upgrade_sql(version);
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(
      table = self.schema.table(),
      from = current,
      to = version,
      "recreated note collection"
    );
    Ok(())
  }
}

// ─── NoteStore impl ──────────────────────────────────────────────────────────

impl NoteStore for SqliteStore {
  type Error = Error;

  async fn put(&self, note: Note) -> Result<()> {
    let sql = self.schema.upsert_sql();
    let (poster_type, poster) = encode_poster(note.poster_blob.as_ref());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &sql,
          rusqlite::params![note.time_stamp, note.title, note.text, poster_type, poster],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, time_stamp: i64) -> Result<()> {
    let sql = self.schema.delete_sql();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&sql, rusqlite::params![time_stamp])?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list(&self) -> Result<Vec<Note>> {
    let sql = self.schema.list_sql();

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let rows = {
          let mut stmt = tx.prepare(&sql)?;
          stmt
            .query_map([], RawNote::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawNote::into_note).collect())
  }
}
