//! [`SqliteStore`] — the SQLite implementation of [`SubmissionStore`].

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use frontdesk_core::store::{StoredDocument, SubmissionStore};

use crate::{
  encode::{RawDocument, encode_dt, encode_uuid},
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection, surfacing any error from the final
  /// flush. Other clones of this store fail from then on.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::debug!("sqlite store closed");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SubmissionStore impl ────────────────────────────────────────────────────

impl SubmissionStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(
    &self,
    collection: &'static str,
    document: serde_json::Value,
  ) -> Result<Uuid> {
    let id = Uuid::new_v4();

    let id_str    = encode_uuid(id);
    let at_str    = encode_dt(Utc::now());
    let body_json = serde_json::to_string(&document)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (document_id, collection, stored_at, body_json)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, collection, at_str, body_json],
        )?;
        Ok(())
      })
      .await?;

    Ok(id)
  }

  async fn list(&self, collection: &'static str) -> Result<Vec<StoredDocument>> {
    let rows: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT document_id, collection, stored_at, body_json
             FROM documents
            WHERE collection = ?1
            ORDER BY seq",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(RawDocument::decode).collect()
  }
}
