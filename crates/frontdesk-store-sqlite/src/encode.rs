//! Conversions between domain values and their SQLite column encodings.

use chrono::{DateTime, Utc};
use frontdesk_core::store::StoredDocument;
use uuid::Uuid;

use crate::{Error, Result};

pub(crate) fn encode_uuid(id: Uuid) -> String { id.to_string() }

pub(crate) fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub(crate) fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// A `documents` row with every column still in its stored text form.
pub(crate) struct RawDocument {
  pub document_id: String,
  pub collection:  String,
  pub stored_at:   String,
  pub body_json:   String,
}

impl RawDocument {
  pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      document_id: row.get(0)?,
      collection:  row.get(1)?,
      stored_at:   row.get(2)?,
      body_json:   row.get(3)?,
    })
  }

  pub(crate) fn decode(self) -> Result<StoredDocument> {
    Ok(StoredDocument {
      id:         Uuid::parse_str(&self.document_id)?,
      collection: self.collection,
      stored_at:  decode_dt(&self.stored_at)?,
      document:   serde_json::from_str(&self.body_json)?,
    })
  }
}
