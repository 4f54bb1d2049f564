//! The `SubmissionStore` trait: the system of record.
//!
//! Implemented by storage backends (e.g. `frontdesk-store-sqlite`). The
//! submission pipeline depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document as persisted in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
  /// Opaque store-assigned key.
  pub id:         Uuid,
  pub collection: String,
  pub stored_at:  DateTime<Utc>,
  pub document:   serde_json::Value,
}

/// Abstraction over a document store backend.
///
/// Collections are append-only: documents are inserted and listed, never
/// updated or deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SubmissionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `document` into `collection` and return its assigned key.
  fn insert(
    &self,
    collection: &'static str,
    document: serde_json::Value,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// All documents in `collection`, in insertion order.
  fn list(
    &self,
    collection: &'static str,
  ) -> impl Future<Output = Result<Vec<StoredDocument>, Self::Error>> + Send + '_;
}
