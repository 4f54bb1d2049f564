//! Local JSON backup files, one per submission kind.
//!
//! Each file is a pretty-printed JSON array of records. Appending reads the
//! whole array, pushes one record and rewrites the file. Appends to the same
//! file are serialised within the process; other processes writing the same
//! directory can still lose updates.

use std::{
  io,
  path::{Path, PathBuf},
};

use frontdesk_core::{Submission, SubmissionKind};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum BackupError {
  #[error("failed to read {}: {source}", .path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", .path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("failed to encode backup: {0}")]
  Encode(#[from] serde_json::Error),
}

/// The backup directory and its per-file locks.
#[derive(Debug)]
pub struct BackupFiles {
  dir:         PathBuf,
  contact:     Mutex<()>,
  reservation: Mutex<()>,
}

impl BackupFiles {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self {
      dir:         dir.into(),
      contact:     Mutex::new(()),
      reservation: Mutex::new(()),
    }
  }

  pub fn path(&self, kind: SubmissionKind) -> PathBuf {
    self.dir.join(kind.backup_file())
  }

  fn lock(&self, kind: SubmissionKind) -> &Mutex<()> {
    match kind {
      SubmissionKind::Contact => &self.contact,
      SubmissionKind::Reservation => &self.reservation,
    }
  }

  /// Append `record` to its kind's backup file and return the file's path.
  ///
  /// A missing or unparsable file is treated as an empty array, so a corrupt
  /// backup is replaced by one holding just this record.
  pub async fn append<T: Submission>(
    &self,
    record: &T,
  ) -> Result<PathBuf, BackupError> {
    let path = self.path(T::KIND);
    let entry = serde_json::to_value(record)?;

    let _guard = self.lock(T::KIND).lock().await;
    let mut entries = read_entries(&path).await?;
    entries.push(entry);
    let bytes = serde_json::to_vec_pretty(&entries)?;

    tokio::fs::create_dir_all(&self.dir)
      .await
      .map_err(|source| BackupError::Write {
        path: self.dir.clone(),
        source,
      })?;
    tokio::fs::write(&path, bytes)
      .await
      .map_err(|source| BackupError::Write {
        path: path.clone(),
        source,
      })?;
    Ok(path)
  }

  /// Every record in `kind`'s backup file, oldest first.
  #[cfg(test)]
  pub async fn read_all(
    &self,
    kind: SubmissionKind,
  ) -> Result<Vec<Value>, BackupError> {
    let _guard = self.lock(kind).lock().await;
    read_entries(&self.path(kind)).await
  }
}

async fn read_entries(path: &Path) -> Result<Vec<Value>, BackupError> {
  let bytes = match tokio::fs::read(path).await {
    Ok(bytes) => bytes,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(source) => {
      return Err(BackupError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };
  if bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(Vec::new());
  }
  match serde_json::from_slice(&bytes) {
    Ok(entries) => Ok(entries),
    Err(e) => {
      tracing::warn!(path = %path.display(), error = %e, "backup file unparsable, starting a new array");
      Ok(Vec::new())
    }
  }
}
