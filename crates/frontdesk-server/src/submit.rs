//! The submission pipeline: validate, store, then back up and notify.
//!
//! The primary store is the only hard failure domain. Once the record is
//! stored, the backup write and the notification run as two detached tasks
//! whose outcomes are only logged; nothing they do can change the response.

use std::sync::Arc;

use chrono::Utc;
use frontdesk_core::{Submission, notify::Notifier, store::SubmissionStore};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{AppState, backup::BackupFiles, error::ApiError};

/// Proof that a submission reached the primary store.
#[derive(Debug)]
pub struct Receipt {
  /// Store-assigned key of the new record.
  pub id:         Uuid,
  pub follow_ups: FollowUps,
}

/// Handles for the best-effort backup and notification tasks.
///
/// Dropping this detaches both tasks; they still run to completion.
#[derive(Debug)]
pub struct FollowUps {
  pub backup: JoinHandle<()>,
  pub notify: JoinHandle<()>,
}

#[cfg(test)]
impl FollowUps {
  /// Wait for both tasks. Their outcomes have already been logged.
  pub async fn settle(self) {
    let (backup, notify) = tokio::join!(self.backup, self.notify);
    for (task, res) in [("backup", backup), ("notify", notify)] {
      if let Err(e) = res {
        tracing::error!(task, error = %e, "follow-up task did not complete");
      }
    }
  }
}

/// Run one submission through the pipeline.
///
/// Returns once the primary store write has finished. Fails with
/// [`ApiError::Validation`] before any side effect if a field is missing, and
/// with [`ApiError::Store`] if the store write fails, in which case neither
/// follow-up is started.
pub async fn submit<T, S, N>(
  state: &AppState<S, N>,
  form: T::Form,
) -> Result<Receipt, ApiError>
where
  T: Submission,
  S: SubmissionStore,
  N: Notifier + 'static,
{
  let kind = T::KIND;
  let record = T::accept(form, Utc::now()).inspect_err(|e| {
    tracing::info!(%kind, error = %e, "submission rejected");
  })?;
  tracing::info!(%kind, "submission received");

  let document = serde_json::to_value(&record)?;
  let id = state
    .store
    .insert(kind.collection(), document)
    .await
    .map_err(|e| {
      tracing::error!(%kind, error = %e, "primary store write failed");
      ApiError::Store(Box::new(e))
    })?;
  tracing::info!(%kind, %id, collection = kind.collection(), "submission stored");

  let backup = tokio::spawn(run_backup(
    state.backups.clone(),
    record.restamp(Utc::now()),
  ));
  let notify = tokio::spawn(run_notify(state.notifier.clone(), record));

  Ok(Receipt {
    id,
    follow_ups: FollowUps { backup, notify },
  })
}

async fn run_backup<T: Submission>(backups: Arc<BackupFiles>, record: T) {
  match backups.append(&record).await {
    Ok(path) => tracing::info!(kind = %T::KIND, path = %path.display(), "backup written"),
    Err(e) => tracing::warn!(kind = %T::KIND, error = %e, "backup write failed"),
  }
}

async fn run_notify<T: Submission, N: Notifier>(notifier: Arc<N>, record: T) {
  let notification = match record.notification() {
    Ok(notification) => notification,
    Err(e) => {
      tracing::error!(kind = %T::KIND, error = %e, "notification could not be rendered");
      return;
    }
  };
  match notifier.send(&notification).await {
    Ok(()) => tracing::info!(subject = %notification.subject, "notification sent"),
    Err(e) => {
      tracing::error!(subject = %notification.subject, error = %e, "notification failed");
    }
  }
}
