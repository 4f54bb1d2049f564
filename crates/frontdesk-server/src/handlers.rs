//! Route handlers.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use frontdesk_core::{Submission, notify::Notifier, store::SubmissionStore};
use serde::Serialize;

use crate::{AppState, error::ApiError, submit::submit};

/// Body of every response: `{"msg": "..."}`.
#[derive(Debug, Serialize)]
pub struct Reply {
  pub msg: &'static str,
}

/// `POST /contact`, `POST /reserva`
///
/// Answers as soon as the record is in the primary store. The backup and
/// notification tasks keep running after the response is sent.
pub async fn submit_form<T, S, N>(
  State(state): State<AppState<S, N>>,
  payload: Result<Json<T::Form>, JsonRejection>,
) -> Result<Json<Reply>, ApiError>
where
  T: Submission,
  S: SubmissionStore + 'static,
  N: Notifier + 'static,
{
  let Json(form) = payload.inspect_err(|e| {
    tracing::info!(kind = %T::KIND, error = %e, "unreadable submission body");
  })?;

  // Dropping the receipt detaches the follow-up tasks.
  let _receipt = submit::<T, S, N>(&state, form).await?;

  Ok(Json(Reply {
    msg: T::KIND.accepted_message(),
  }))
}
