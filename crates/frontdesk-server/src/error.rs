//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Only two outcomes ever reach the caller: the submission was unacceptable
//! (400) or the primary store could not take it (500). Internal detail stays
//! in the logs.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::handlers::Reply;

pub const REJECTED_MSG: &str = "Todos los campos son obligatorios.";
pub const FAILED_MSG: &str = "Hubo un error al procesar la solicitud.";

/// An error returned by a submission handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] frontdesk_core::Error),

  #[error("malformed body: {0}")]
  Malformed(#[from] JsonRejection),

  #[error("could not encode record: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
      ApiError::Encode(_) | ApiError::Store(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let msg = if status.is_client_error() {
      REJECTED_MSG
    } else {
      FAILED_MSG
    };
    (status, Json(Reply { msg })).into_response()
  }
}
