//! Error type for `frontdesk-notify`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing notify setting: {0}")]
  MissingSetting(&'static str),

  #[error("invalid email address: {0}")]
  InvalidAddress(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The email API answered with a non-success status.
  #[error("email api returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("smtp error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),

  #[error("failed to build message: {0}")]
  MessageBuild(#[from] lettre::error::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
