//! Error types for `frontdesk-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// One or more required form fields were absent or empty.
  #[error("missing required fields: {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
