//! The submission-kind descriptor and the [`Submission`] trait.
//!
//! Every form the backend accepts goes through the same pipeline
//! (validate, store, back up, notify). What differs between forms is captured
//! here: the required field set, the store collection, the backup filename
//! and the notification template.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
  error::{Error, Result},
  notify::Notification,
};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The kinds of form submission the backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
  Contact,
  Reservation,
}

impl SubmissionKind {
  pub const ALL: [Self; 2] = [Self::Contact, Self::Reservation];

  /// Wire names of the fields a submission of this kind must carry.
  pub const fn required_fields(self) -> &'static [&'static str] {
    match self {
      Self::Contact => &["senderName", "senderEmail", "body"],
      Self::Reservation => {
        &["name", "email", "date", "time", "zone", "isFirstVisit"]
      }
    }
  }

  /// Name of the primary store collection records of this kind land in.
  pub const fn collection(self) -> &'static str {
    match self {
      Self::Contact => "mensajes",
      Self::Reservation => "reservas",
    }
  }

  /// Filename of the local JSON backup for this kind.
  pub const fn backup_file(self) -> &'static str {
    match self {
      Self::Contact => "mensajes.json",
      Self::Reservation => "reservaciones.json",
    }
  }

  /// Message returned to the caller once the record is stored.
  pub const fn accepted_message(self) -> &'static str {
    match self {
      Self::Contact => "Mensaje procesado con éxito (guardado en DB).",
      Self::Reservation => "Reserva procesada con éxito (guardada en DB).",
    }
  }

  pub(crate) const fn notification_subject(self) -> &'static str {
    match self {
      Self::Contact => "Nuevo mensaje de contacto",
      Self::Reservation => "Nueva reserva de entrenamiento",
    }
  }
}

impl fmt::Display for SubmissionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Contact => "contact",
      Self::Reservation => "reservation",
    })
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// An accepted, immutable form submission.
///
/// Implementors pair a loosely-typed `Form` (what arrives over the wire, every
/// field optional) with the validated record that gets persisted.
pub trait Submission: Serialize + Clone + Send + Sync + 'static {
  /// The raw request payload.
  type Form: DeserializeOwned + Send + 'static;

  const KIND: SubmissionKind;

  /// Validate `form` and build the record, stamped with `at`.
  ///
  /// Fails with [`Error::MissingFields`] naming every absent or empty field.
  fn accept(form: Self::Form, at: DateTime<Utc>) -> Result<Self>;

  /// The same record carrying a different timestamp.
  fn restamp(&self, at: DateTime<Utc>) -> Self;

  /// Render the administrator notification listing every field.
  fn notification(&self) -> std::result::Result<Notification, askama::Error>;
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Collects missing fields while a form is being unpacked, so the error names
/// all of them rather than just the first.
#[derive(Debug)]
pub(crate) struct Required {
  kind:    SubmissionKind,
  missing: Vec<&'static str>,
}

impl Required {
  pub(crate) fn new(kind: SubmissionKind) -> Self {
    Self {
      kind,
      missing: Vec::new(),
    }
  }

  fn check(&self, field: &'static str) {
    debug_assert!(
      self.kind.required_fields().contains(&field),
      "{field} is not a required {} field",
      self.kind
    );
  }

  /// Take a text field; absent and empty values are both missing.
  pub(crate) fn text(
    &mut self,
    field: &'static str,
    value: Option<String>,
  ) -> String {
    self.check(field);
    match value {
      Some(v) if !v.is_empty() => v,
      _ => {
        self.missing.push(field);
        String::new()
      }
    }
  }

  /// Take an arbitrary field, with `present` deciding whether it counts.
  pub(crate) fn value<T: Default>(
    &mut self,
    field: &'static str,
    value: Option<T>,
    present: impl FnOnce(&T) -> bool,
  ) -> T {
    self.check(field);
    match value {
      Some(v) if present(&v) => v,
      _ => {
        self.missing.push(field);
        T::default()
      }
    }
  }

  pub(crate) fn finish(self) -> Result<()> {
    if self.missing.is_empty() {
      Ok(())
    } else {
      Err(Error::MissingFields(self.missing))
    }
  }
}
