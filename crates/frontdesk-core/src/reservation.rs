//! Training-session reservations.

use std::fmt;

use askama::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::Result,
  notify::Notification,
  submission::{Required, Submission, SubmissionKind},
};

/// Answer to "is this your first visit?".
///
/// The booking form has sent both a checkbox boolean and a free-text answer
/// over time; both are stored as received. Only truthy answers are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FirstVisit {
  Flag(bool),
  Answer(String),
}

impl FirstVisit {
  /// `false` and the empty string are both unanswered.
  fn is_answered(&self) -> bool {
    match self {
      Self::Flag(b) => *b,
      Self::Answer(s) => !s.is_empty(),
    }
  }
}

impl Default for FirstVisit {
  fn default() -> Self { Self::Answer(String::new()) }
}

impl fmt::Display for FirstVisit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Flag(b) => write!(f, "{b}"),
      Self::Answer(s) => f.write_str(s),
    }
  }
}

/// `POST /reserva` payload as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
  pub name:           Option<String>,
  pub email:          Option<String>,
  pub date:           Option<String>,
  pub time:           Option<String>,
  pub zone:           Option<String>,
  pub is_first_visit: Option<FirstVisit>,
}

/// A request to book a training slot.
///
/// `date` and `time` are kept as the strings the form sent; the backend does
/// not interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
  pub name:           String,
  pub email:          String,
  pub date:           String,
  pub time:           String,
  pub zone:           String,
  pub is_first_visit: FirstVisit,
  pub registered_at:  DateTime<Utc>,
}

#[derive(Template)]
#[template(path = "email/reservation.html")]
struct ReservationEmailHtml<'a> {
  req: &'a ReservationRequest,
}

#[derive(Template)]
#[template(path = "email/reservation.txt")]
struct ReservationEmailText<'a> {
  req: &'a ReservationRequest,
}

impl Submission for ReservationRequest {
  type Form = ReservationForm;

  const KIND: SubmissionKind = SubmissionKind::Reservation;

  fn accept(form: ReservationForm, at: DateTime<Utc>) -> Result<Self> {
    let mut req = Required::new(Self::KIND);
    let name = req.text("name", form.name);
    let email = req.text("email", form.email);
    let date = req.text("date", form.date);
    let time = req.text("time", form.time);
    let zone = req.text("zone", form.zone);
    let is_first_visit =
      req.value("isFirstVisit", form.is_first_visit, FirstVisit::is_answered);
    req.finish()?;

    Ok(Self {
      name,
      email,
      date,
      time,
      zone,
      is_first_visit,
      registered_at: at,
    })
  }

  fn restamp(&self, at: DateTime<Utc>) -> Self {
    Self {
      registered_at: at,
      ..self.clone()
    }
  }

  fn notification(&self) -> std::result::Result<Notification, askama::Error> {
    Notification::render(
      Self::KIND.notification_subject(),
      &ReservationEmailHtml { req: self },
      &ReservationEmailText { req: self },
    )
  }
}
