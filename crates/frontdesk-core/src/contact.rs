//! Contact-form messages.

use askama::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::Result,
  notify::Notification,
  submission::{Required, Submission, SubmissionKind},
};

/// `POST /contact` payload as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
  pub sender_name:  Option<String>,
  pub sender_email: Option<String>,
  pub body:         Option<String>,
}

/// A message left through the website's contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
  pub sender_name:  String,
  pub sender_email: String,
  pub body:         String,
  pub submitted_at: DateTime<Utc>,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmailHtml<'a> {
  msg: &'a ContactMessage,
}

#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactEmailText<'a> {
  msg: &'a ContactMessage,
}

impl Submission for ContactMessage {
  type Form = ContactForm;

  const KIND: SubmissionKind = SubmissionKind::Contact;

  fn accept(form: ContactForm, at: DateTime<Utc>) -> Result<Self> {
    let mut req = Required::new(Self::KIND);
    let sender_name = req.text("senderName", form.sender_name);
    let sender_email = req.text("senderEmail", form.sender_email);
    let body = req.text("body", form.body);
    req.finish()?;

    Ok(Self {
      sender_name,
      sender_email,
      body,
      submitted_at: at,
    })
  }

  fn restamp(&self, at: DateTime<Utc>) -> Self {
    Self {
      submitted_at: at,
      ..self.clone()
    }
  }

  fn notification(&self) -> std::result::Result<Notification, askama::Error> {
    Notification::render(
      Self::KIND.notification_subject(),
      &ContactEmailHtml { msg: self },
      &ContactEmailText { msg: self },
    )
  }
}
