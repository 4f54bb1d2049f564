//! Administrator notifications and the [`Notifier`] trait.
//!
//! Rendering lives here so every transport sends the same text; the
//! transports themselves live in `frontdesk-notify`. Each submission kind
//! owns an HTML and a plain-text `askama` template under `templates/email/`.

use std::future::Future;

use askama::Template;

/// A rendered notification, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub subject: String,
  pub html:    String,
  pub text:    String,
}

impl Notification {
  /// Render both bodies. The HTML template escapes every value it
  /// interpolates; the text template does not.
  pub fn render(
    subject: &str,
    html: &impl Template,
    text: &impl Template,
  ) -> Result<Self, askama::Error> {
    Ok(Self {
      subject: subject.to_owned(),
      html:    html.render()?,
      text:    text.render()?,
    })
  }
}

/// A channel that delivers [`Notification`]s to the site administrator.
///
/// The recipient is fixed by the implementation's configuration.
pub trait Notifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send<'a>(
    &'a self,
    notification: &'a Notification,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
