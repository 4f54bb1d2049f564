//! Email transports for frontdesk notifications.
//!
//! Two transports are available: the Resend transactional HTTP API and a
//! plain SMTP relay. A process uses exactly one, chosen by
//! [`NotifyConfig::transport`] and wrapped in [`Mailer`].

pub mod config;
pub mod error;
pub mod resend;
pub mod smtp;

pub use config::{NotifyConfig, Transport};
pub use error::{Error, Result};

use frontdesk_core::notify::{Notification, Notifier};

use crate::{resend::ResendMailer, smtp::SmtpMailer};

/// The configured email transport.
pub enum Mailer {
  Resend(ResendMailer),
  Smtp(SmtpMailer),
}

impl Mailer {
  /// Build the transport named by `config.transport`.
  ///
  /// Fails if a setting that transport needs is missing or malformed. No
  /// network traffic happens here.
  pub fn from_config(config: NotifyConfig) -> Result<Self> {
    match config.transport {
      Transport::Resend => ResendMailer::new(config).map(Self::Resend),
      Transport::Smtp => SmtpMailer::new(config).map(Self::Smtp),
    }
  }

  pub fn transport(&self) -> Transport {
    match self {
      Self::Resend(_) => Transport::Resend,
      Self::Smtp(_) => Transport::Smtp,
    }
  }
}

impl Notifier for Mailer {
  type Error = Error;

  async fn send(&self, notification: &Notification) -> Result<()> {
    match self {
      Self::Resend(m) => m.send(notification).await,
      Self::Smtp(m) => m.send(notification).await,
    }
  }
}
