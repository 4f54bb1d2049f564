//! Delivery through an SMTP relay.

use frontdesk_core::notify::Notification;
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Mailbox, MultiPart, SinglePart, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;

use crate::{Error, NotifyConfig, Result};

/// Sends notifications as multipart (text + HTML) mail over STARTTLS.
pub struct SmtpMailer {
  mailer: AsyncSmtpTransport<Tokio1Executor>,
  from:   Mailbox,
  to:     Mailbox,
}

impl SmtpMailer {
  /// Build the transport. The relay is not contacted until the first send.
  ///
  /// The connection pool needs a Tokio runtime when it is dropped, so the
  /// mailer must be built and dropped inside one.
  pub fn new(config: NotifyConfig) -> Result<Self> {
    let host = config
      .smtp_host
      .ok_or(Error::MissingSetting("notify.smtp_host"))?;
    let from = parse_mailbox(&config.from)?;
    let to = parse_mailbox(&config.to)?;

    let mut builder =
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
        .port(config.smtp_port);
    if let Some(username) = config.smtp_username {
      let password = config
        .smtp_password
        .ok_or(Error::MissingSetting("notify.smtp_password"))?;
      builder = builder.credentials(Credentials::new(
        username,
        password.expose_secret().to_owned(),
      ));
    }

    Ok(Self {
      mailer: builder.build(),
      from,
      to,
    })
  }

  pub async fn send(&self, notification: &Notification) -> Result<()> {
    let email = compose(self.from.clone(), self.to.clone(), notification)?;
    self.mailer.send(email).await?;
    tracing::info!(to = %self.to, subject = %notification.subject, "email sent via smtp");
    Ok(())
  }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
  address
    .parse()
    .map_err(|_| Error::InvalidAddress(address.to_owned()))
}

/// Build a multipart/alternative message carrying both renderings.
fn compose(
  from: Mailbox,
  to: Mailbox,
  notification: &Notification,
) -> Result<Message> {
  let message = Message::builder()
    .from(from)
    .to(to)
    .subject(&notification.subject)
    .multipart(
      MultiPart::alternative()
        .singlepart(
          SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(notification.text.clone()),
        )
        .singlepart(
          SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(notification.html.clone()),
        ),
    )?;
  Ok(message)
}
