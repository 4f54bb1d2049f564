//! Delivery through the Resend transactional email API.

use std::time::Duration;

use frontdesk_core::notify::Notification;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::{Error, NotifyConfig, Result};

/// Request body for `POST /emails`.
#[derive(Serialize)]
struct SendEmail<'a> {
  from:    &'a str,
  to:      [&'a str; 1],
  subject: &'a str,
  html:    &'a str,
  text:    &'a str,
}

/// Sends notifications through `POST {api_url}/emails`.
pub struct ResendMailer {
  client:   Client,
  endpoint: String,
  api_key:  SecretString,
  from:     String,
  to:       String,
}

impl std::fmt::Debug for ResendMailer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ResendMailer")
      .field("endpoint", &self.endpoint)
      .field("to", &self.to)
      .finish_non_exhaustive()
  }
}

impl ResendMailer {
  pub fn new(config: NotifyConfig) -> Result<Self> {
    let api_key = config
      .api_key
      .ok_or(Error::MissingSetting("notify.api_key"))?;
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      endpoint: format!("{}/emails", config.api_url.trim_end_matches('/')),
      api_key,
      from: config.from,
      to: config.to,
    })
  }

  pub async fn send(&self, notification: &Notification) -> Result<()> {
    let body = SendEmail {
      from:    &self.from,
      to:      [&self.to],
      subject: &notification.subject,
      html:    &notification.html,
      text:    &notification.text,
    };

    let resp = self
      .client
      .post(&self.endpoint)
      .bearer_auth(self.api_key.expose_secret())
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Api {
        status: status.as_u16(),
        body,
      });
    }

    tracing::info!(to = %self.to, subject = %notification.subject, "email sent via resend");
    Ok(())
  }
}
