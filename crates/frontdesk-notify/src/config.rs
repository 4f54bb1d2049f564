//! Notification settings, deserialised from the `[notify]` config table.

use secrecy::SecretString;
use serde::Deserialize;

/// Which email transport delivers notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
  #[default]
  Resend,
  Smtp,
}

#[derive(Debug, Deserialize)]
pub struct NotifyConfig {
  #[serde(default)]
  pub transport:     Transport,
  /// Sender mailbox, e.g. `Dynamo Gym <no-reply@dynamogym.com>`.
  #[serde(default = "default_from")]
  pub from:          String,
  /// The fixed administrator address every notification goes to.
  #[serde(default = "default_to")]
  pub to:            String,

  // Resend
  pub api_key:       Option<SecretString>,
  #[serde(default = "default_api_url")]
  pub api_url:       String,

  // SMTP
  pub smtp_host:     Option<String>,
  #[serde(default = "default_smtp_port")]
  pub smtp_port:     u16,
  pub smtp_username: Option<String>,
  pub smtp_password: Option<SecretString>,
}

impl Default for NotifyConfig {
  fn default() -> Self {
    Self {
      transport:     Transport::default(),
      from:          default_from(),
      to:            default_to(),
      api_key:       None,
      api_url:       default_api_url(),
      smtp_host:     None,
      smtp_port:     default_smtp_port(),
      smtp_username: None,
      smtp_password: None,
    }
  }
}

fn default_from() -> String { "Dynamo Gym <no-reply@dynamogym.com>".to_owned() }

fn default_to() -> String { "dynamogym501@gmail.com".to_owned() }

fn default_api_url() -> String { "https://api.resend.com".to_owned() }

fn default_smtp_port() -> u16 { 587 }
