//! HTTP layer for the frontdesk form backend.
//!
//! Exposes an axum [`Router`] with one `POST` route per form. Every route runs
//! the same pipeline (see [`submit`]) against any
//! [`SubmissionStore`] and [`Notifier`].

pub mod backup;
pub mod error;
pub mod handlers;
pub mod settings;
pub mod submit;

pub use error::ApiError;
pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{Router, routing::post};
use frontdesk_core::{
  ContactMessage, ReservationRequest, notify::Notifier,
  store::SubmissionStore,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use backup::BackupFiles;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// Built once at startup; the store handle lives as long as the process.
pub struct AppState<S, N> {
  pub store:    Arc<S>,
  pub notifier: Arc<N>,
  pub backups:  Arc<BackupFiles>,
}

impl<S, N> AppState<S, N> {
  pub fn new(store: Arc<S>, notifier: Arc<N>, backups: BackupFiles) -> Self {
    Self {
      store,
      notifier,
      backups: Arc::new(backups),
    }
  }
}

// Derived `Clone` would demand `S: Clone` and `N: Clone`.
impl<S, N> Clone for AppState<S, N> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      notifier: self.notifier.clone(),
      backups:  self.backups.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the form backend.
///
/// | Method | Path | Body |
/// |--------|------|------|
/// | `POST` | `/contact` | `senderName`, `senderEmail`, `body` |
/// | `POST` | `/reserva` | `name`, `email`, `date`, `time`, `zone`, `isFirstVisit` |
pub fn router<S, N>(state: AppState<S, N>) -> Router
where
  S: SubmissionStore + 'static,
  N: Notifier + 'static,
{
  Router::new()
    .route("/contact", post(handlers::submit_form::<ContactMessage, S, N>))
    .route("/reserva", post(handlers::submit_form::<ReservationRequest, S, N>))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
