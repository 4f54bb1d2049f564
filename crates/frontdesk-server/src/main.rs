//! frontdesk server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `FRONTDESK_*` environment overrides, opens the SQLite document store,
//! builds the configured mail transport, and serves the form endpoints over
//! HTTP until Ctrl-C or SIGTERM.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use frontdesk_core::{SubmissionKind, store::SubmissionStore as _};
use frontdesk_notify::Mailer;
use frontdesk_server::{
  AppState, ServerConfig, backup::BackupFiles, settings::expand_tilde,
};
use frontdesk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Contact and reservation form backend")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;
  let address = server_cfg.address();

  // Open the document store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, "store opened");
  for kind in SubmissionKind::ALL {
    let records = store
      .list(kind.collection())
      .await
      .with_context(|| format!("failed to read collection {}", kind.collection()))?
      .len();
    tracing::info!(%kind, collection = kind.collection(), records, "collection loaded");
  }

  let mailer =
    Mailer::from_config(server_cfg.notify).context("invalid notify settings")?;
  tracing::info!(transport = ?mailer.transport(), "notifications configured");

  let backup_dir = expand_tilde(&server_cfg.backup_dir);
  let state = AppState::new(
    Arc::new(store.clone()),
    Arc::new(mailer),
    BackupFiles::new(backup_dir),
  );
  let app = frontdesk_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await.context("failed to close store")?;
  tracing::info!("shut down cleanly");

  Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }

  tracing::info!("shutdown signal received, draining requests");
}
