//! Router and pipeline tests.

use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use frontdesk_core::{
  ContactMessage, SubmissionKind,
  contact::ContactForm,
  notify::{Notification, Notifier},
  store::{StoredDocument, SubmissionStore},
};
use frontdesk_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AppState, ApiError,
  backup::BackupFiles,
  error::{FAILED_MSG, REJECTED_MSG},
  router,
  submit::submit,
};

// ─── Doubles ──────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("unavailable")]
struct Unavailable;

/// A store that refuses every write.
struct DownStore;

impl SubmissionStore for DownStore {
  type Error = Unavailable;

  async fn insert(&self, _: &'static str, _: Value) -> Result<Uuid, Unavailable> {
    Err(Unavailable)
  }

  async fn list(&self, _: &'static str) -> Result<Vec<StoredDocument>, Unavailable> {
    Err(Unavailable)
  }
}

/// Records every notification it is asked to send, optionally failing.
#[derive(Default)]
struct RecordingNotifier {
  sent: Mutex<Vec<Notification>>,
  fail: bool,
}

impl RecordingNotifier {
  fn failing() -> Self {
    Self {
      fail: true,
      ..Self::default()
    }
  }

  fn sent(&self) -> Vec<Notification> { self.sent.lock().unwrap().clone() }
}

impl Notifier for RecordingNotifier {
  type Error = Unavailable;

  async fn send(&self, notification: &Notification) -> Result<(), Unavailable> {
    self.sent.lock().unwrap().push(notification.clone());
    if self.fail { Err(Unavailable) } else { Ok(()) }
  }
}

// ─── Harness ──────────────────────────────────────────────────────────────────

struct Harness<S> {
  state:    AppState<S, RecordingNotifier>,
  notifier: Arc<RecordingNotifier>,
  dir:      TempDir,
}

impl<S: SubmissionStore + 'static> Harness<S> {
  fn with(store: S, notifier: RecordingNotifier) -> Self {
    let dir = TempDir::new().unwrap();
    let notifier = Arc::new(notifier);
    let state = AppState::new(
      Arc::new(store),
      notifier.clone(),
      BackupFiles::new(dir.path()),
    );
    Self { state, notifier, dir }
  }

  async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = router(self.state.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
  }

  async fn backups(&self, kind: SubmissionKind) -> Vec<Value> {
    self.state.backups.read_all(kind).await.unwrap()
  }

  /// Poll until `kind`'s backup file holds `n` records, for at most 2s.
  async fn wait_for_backups(&self, kind: SubmissionKind, n: usize) {
    for _ in 0..200 {
      if self.backups(kind).await.len() == n {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("backup never reached {n} records");
  }

  /// Poll until `n` notifications were attempted, for at most 2s.
  async fn wait_for_notifications(&self, n: usize) {
    for _ in 0..200 {
      if self.notifier.sent().len() == n {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("notifier never saw {n} sends");
  }
}

async fn sqlite_harness() -> Harness<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  Harness::with(store, RecordingNotifier::default())
}

const ANA: &str = r#"{"senderName":"Ana","senderEmail":"ana@x.com","body":"Hola"}"#;
const LUIS: &str = r#"{"name":"Luis","email":"l@x.com","date":"2024-05-01","time":"10:00","zone":"A","isFirstVisit":true}"#;

// ── Accepted ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn contact_is_stored_backed_up_and_notified() {
  let h = sqlite_harness().await;

  let (status, body) = h.post("/contact", ANA).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["msg"], SubmissionKind::Contact.accepted_message());

  let docs = h.state.store.list("mensajes").await.unwrap();
  assert_eq!(docs.len(), 1);
  let doc = &docs[0].document;
  assert_eq!(doc["senderName"], "Ana");
  assert_eq!(doc["senderEmail"], "ana@x.com");
  assert_eq!(doc["body"], "Hola");
  assert!(doc["submittedAt"].is_string());

  h.wait_for_backups(SubmissionKind::Contact, 1).await;
  h.wait_for_notifications(1).await;
  assert_eq!(h.notifier.sent()[0].subject, "Nuevo mensaje de contacto");
}

#[tokio::test]
async fn reservation_is_stored_with_all_fields() {
  let h = sqlite_harness().await;

  let (status, body) = h.post("/reserva", LUIS).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["msg"], SubmissionKind::Reservation.accepted_message());

  let docs = h.state.store.list("reservas").await.unwrap();
  assert_eq!(docs.len(), 1);
  let doc = &docs[0].document;
  for (field, value) in [
    ("name", json!("Luis")),
    ("email", json!("l@x.com")),
    ("date", json!("2024-05-01")),
    ("time", json!("10:00")),
    ("zone", json!("A")),
    ("isFirstVisit", json!(true)),
  ] {
    assert_eq!(doc[field], value, "field {field}");
  }
  assert!(doc["registeredAt"].is_string());
  assert!(h.state.store.list("mensajes").await.unwrap().is_empty());

  h.wait_for_backups(SubmissionKind::Reservation, 1).await;
  assert!(h.dir.path().join("reservaciones.json").exists());
}

#[tokio::test]
async fn extra_fields_are_not_stored() {
  let h = sqlite_harness().await;
  let body = r#"{"senderName":"Ana","senderEmail":"ana@x.com","body":"Hola","admin":true}"#;

  let (status, _) = h.post("/contact", body).await;
  assert_eq!(status, StatusCode::OK);

  let docs = h.state.store.list("mensajes").await.unwrap();
  assert!(docs[0].document.get("admin").is_none());
}

// ── Rejected ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_field_is_rejected_without_side_effects() {
  let h = sqlite_harness().await;

  let (status, body) = h
    .post("/contact", r#"{"senderName":"Ana","senderEmail":"","body":"Hola"}"#)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["msg"], REJECTED_MSG);

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(h.state.store.list("mensajes").await.unwrap().is_empty());
  assert!(h.notifier.sent().is_empty());
  assert!(!h.dir.path().join("mensajes.json").exists());
}

#[tokio::test]
async fn absent_field_is_rejected() {
  let h = sqlite_harness().await;
  let body = r#"{"name":"Luis","email":"l@x.com","date":"2024-05-01","time":"10:00","zone":"A"}"#;

  let (status, _) = h.post("/reserva", body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(h.state.store.list("reservas").await.unwrap().is_empty());
}

#[tokio::test]
async fn false_first_visit_is_rejected_without_side_effects() {
  let h = sqlite_harness().await;
  let body = r#"{"name":"Luis","email":"l@x.com","date":"2024-05-01","time":"10:00","zone":"A","isFirstVisit":false}"#;

  let (status, reply) = h.post("/reserva", body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(reply["msg"], REJECTED_MSG);

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(h.state.store.list("reservas").await.unwrap().is_empty());
  assert!(h.notifier.sent().is_empty());
  assert!(!h.dir.path().join("reservaciones.json").exists());
}

#[tokio::test]
async fn malformed_json_is_rejected() {
  let h = sqlite_harness().await;

  let (status, body) = h.post("/contact", "{ nope").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["msg"], REJECTED_MSG);

  let (status, _) = h
    .post("/contact", r#"{"senderName":7,"senderEmail":"a@x.com","body":"x"}"#)
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = h
    .post("/reserva", &LUIS.replace("true", "1"))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(h.state.store.list("reservas").await.unwrap().is_empty());
}

#[tokio::test]
async fn get_is_not_allowed() {
  let h = sqlite_harness().await;
  let req = Request::builder().uri("/contact").body(Body::empty()).unwrap();
  let resp = router(h.state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Failure domains ──────────────────────────────────────────────────────────

#[tokio::test]
async fn store_failure_returns_500() {
  let h = Harness::with(DownStore, RecordingNotifier::default());

  let (status, body) = h.post("/contact", ANA).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["msg"], FAILED_MSG);
}

#[tokio::test]
async fn store_failure_starts_no_follow_ups() {
  let h = Harness::with(DownStore, RecordingNotifier::default());
  let form = ContactForm {
    sender_name:  Some("Ana".into()),
    sender_email: Some("ana@x.com".into()),
    body:         Some("Hola".into()),
  };

  let err = submit::<ContactMessage, _, _>(&h.state, form).await.unwrap_err();
  assert!(matches!(err, ApiError::Store(_)), "{err:?}");

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(h.notifier.sent().is_empty());
  assert!(h.backups(SubmissionKind::Contact).await.is_empty());
}

#[tokio::test]
async fn backup_failure_does_not_change_response() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let dir = TempDir::new().unwrap();
  let blocker = dir.path().join("backups");
  std::fs::write(&blocker, "not a directory").unwrap();
  let notifier = Arc::new(RecordingNotifier::default());
  let state = AppState::new(
    Arc::new(store),
    notifier.clone(),
    BackupFiles::new(&blocker),
  );

  let form = ContactForm {
    sender_name:  Some("Ana".into()),
    sender_email: Some("ana@x.com".into()),
    body:         Some("Hola".into()),
  };
  let receipt = submit::<ContactMessage, _, _>(&state, form).await.unwrap();
  receipt.follow_ups.settle().await;

  assert_eq!(state.store.list("mensajes").await.unwrap().len(), 1);
  assert_eq!(notifier.sent().len(), 1);

  let req = Request::builder()
    .method("POST")
    .uri("/contact")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(ANA))
    .unwrap();
  let resp = router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn notification_failure_does_not_change_response() {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let h = Harness::with(store, RecordingNotifier::failing());

  let (status, _) = h.post("/reserva", LUIS).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(h.state.store.list("reservas").await.unwrap().len(), 1);

  h.wait_for_notifications(1).await;
  h.wait_for_backups(SubmissionKind::Reservation, 1).await;
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn receipt_id_matches_stored_document() {
  let h = sqlite_harness().await;
  let form = ContactForm {
    sender_name:  Some("Ana".into()),
    sender_email: Some("ana@x.com".into()),
    body:         Some("Hola".into()),
  };

  let receipt = submit::<ContactMessage, _, _>(&h.state, form).await.unwrap();
  let id = receipt.id;
  receipt.follow_ups.settle().await;

  let docs = h.state.store.list("mensajes").await.unwrap();
  assert_eq!(docs[0].id, id);

  let backups = h.backups(SubmissionKind::Contact).await;
  assert_eq!(backups.len(), 1);
  assert_eq!(backups[0]["senderName"], "Ana");
  assert!(backups[0]["submittedAt"].is_string());

  let sent = h.notifier.sent();
  assert_eq!(sent.len(), 1);
  assert!(sent[0].html.contains("ana@x.com"));
}

#[tokio::test]
async fn concurrent_submissions_each_get_a_record() {
  let h = sqlite_harness().await;

  let mut tasks = tokio::task::JoinSet::new();
  for n in 0..10 {
    let app = router(h.state.clone());
    tasks.spawn(async move {
      let body = format!(
        r#"{{"senderName":"n{n}","senderEmail":"n{n}@x.com","body":"hola"}}"#
      );
      let req = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
      app.oneshot(req).await.unwrap().status()
    });
  }
  while let Some(status) = tasks.join_next().await {
    assert_eq!(status.unwrap(), StatusCode::OK);
  }

  assert_eq!(h.state.store.list("mensajes").await.unwrap().len(), 10);
  h.wait_for_backups(SubmissionKind::Contact, 10).await;
}

// ── CORS ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
  let h = sqlite_harness().await;
  let req = Request::builder()
    .method("POST")
    .uri("/contact")
    .header(header::ORIGIN, "https://dynamogym.com")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(ANA))
    .unwrap();
  let resp = router(h.state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(
    resp
      .headers()
      .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
  );
}
