//! Core types and trait definitions for the frontdesk form backend.
//!
//! This crate is deliberately free of HTTP, database and mail dependencies.
//! The store and notifier backends implement the traits defined here; the
//! server crate wires them together.

pub mod contact;
pub mod error;
pub mod notify;
pub mod reservation;
pub mod store;
pub mod submission;

pub use contact::ContactMessage;
pub use error::{Error, Result};
pub use reservation::ReservationRequest;
pub use submission::{Submission, SubmissionKind};
