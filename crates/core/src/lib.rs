//! # Tourdesk Core
//!
//! Core business logic for the tourdesk booking intake service.
//!
//! This crate contains the booking entity and everything that decides whether a booking is
//! acceptable and what happens to it afterwards:
//! - The canonical booking schema and its lenient (form) and strict (submission) views
//! - Submission handling: validation, best-effort webhook forwarding, recording
//! - The submission repository interface and its in-memory implementation
//! - Startup configuration
//!
//! **No API concerns**: HTTP routing and response shapes belong in `api-rest` and `api-shared`;
//! form editing state belongs in `tourdesk-form`.

pub mod config;
pub mod constants;
pub mod error;
pub mod forward;
pub mod ids;
pub mod model;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

pub use config::{RunMode, ServerConfig};
pub use error::{SubmissionError, SubmissionResult};
pub use forward::{Delivery, Forwarder, WebhookForwarder};
pub use ids::SubmissionId;
pub use model::BookingSubmission;
pub use schema::{SchemaView, BOOKING_SCHEMA};
pub use service::{Accepted, SubmissionService};
pub use store::{InMemorySubmissionStore, SubmissionRecord, SubmissionRepository};
pub use tourdesk_files::{FileMetadata, UploadedFile};
pub use validation::{validate_form, validate_submission, FieldError, ValidationErrors};
