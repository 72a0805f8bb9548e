//! # Tourdesk Form
//!
//! Headless model of the booking form. Everything a front-end calls lives here:
//! - Editable include/exclude/special-terms lists with positional labels
//! - `{{placeholder}}` segmentation of special-terms templates
//! - Lenient coercion of numeric text input
//! - Local draft autosave (debounced) and restore
//! - The submit cycle against the REST endpoint
//!
//! Validation is not duplicated here: the form validates through the same schema as the
//! endpoint (`tourdesk_core::validate_submission`).

pub mod autosave;
pub mod client;
pub mod draft;
pub mod inputs;
pub mod lists;
pub mod placeholder;
pub mod session;

pub use autosave::Autosaver;
pub use client::SubmissionClient;
pub use draft::{
    DiscardReason, Draft, DraftLoad, DraftManager, DraftStorage, FileDraftStorage,
    MemoryDraftStorage,
};
pub use lists::{EditableList, PresetPolicy};
pub use placeholder::Segment;
pub use session::{FormSession, ListKind};

use tourdesk_core::{FieldError, SubmissionError};
use tourdesk_files::AttachmentError;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Item cannot be empty")]
    BlankItem,
    #[error("no item at index {0}")]
    NoSuchItem(usize),
    #[error("item {0} is a preset and cannot be changed")]
    PresetLocked(usize),
    #[error("{0} must contain at least 1 item")]
    LastItem(String),
    #[error("no placeholder at position {0}")]
    NoSuchPlaceholder(usize),
    #[error("a submission is already in progress")]
    SubmitInProgress,
    #[error("{0}")]
    Invalid(FieldError),
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("draft storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("failed to serialise form state: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("request to the submission endpoint failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("submission endpoint answered {status} with an unreadable body")]
    UnexpectedResponse { status: u16 },
}

pub type FormResult<T> = std::result::Result<T, FormError>;
