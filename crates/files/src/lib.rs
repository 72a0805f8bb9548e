//! Tourdesk attachment intake
//!
//! This crate owns everything that happens to a document between the user picking it and the
//! booking payload carrying it:
//!
//! - **Policy**: a case-insensitive extension allow-list and an optional 10 MB size ceiling,
//!   checked in that order.
//! - **Encoding**: raw bytes become a base64 `data` string alongside `filename`, `size` and
//!   `type` metadata ([`UploadedFile`]).
//! - **Slot state**: the single-file upload control ([`AttachmentSlot`]) and the drag-and-drop
//!   nesting counter ([`DragState`]).
//!
//! Binary content is never written anywhere by this crate. Callers that persist form state keep
//! only [`FileMetadata`].
//!
//! ## Example Usage
//!
//! ```
//! use tourdesk_files::{AttachmentPolicy, AttachmentSlot, ExtensionSet};
//!
//! let mut slot = AttachmentSlot::new(AttachmentPolicy::new(ExtensionSet::Basic, true));
//! slot.handle_file("itinerary.PDF", b"%PDF-1.7").unwrap();
//! assert!(slot.value().is_some());
//!
//! assert!(slot.handle_file("prices.xlsx", &[0; 4]).is_err());
//! assert!(slot.value().is_none());
//! assert!(slot.error().is_some());
//! ```

mod constants;
mod policy;
mod slot;
mod uploaded;

pub use constants::{BASIC_EXTENSIONS, MAX_FILE_SIZE_BYTES, RICH_EXTENSIONS};
pub use policy::{AttachmentPolicy, ExtensionSet};
pub use slot::{AttachmentSlot, DragState};
pub use uploaded::{FileMetadata, UploadedFile};

/// Errors that can occur while accepting an attachment
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    /// The filename was blank
    #[error("A file name is required")]
    MissingFilename,

    /// Extension is not in the allow-list for the active policy
    #[error("Invalid file type. Allowed types: {allowed}")]
    UnsupportedExtension { filename: String, allowed: String },

    /// File exceeds the size ceiling while the limit is enabled
    #[error("File size exceeds the {limit_mb} MB limit ({size} bytes)")]
    TooLarge { size: u64, limit_mb: u64 },

    /// I/O error while reading the candidate file
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for attachment operations.
pub type AttachmentResult<T> = Result<T, AttachmentError>;
