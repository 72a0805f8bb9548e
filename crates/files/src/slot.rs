//! State of the single-file upload control.

use crate::{AttachmentPolicy, AttachmentResult, UploadedFile};
use std::fs;
use std::path::Path;

/// The upload control: at most one accepted attachment, or an error message for the last
/// rejected candidate.
///
/// `generation` is bumped whenever the underlying file-selection control has to be reset
/// (after a rejection or a removal) so that selecting the same filename again registers as a
/// fresh selection.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSlot {
    policy: AttachmentPolicy,
    value: Option<UploadedFile>,
    error: Option<String>,
    generation: u64,
}

impl AttachmentSlot {
    pub fn new(policy: AttachmentPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &AttachmentPolicy {
        &self.policy
    }

    pub fn set_size_limit_enabled(&mut self, enabled: bool) {
        self.policy.set_size_limit_enabled(enabled);
    }

    pub fn value(&self) -> Option<&UploadedFile> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accepts a candidate given as a name and its bytes (browse or drop).
    ///
    /// On success the attachment replaces any previous one and the error is cleared. On failure
    /// the slot is emptied, the error message is set and the control is reset.
    pub fn handle_file(&mut self, filename: &str, bytes: &[u8]) -> AttachmentResult<()> {
        let outcome = self
            .policy
            .check(filename, bytes.len() as u64)
            .and_then(|()| UploadedFile::encode(filename, bytes));
        self.settle(outcome)
    }

    /// Accepts a candidate from disk. Name and size are validated before any bytes are read.
    pub fn handle_path(&mut self, path: &Path) -> AttachmentResult<()> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        let outcome = fs::metadata(path)
            .map_err(Into::into)
            .and_then(|meta| self.policy.check(&filename, meta.len()))
            .and_then(|()| fs::read(path).map_err(Into::into))
            .and_then(|bytes| UploadedFile::encode(&filename, &bytes));
        self.settle(outcome)
    }

    /// Clears the attachment, its metadata and any error, and resets the control.
    pub fn remove(&mut self) {
        self.value = None;
        self.error = None;
        self.generation += 1;
    }

    fn settle(&mut self, outcome: AttachmentResult<UploadedFile>) -> AttachmentResult<()> {
        match outcome {
            Ok(file) => {
                tracing::debug!(filename = %file.filename, size = file.size, "attachment accepted");
                self.value = Some(file);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::debug!("attachment rejected: {e}");
                self.value = None;
                self.error = Some(e.to_string());
                self.generation += 1;
                Err(e)
            }
        }
    }
}

/// Nesting counter for drag-enter/drag-leave events.
///
/// Child elements fire their own enter/leave pairs while the pointer moves across the drop
/// zone; counting them keeps the zone active until the pointer really leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    depth: u32,
}

impl DragState {
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn drop_files(&mut self) {
        self.depth = 0;
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }
}
