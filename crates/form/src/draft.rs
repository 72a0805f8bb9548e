//! Local draft persistence.
//!
//! The form state is kept under one key in a small key-value area together with a schema
//! version and the write time. Attachment content is never stored; only its filename, size and
//! type survive, so the user can be asked to pick the file again after a restore.

use crate::FormResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tourdesk_core::{BookingSubmission, FileMetadata};

/// Bumped whenever the stored draft shape changes. Drafts with another version are dropped.
pub const DRAFT_VERSION: u32 = 1;

/// Drafts older than this are dropped on load.
pub const DRAFT_MAX_AGE_DAYS: i64 = 7;

/// Key the booking form stores its draft under.
pub const DRAFT_KEY: &str = "tourdesk-booking-draft";

/// Key-value area drafts are written to.
pub trait DraftStorage: Send + Sync {
    fn read(&self, key: &str) -> FormResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> FormResult<()>;
    fn remove(&self, key: &str) -> FormResult<()>;
}

/// Process-local storage, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryDraftStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock leaves a plain map behind; keep using it.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn read(&self, key: &str) -> FormResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> FormResult<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FormResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileDraftStorage {
    dir: PathBuf,
}

impl FileDraftStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftStorage for FileDraftStorage {
    fn read(&self, key: &str) -> FormResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> FormResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> FormResult<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// A stored draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Form values with `uploaded_file` always `null`.
    pub values: BookingSubmission,
    /// What was attached when the draft was written.
    #[serde(default)]
    pub attachment: Option<FileMetadata>,
}

impl Draft {
    /// Captures `booking`, keeping the attachment's metadata and dropping its content.
    pub fn capture(booking: &BookingSubmission, saved_at: DateTime<Utc>) -> Self {
        let mut values = booking.clone();
        let attachment = values.uploaded_file.take().map(|file| file.metadata());

        Self {
            version: DRAFT_VERSION,
            saved_at,
            values,
            attachment,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.saved_at > Duration::days(DRAFT_MAX_AGE_DAYS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    Expired,
    VersionMismatch { found: u32 },
    Unreadable,
}

/// What loading a draft produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftLoad {
    /// Nothing was stored.
    Empty,
    /// Values to put back into the form. `uploaded_file` is `None`; `reselect` names the file
    /// the user had attached, if any.
    Restored {
        values: BookingSubmission,
        saved_at: DateTime<Utc>,
        reselect: Option<FileMetadata>,
    },
    /// A draft was found and deleted without being applied.
    Discarded(DiscardReason),
}

impl DraftLoad {
    /// Messages to show the user after loading.
    pub fn notices(&self) -> Vec<String> {
        match self {
            DraftLoad::Restored {
                saved_at, reselect, ..
            } => {
                let mut notices = vec![format!(
                    "Restored your draft from {}",
                    saved_at.format("%Y-%m-%d %H:%M UTC")
                )];
                if let Some(file) = reselect {
                    notices.push(format!(
                        "Please reselect the attached file \"{}\"",
                        file.filename
                    ));
                }
                notices
            }
            DraftLoad::Empty | DraftLoad::Discarded(_) => Vec::new(),
        }
    }
}

/// Saves, loads and clears the booking draft.
///
/// Writes can be suppressed, which the form does right after a successful submission so a
/// pending autosave does not bring the cleared draft back.
pub struct DraftManager {
    storage: Arc<dyn DraftStorage>,
    key: String,
    suppressed: AtomicBool,
}

impl DraftManager {
    pub fn new(storage: Arc<dyn DraftStorage>) -> Self {
        Self::with_key(storage, DRAFT_KEY)
    }

    pub fn with_key(storage: Arc<dyn DraftStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            suppressed: AtomicBool::new(false),
        }
    }

    pub fn suppress(&self) {
        self.suppressed.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.suppressed.store(false, Ordering::SeqCst);
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst)
    }

    /// Writes a draft of `booking`. Returns `false` if writes are suppressed.
    pub fn save(&self, booking: &BookingSubmission) -> FormResult<bool> {
        self.save_at(booking, Utc::now())
    }

    pub fn save_at(&self, booking: &BookingSubmission, now: DateTime<Utc>) -> FormResult<bool> {
        if self.is_suppressed() {
            tracing::debug!("draft write suppressed");
            return Ok(false);
        }

        let draft = Draft::capture(booking, now);
        self.storage
            .write(&self.key, &serde_json::to_string(&draft)?)?;
        tracing::debug!(key = %self.key, "draft saved");
        Ok(true)
    }

    pub fn load(&self) -> FormResult<DraftLoad> {
        self.load_at(Utc::now())
    }

    /// Loads the stored draft as of `now`. Expired, mismatched and unreadable drafts are
    /// deleted.
    pub fn load_at(&self, now: DateTime<Utc>) -> FormResult<DraftLoad> {
        let Some(raw) = self.storage.read(&self.key)? else {
            return Ok(DraftLoad::Empty);
        };

        let reason = match serde_json::from_str::<Draft>(&raw) {
            Ok(draft) if draft.version != DRAFT_VERSION => DiscardReason::VersionMismatch {
                found: draft.version,
            },
            Ok(draft) if draft.is_expired(now) => DiscardReason::Expired,
            Ok(draft) => {
                return Ok(DraftLoad::Restored {
                    values: draft.values,
                    saved_at: draft.saved_at,
                    reselect: draft.attachment,
                });
            }
            Err(e) => {
                tracing::warn!("unreadable draft: {e}");
                DiscardReason::Unreadable
            }
        };

        tracing::info!(?reason, "discarding stored draft");
        self.storage.remove(&self.key)?;
        Ok(DraftLoad::Discarded(reason))
    }

    pub fn clear(&self) -> FormResult<()> {
        self.storage.remove(&self.key)
    }

    /// The raw stored draft, if any.
    pub fn peek(&self) -> FormResult<Option<Draft>> {
        match self.storage.read(&self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
