//! Debounced background autosave.

use crate::DraftManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tourdesk_core::BookingSubmission;

/// Quiet period after the last change before a draft is written.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// Background task that writes a draft once changes stop arriving for the debounce delay.
///
/// Every [`schedule`](Self::schedule) restarts the timer, so a burst of edits produces one
/// write with the last state. Dropping the `Autosaver` (or calling
/// [`shutdown`](Self::shutdown)) flushes a pending change.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<BookingSubmission>,
    handle: JoinHandle<()>,
}

impl Autosaver {
    /// Spawns the task on the current tokio runtime.
    pub fn spawn(drafts: Arc<DraftManager>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(drafts, delay, rx));
        Self { tx, handle }
    }

    /// Records a change. Ignored if the task has already stopped.
    pub fn schedule(&self, booking: BookingSubmission) {
        if self.tx.send(booking).is_err() {
            tracing::debug!("autosave task stopped; change not scheduled");
        }
    }

    /// Stops the task after writing any pending change.
    pub async fn shutdown(self) {
        let Self { tx, handle } = self;
        drop(tx);
        if let Err(e) = handle.await {
            tracing::warn!("autosave task failed: {e}");
        }
    }
}

async fn run(
    drafts: Arc<DraftManager>,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<BookingSubmission>,
) {
    let mut pending: Option<BookingSubmission> = None;

    loop {
        match pending.take() {
            None => match rx.recv().await {
                Some(booking) => pending = Some(booking),
                None => break,
            },
            Some(booking) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => {
                            write(&drafts, &booking);
                            break;
                        }
                    },
                    _ = tokio::time::sleep(delay) => write(&drafts, &booking),
                }
            }
        }
    }
}

fn write(drafts: &DraftManager, booking: &BookingSubmission) {
    if let Err(e) = drafts.save(booking) {
        tracing::warn!("autosave failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DraftLoad, DraftStorage, FormResult, MemoryDraftStorage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryDraftStorage,
        writes: AtomicUsize,
    }

    impl DraftStorage for CountingStorage {
        fn read(&self, key: &str) -> FormResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> FormResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.write(key, value)
        }

        fn remove(&self, key: &str) -> FormResult<()> {
            self.inner.remove(key)
        }
    }

    fn booking(language: &str) -> BookingSubmission {
        BookingSubmission {
            itinerary_language: language.to_string(),
            ..BookingSubmission::default()
        }
    }

    fn setup() -> (Arc<CountingStorage>, Arc<DraftManager>) {
        let storage = Arc::new(CountingStorage::default());
        let drafts = Arc::new(DraftManager::new(storage.clone()));
        (storage, drafts)
    }

    fn stored_language(drafts: &DraftManager) -> Option<String> {
        match drafts.load().unwrap() {
            DraftLoad::Restored { values, .. } => Some(values.itinerary_language),
            _ => None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_changes_writes_once() {
        let (storage, drafts) = setup();
        let autosaver = Autosaver::spawn(drafts.clone(), AUTOSAVE_DELAY);

        for language in ["E", "En", "Eng"] {
            autosaver.schedule(booking(language));
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
        assert_eq!(stored_language(&drafts).as_deref(), Some("Eng"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_written_before_quiet_period() {
        let (storage, drafts) = setup();
        let autosaver = Autosaver::spawn(drafts, AUTOSAVE_DELAY);

        autosaver.schedule(booking("English"));
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending_change() {
        let (storage, drafts) = setup();
        let autosaver = Autosaver::spawn(drafts.clone(), AUTOSAVE_DELAY);

        autosaver.schedule(booking("Chinese"));
        autosaver.shutdown().await;

        assert_eq!(storage.writes.load(Ordering::SeqCst), 1);
        assert_eq!(stored_language(&drafts).as_deref(), Some("Chinese"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_suppressed_drafts_are_not_written() {
        let (storage, drafts) = setup();
        let autosaver = Autosaver::spawn(drafts.clone(), AUTOSAVE_DELAY);

        autosaver.schedule(booking("English"));
        drafts.suppress();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }
}
