//! Submission repository.
//!
//! Accepted submissions are kept so they can be looked up by id later. Callers depend on the
//! [`SubmissionRepository`] trait only. The shipped implementation is
//! [`InMemorySubmissionStore`], which lives for the lifetime of the process and offers no
//! durability.

use crate::{SubmissionError, SubmissionId, SubmissionResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// A stored submission: the payload exactly as accepted, plus an id and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

/// Create/get contract for accepted submissions. There is no update or delete.
pub trait SubmissionRepository: Send + Sync {
    /// Assigns an id and timestamp to `payload`, retains it and returns the record.
    fn create(&self, payload: serde_json::Value) -> SubmissionResult<SubmissionRecord>;

    /// Looks a record up by id. `Ok(None)` means not found.
    fn get(&self, id: &SubmissionId) -> SubmissionResult<Option<SubmissionRecord>>;
}

#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    records: RwLock<HashMap<SubmissionId, SubmissionRecord>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubmissionRepository for InMemorySubmissionStore {
    fn create(&self, payload: serde_json::Value) -> SubmissionResult<SubmissionRecord> {
        let record = SubmissionRecord {
            id: SubmissionId::new(),
            created_at: Utc::now(),
            payload,
        };

        self.records
            .write()
            .map_err(|_| SubmissionError::StorePoisoned)?
            .insert(record.id, record.clone());

        Ok(record)
    }

    fn get(&self, id: &SubmissionId) -> SubmissionResult<Option<SubmissionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| SubmissionError::StorePoisoned)?;
        Ok(records.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_assigns_id_and_keeps_payload() {
        let store = InMemorySubmissionStore::new();
        let payload = json!({"itinerary_language": "English", "extra": [1, 2, 3]});

        let record = store.create(payload.clone()).unwrap();

        assert_eq!(record.payload, payload);
        assert!(SubmissionId::is_canonical(&record.id.to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_returns_created_record() {
        let store = InMemorySubmissionStore::new();
        let record = store.create(json!({"a": 1})).unwrap();

        let found = store.get(&record.id).unwrap();
        assert_eq!(found, Some(record));
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let store = InMemorySubmissionStore::new();
        store.create(json!({})).unwrap();

        assert_eq!(store.get(&SubmissionId::new()).unwrap(), None);
    }

    #[test]
    fn test_records_get_distinct_ids() {
        let store = InMemorySubmissionStore::new();
        let first = store.create(json!({"n": 1})).unwrap();
        let second = store.create(json!({"n": 1})).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_record_serialises_id_as_canonical_string() {
        let store = InMemorySubmissionStore::new();
        let record = store.create(json!({"a": 1})).unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(record.id.to_string()));
        assert_eq!(value["payload"], json!({"a": 1}));
        assert!(value["created_at"].is_string());
    }
}
