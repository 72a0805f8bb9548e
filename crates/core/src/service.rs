//! Submission handling: validate, forward, record.

use crate::forward::{Delivery, Forwarder, WebhookForwarder};
use crate::store::{InMemorySubmissionStore, SubmissionRecord, SubmissionRepository};
use crate::validation::validate_submission;
use crate::{ServerConfig, SubmissionId, SubmissionResult};
use std::sync::Arc;

/// Result of a successful submission. `delivery` says whether the webhook got a copy.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub record: SubmissionRecord,
    pub delivery: Delivery,
}

/// Accepts booking submissions.
///
/// Holds the repository and the optional forwarder; both are injected so tests and other
/// deployments can swap them.
#[derive(Clone)]
pub struct SubmissionService {
    repository: Arc<dyn SubmissionRepository>,
    forwarder: Option<Arc<dyn Forwarder>>,
}

impl SubmissionService {
    pub fn new(
        repository: Arc<dyn SubmissionRepository>,
        forwarder: Option<Arc<dyn Forwarder>>,
    ) -> Self {
        Self {
            repository,
            forwarder,
        }
    }

    /// Builds the service the server runs with: an in-memory store and, when a webhook URL is
    /// configured, a [`WebhookForwarder`].
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook HTTP client cannot be built.
    pub fn from_config(cfg: &ServerConfig) -> SubmissionResult<Self> {
        let forwarder = match cfg.webhook_url() {
            Some(url) => Some(
                Arc::new(WebhookForwarder::new(url, cfg.webhook_timeout())?) as Arc<dyn Forwarder>
            ),
            None => None,
        };

        Ok(Self::new(Arc::new(InMemorySubmissionStore::new()), forwarder))
    }

    pub fn forwarding_enabled(&self) -> bool {
        self.forwarder.is_some()
    }

    /// Validates `payload` with the submission view, records it, then forwards the recorded
    /// payload unchanged when a forwarder is configured.
    ///
    /// A failed delivery does not fail the submission; it is reported in
    /// [`Accepted::delivery`].
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Validation` when the payload fails the schema, or a store
    /// error if recording fails. In both cases nothing is forwarded.
    pub async fn submit(&self, payload: serde_json::Value) -> SubmissionResult<Accepted> {
        validate_submission(&payload)?;

        let record = self.repository.create(payload)?;

        let delivery = match &self.forwarder {
            Some(forwarder) => forwarder.forward(&record.payload).await,
            None => Delivery::NotConfigured,
        };

        tracing::info!(id = %record.id, delivered = delivery.is_delivered(), "submission accepted");

        Ok(Accepted { record, delivery })
    }

    pub fn find(&self, id: &SubmissionId) -> SubmissionResult<Option<SubmissionRecord>> {
        self.repository.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RunMode, SubmissionError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingForwarder {
        seen: Mutex<Vec<serde_json::Value>>,
        fail: bool,
    }

    #[async_trait]
    impl Forwarder for RecordingForwarder {
        async fn forward(&self, payload: &serde_json::Value) -> Delivery {
            self.seen.lock().unwrap().push(payload.clone());
            if self.fail {
                Delivery::Failed {
                    status: Some(500),
                    reason: "webhook responded with 500".into(),
                }
            } else {
                Delivery::Delivered {
                    status: 200,
                    response: json!({"received": true}),
                }
            }
        }
    }

    fn payload() -> serde_json::Value {
        json!({
            "starting_date": "2024-12-25",
            "meals_provided": true,
            "flight_information": "SQ123",
            "tour_fair_includes": ["x"],
            "tour_fair_excludes": ["y"],
            "uploaded_file": {"filename": "a.pdf", "size": 100, "type": "application/pdf", "data": "QQ=="},
            "file_size_limit_enabled": true,
            "itinerary_language": "English",
            "agent_reference": "AG-77"
        })
    }

    #[tokio::test]
    async fn test_submit_without_forwarder_records_payload() {
        let store = Arc::new(InMemorySubmissionStore::new());
        let service = SubmissionService::new(store.clone(), None);

        let accepted = service.submit(payload()).await.unwrap();

        assert_eq!(accepted.delivery, Delivery::NotConfigured);
        assert_eq!(accepted.record.payload, payload());
        assert_eq!(store.len(), 1);
        assert_eq!(
            service.find(&accepted.record.id).unwrap().unwrap().payload,
            payload()
        );
    }

    #[tokio::test]
    async fn test_submit_forwards_unaltered_payload() {
        let forwarder = Arc::new(RecordingForwarder::default());
        let service = SubmissionService::new(
            Arc::new(InMemorySubmissionStore::new()),
            Some(forwarder.clone()),
        );

        let accepted = service.submit(payload()).await.unwrap();

        assert!(accepted.delivery.is_delivered());
        assert_eq!(forwarder.seen.lock().unwrap().as_slice(), &[payload()]);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_accepts() {
        let forwarder = Arc::new(RecordingForwarder {
            fail: true,
            ..Default::default()
        });
        let store = Arc::new(InMemorySubmissionStore::new());
        let service = SubmissionService::new(store.clone(), Some(forwarder));

        let accepted = service.submit(payload()).await.unwrap();

        assert!(matches!(accepted.delivery, Delivery::Failed { status: Some(500), .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_neither_forwarded_nor_recorded() {
        let forwarder = Arc::new(RecordingForwarder::default());
        let store = Arc::new(InMemorySubmissionStore::new());
        let service = SubmissionService::new(store.clone(), Some(forwarder.clone()));

        let mut bad = payload();
        bad["itinerary_language"] = json!("");

        match service.submit(bad).await {
            Err(SubmissionError::Validation(errors)) => {
                assert!(errors.mentions("itinerary_language"));
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
        assert!(forwarder.seen.lock().unwrap().is_empty());
        assert!(store.is_empty());
    }

    struct BrokenStore;

    impl SubmissionRepository for BrokenStore {
        fn create(&self, _payload: serde_json::Value) -> SubmissionResult<SubmissionRecord> {
            Err(SubmissionError::StorePoisoned)
        }

        fn get(&self, _id: &SubmissionId) -> SubmissionResult<Option<SubmissionRecord>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_not_forwarded() {
        let forwarder = Arc::new(RecordingForwarder::default());
        let service = SubmissionService::new(Arc::new(BrokenStore), Some(forwarder.clone()));

        let result = service.submit(payload()).await;

        assert!(matches!(result, Err(SubmissionError::StorePoisoned)));
        assert!(forwarder.seen.lock().unwrap().is_empty());
    }

    fn config(webhook_url: Option<String>) -> ServerConfig {
        ServerConfig::new(
            "127.0.0.1:3000".parse().unwrap(),
            webhook_url,
            RunMode::Development,
            std::time::Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_from_config_enables_forwarding_only_with_url() {
        let without = config(None);
        assert!(!SubmissionService::from_config(&without)
            .unwrap()
            .forwarding_enabled());

        let with = config(Some("http://localhost:5678/webhook/tour".into()));
        assert!(SubmissionService::from_config(&with)
            .unwrap()
            .forwarding_enabled());
    }
}
