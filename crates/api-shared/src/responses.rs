//! Response envelopes.
//!
//! Every JSON response from the submission endpoints is a [`SubmissionRes`]: `success` and
//! `message` are always present, the remaining fields only when they apply. The webhook fields
//! use camelCase on the wire (`webhookResponse`, `webhookDelivered`, `webhookError`).

use crate::messages;
use serde::{Deserialize, Serialize};
use tourdesk_core::{Accepted, Delivery, FieldError, SubmissionRecord, ValidationErrors};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorRes {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

/// A stored submission as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordRes {
    pub id: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

impl From<SubmissionRecord> for RecordRes {
    fn from(record: SubmissionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            created_at: record.created_at.to_rfc3339(),
            payload: record.payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionRes {
    pub success: bool,
    pub message: String,
    #[serde(
        rename = "webhookResponse",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Object>)]
    pub webhook_response: Option<serde_json::Value>,
    #[serde(
        rename = "webhookDelivered",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_delivered: Option<bool>,
    #[serde(
        rename = "webhookError",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordRes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorRes>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionRes {
    fn base(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_string(),
            webhook_response: None,
            webhook_delivered: None,
            webhook_error: None,
            data: None,
            errors: None,
            error: None,
        }
    }

    /// Success envelope for an accepted submission, with the delivery outcome folded in.
    pub fn accepted(accepted: Accepted) -> Self {
        let mut res = match accepted.delivery {
            Delivery::NotConfigured => Self::base(true, messages::SUBMITTED_NO_WEBHOOK),
            Delivery::Delivered { response, .. } => {
                let mut res = Self::base(true, messages::SUBMITTED_DELIVERED);
                res.webhook_delivered = Some(true);
                res.webhook_response = Some(response);
                res
            }
            Delivery::Failed { reason, .. } => {
                let mut res = Self::base(true, messages::SUBMITTED_DELIVERY_FAILED);
                res.webhook_delivered = Some(false);
                res.webhook_error = Some(reason);
                res
            }
        };
        res.data = Some(accepted.record.into());
        res
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        let mut res = Self::base(false, messages::VALIDATION_ERROR);
        res.errors = Some(errors.into_inner().into_iter().map(Into::into).collect());
        res
    }

    pub fn internal(error: impl Into<String>) -> Self {
        let mut res = Self::base(false, messages::INTERNAL_SERVER_ERROR);
        res.error = Some(error.into());
        res
    }

    pub fn found(record: SubmissionRecord) -> Self {
        let mut res = Self::base(true, messages::SUBMISSION_FOUND);
        res.data = Some(record.into());
        res
    }

    pub fn failure(message: &str) -> Self {
        Self::base(false, message)
    }

    /// True when the webhook was configured and did not receive the submission.
    pub fn delivery_failed(&self) -> bool {
        self.webhook_delivered == Some(false)
    }
}
