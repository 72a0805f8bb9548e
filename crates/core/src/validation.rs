//! Field-level validation results and the entry points used by the endpoint and the form.
//!
//! The rules themselves live in [`schema`](crate::schema); this module wraps them into typed
//! results.

use crate::schema::{SchemaView, BOOKING_SCHEMA};
use crate::{BookingSubmission, SubmissionError, SubmissionResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One failing field. `field` uses dotted paths for nested values (`uploaded_file.size`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All failing fields of one validation run, in schema declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error a form shows inline: the first failing field.
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns true if any error is reported for `field` or one of its nested paths.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|e| {
            e.field == field
                || e.field
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

/// Validates a raw payload against the strict submission view and returns the typed booking.
///
/// # Errors
///
/// Returns [`SubmissionError::Validation`] with every failing field, or
/// [`SubmissionError::Deserialization`] if a payload that passed the schema still does not fit
/// [`BookingSubmission`].
pub fn validate_submission(payload: &serde_json::Value) -> SubmissionResult<BookingSubmission> {
    validate_view(SchemaView::Submission, payload)
}

/// Validates a raw payload against the lenient form view.
pub fn validate_form(payload: &serde_json::Value) -> SubmissionResult<BookingSubmission> {
    validate_view(SchemaView::Form, payload)
}

fn validate_view(
    view: SchemaView,
    payload: &serde_json::Value,
) -> SubmissionResult<BookingSubmission> {
    BOOKING_SCHEMA
        .validate(view, payload)
        .map_err(SubmissionError::Validation)?;

    serde_json::from_value(payload.clone()).map_err(SubmissionError::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenario_payload() -> serde_json::Value {
        json!({
            "starting_date": "2024-12-25",
            "meals_provided": true,
            "flight_information": "SQ123",
            "tour_fair_includes": ["x"],
            "tour_fair_excludes": ["y"],
            "uploaded_file": {"filename": "a.pdf", "size": 100, "type": "application/pdf", "data": "QQ=="},
            "file_size_limit_enabled": true,
            "itinerary_language": "English"
        })
    }

    #[test]
    fn test_validate_submission_accepts_scenario_payload() {
        let booking = validate_submission(&scenario_payload()).unwrap();
        assert_eq!(booking.flight_information.as_deref(), Some("SQ123"));
        assert_eq!(booking.uploaded_file.unwrap().size, 100);
    }

    #[test]
    fn test_validate_submission_null_file_fails() {
        let mut payload = scenario_payload();
        payload["uploaded_file"] = serde_json::Value::Null;

        match validate_submission(&payload) {
            Err(SubmissionError::Validation(errors)) => {
                assert!(errors.mentions("uploaded_file"));
                assert_eq!(errors.first().unwrap().field, "uploaded_file");
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_form_allows_incomplete_payload() {
        let booking = validate_form(&json!({"uploaded_file": null})).unwrap();
        assert!(booking.uploaded_file.is_none());
        assert!(booking.itinerary_language.is_empty());
    }

    const NON_OPTIONAL_FIELDS: [&str; 7] = [
        "meals_provided",
        "special_terms_enabled",
        "special_terms",
        "tour_fair_includes",
        "tour_fair_excludes",
        "file_size_limit_enabled",
        "itinerary_language",
    ];

    #[test]
    fn test_null_fields_never_fail_deserialization() {
        for field in NON_OPTIONAL_FIELDS {
            let mut payload = scenario_payload();
            payload[field] = serde_json::Value::Null;
            let required = BOOKING_SCHEMA
                .required(SchemaView::Submission)
                .contains(&field);

            match validate_submission(&payload) {
                Ok(booking) => {
                    assert!(!required, "{field}: null accepted for a required field");
                    assert!(booking.file_size_limit_enabled);
                }
                Err(SubmissionError::Validation(errors)) => {
                    assert!(required, "{field}: optional field rejected");
                    assert!(errors.mentions(field));
                }
                Err(other) => panic!("{field}: unexpected error {other}"),
            }

            let booking = validate_form(&payload)
                .unwrap_or_else(|e| panic!("{field}: form view rejected null: {e}"));
            assert!(booking.file_size_limit_enabled);
        }
    }

    #[test]
    fn test_null_optional_flags_read_as_defaults() {
        let mut payload = scenario_payload();
        payload["special_terms_enabled"] = serde_json::Value::Null;
        payload["special_terms"] = serde_json::Value::Null;

        let booking = validate_submission(&payload).unwrap();

        assert!(!booking.special_terms_enabled);
        assert!(booking.special_terms.is_empty());
    }

    #[test]
    fn test_mentions_matches_nested_paths_only() {
        let errors = ValidationErrors::from(vec![FieldError::new("uploaded_file.size", "bad")]);
        assert!(errors.mentions("uploaded_file"));
        assert!(!errors.mentions("uploaded"));
        assert_eq!(errors.to_string(), "uploaded_file.size: bad");
    }
}
