//! The canonical booking schema.
//!
//! Every field of a booking is described exactly once in [`BOOKING_FIELDS`]. Two views are
//! derived from that single table:
//!
//! - [`SchemaView::Form`]: the lenient view used while a booking is being edited. Nothing is
//!   required, but values that are present must still have the right shape and range.
//! - [`SchemaView::Submission`]: the strict view enforced at submit time, both by the form
//!   before any network call and by the endpoint on arrival.
//!
//! The same table also renders a JSON-Schema-like descriptor for either view
//! ([`BookingSchema::descriptor`]) so other consumers can read the contract instead of
//! re-declaring it.

use crate::validation::{FieldError, ValidationErrors};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which set of constraints to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaView {
    Form,
    Submission,
}

impl FromStr for SchemaView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "form" => Ok(SchemaView::Form),
            "submission" => Ok(SchemaView::Submission),
            other => Err(format!(
                "unknown schema view '{other}' (expected 'form' or 'submission')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
}

/// Shape and range rules of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `YYYY-MM-DD` string; an empty string counts as absent
    Date,
    /// Boolean toggle with the value assumed when absent
    Flag { default: bool },
    /// Free text; `non_empty_on_submit` rejects blank text in the submission view
    Text { non_empty_on_submit: bool },
    /// Whole number, at least 1
    Count,
    /// Decimal amount, not negative
    Amount,
    /// Ordered list of strings
    TextList { min_items_on_submit: usize },
    /// `{filename, size, type, data}` object
    Attachment,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Presence in the submission view. Every field is optional in the form view.
    pub on_submit: Presence,
}

impl FieldSpec {
    const fn new(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        on_submit: Presence,
    ) -> Self {
        Self {
            name,
            label,
            kind,
            on_submit,
        }
    }

    pub fn presence(&self, view: SchemaView) -> Presence {
        match view {
            SchemaView::Form => Presence::Optional,
            SchemaView::Submission => self.on_submit,
        }
    }

    fn missing_message(&self) -> String {
        match self.kind {
            FieldKind::Attachment => "Please upload a file".to_string(),
            _ => format!("{} is required", self.label),
        }
    }
}

use FieldKind::*;
use Presence::*;

/// Field table in display order. Validation errors are reported in this order.
pub const BOOKING_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("starting_date", "Starting date", Date, Optional),
    FieldSpec::new("meals_provided", "Meals provided", Flag { default: false }, Required),
    FieldSpec::new(
        "flight_information",
        "Flight information",
        Text {
            non_empty_on_submit: false,
        },
        Optional,
    ),
    FieldSpec::new("number_of_delegates", "Number of delegates", Count, Optional),
    FieldSpec::new("number_of_tour_leaders", "Number of tour leaders", Count, Optional),
    FieldSpec::new(
        "hotel_selection",
        "Hotel selection",
        Text {
            non_empty_on_submit: true,
        },
        Optional,
    ),
    FieldSpec::new("tour_fare", "Tour fare", Amount, Optional),
    FieldSpec::new("single_supplement", "Single supplement", Amount, Optional),
    FieldSpec::new(
        "special_terms_enabled",
        "Special terms enabled",
        Flag { default: false },
        Optional,
    ),
    FieldSpec::new(
        "special_terms",
        "Special terms",
        TextList {
            min_items_on_submit: 0,
        },
        Optional,
    ),
    FieldSpec::new(
        "tour_fair_includes",
        "Tour fare includes",
        TextList {
            min_items_on_submit: 1,
        },
        Required,
    ),
    FieldSpec::new(
        "tour_fair_excludes",
        "Tour fare excludes",
        TextList {
            min_items_on_submit: 1,
        },
        Required,
    ),
    FieldSpec::new("uploaded_file", "Uploaded file", Attachment, Required),
    FieldSpec::new(
        "markdown_content",
        "Markdown content",
        Text {
            non_empty_on_submit: false,
        },
        Optional,
    ),
    FieldSpec::new(
        "file_size_limit_enabled",
        "File size limit enabled",
        Flag { default: true },
        Optional,
    ),
    FieldSpec::new(
        "itinerary_language",
        "Itinerary language",
        Text {
            non_empty_on_submit: true,
        },
        Required,
    ),
];

/// The booking schema. Use [`BOOKING_SCHEMA`].
#[derive(Debug)]
pub struct BookingSchema {
    fields: &'static [FieldSpec],
}

pub static BOOKING_SCHEMA: BookingSchema = BookingSchema {
    fields: BOOKING_FIELDS,
};

impl BookingSchema {
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the fields the view requires, in declaration order.
    pub fn required(&self, view: SchemaView) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.presence(view) == Required)
            .map(|f| f.name)
            .collect()
    }

    /// Validates a raw JSON payload against `view`.
    ///
    /// Unknown keys are ignored. All failing fields are collected rather than stopping at the
    /// first one.
    ///
    /// # Errors
    ///
    /// Returns the collected [`ValidationErrors`] when at least one field fails. A payload that
    /// is not a JSON object yields a single error for the `body` field.
    pub fn validate(&self, view: SchemaView, payload: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let Some(object) = payload.as_object() else {
            errors.push(FieldError::new("body", "Request body must be a JSON object"));
            return Err(errors);
        };

        for spec in self.fields {
            check_field(spec, view, object.get(spec.name), &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Renders the view as a JSON-Schema (draft-07 flavoured) descriptor.
    pub fn descriptor(&self, view: SchemaView) -> Value {
        let mut properties = Map::new();
        for spec in self.fields {
            properties.insert(spec.name.to_string(), describe_field(spec, view));
        }

        let description = match view {
            SchemaView::Form => "Booking form while editing",
            SchemaView::Submission => "Booking form at submit time",
        };

        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "BookingSubmission",
            "description": description,
            "type": "object",
            "properties": properties,
            "required": self.required(view),
        })
    }
}

fn is_blank(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.trim().is_empty())
}

fn check_field(
    spec: &FieldSpec,
    view: SchemaView,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) {
    let required = spec.presence(view) == Required;

    let value = match value {
        None | Some(Value::Null) => {
            if required {
                errors.push(FieldError::new(spec.name, spec.missing_message()));
            }
            return;
        }
        Some(value) => value,
    };

    let fail = |errors: &mut ValidationErrors, message: String| {
        errors.push(FieldError::new(spec.name, message));
    };

    match spec.kind {
        Date => match value.as_str() {
            Some(s) if s.trim().is_empty() => {
                if required {
                    fail(errors, spec.missing_message());
                }
            }
            Some(s) => {
                if NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).is_err() {
                    fail(
                        errors,
                        format!("{} must be a valid date (YYYY-MM-DD)", spec.label),
                    );
                }
            }
            None => fail(errors, format!("{} must be a date string", spec.label)),
        },
        Flag { .. } => {
            if !value.is_boolean() {
                fail(errors, format!("{} must be true or false", spec.label));
            }
        }
        Text {
            non_empty_on_submit,
        } => {
            if !value.is_string() {
                fail(errors, format!("{} must be text", spec.label));
            } else if view == SchemaView::Submission && is_blank(value) {
                if required {
                    fail(errors, spec.missing_message());
                } else if non_empty_on_submit {
                    fail(errors, format!("{} cannot be empty", spec.label));
                }
            }
        }
        Count => match value.as_i64() {
            Some(n) if n < 1 => fail(errors, format!("{} must be at least 1", spec.label)),
            Some(n) if n > i64::from(u32::MAX) => {
                fail(errors, format!("{} is too large", spec.label))
            }
            Some(_) => {}
            None if value.as_u64().is_some() => {
                fail(errors, format!("{} is too large", spec.label))
            }
            None => fail(errors, format!("{} must be a whole number", spec.label)),
        },
        Amount => match value.as_f64() {
            Some(n) if n < 0.0 => fail(errors, format!("{} cannot be negative", spec.label)),
            Some(_) => {}
            None => fail(errors, format!("{} must be a number", spec.label)),
        },
        TextList {
            min_items_on_submit,
        } => {
            let Some(items) = value.as_array() else {
                fail(errors, format!("{} must be a list of text items", spec.label));
                return;
            };
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errors.push(FieldError::new(
                        format!("{}.{index}", spec.name),
                        "Each item must be text",
                    ));
                }
            }
            if view == SchemaView::Submission && items.len() < min_items_on_submit {
                fail(
                    errors,
                    format!(
                        "{} must contain at least {} item{}",
                        spec.label,
                        min_items_on_submit,
                        if min_items_on_submit == 1 { "" } else { "s" }
                    ),
                );
            }
        }
        Attachment => check_attachment(spec, view, value, errors),
    }
}

fn check_attachment(
    spec: &FieldSpec,
    view: SchemaView,
    value: &Value,
    errors: &mut ValidationErrors,
) {
    let Some(file) = value.as_object() else {
        errors.push(FieldError::new(
            spec.name,
            format!("{} must be a file object", spec.label),
        ));
        return;
    };
    let path = |key: &str| format!("{}.{key}", spec.name);

    match file.get("filename") {
        Some(name) if name.is_string() && !is_blank(name) => {}
        _ => errors.push(FieldError::new(path("filename"), "File name is required")),
    }

    if file.get("size").and_then(Value::as_u64).is_none() {
        errors.push(FieldError::new(
            path("size"),
            "File size must be a non-negative whole number",
        ));
    }

    if !file.get("type").is_some_and(Value::is_string) {
        errors.push(FieldError::new(path("type"), "File type must be text"));
    }

    match file.get("data") {
        Some(data) if data.is_string() => {
            if view == SchemaView::Submission && is_blank(data) {
                errors.push(FieldError::new(path("data"), "File content is missing"));
            }
        }
        _ => errors.push(FieldError::new(path("data"), "File content must be text")),
    }
}

fn nullable(type_name: &str, required: bool) -> Value {
    if required {
        json!(type_name)
    } else {
        json!([type_name, "null"])
    }
}

fn describe_field(spec: &FieldSpec, view: SchemaView) -> Value {
    let required = spec.presence(view) == Required;
    let submission = view == SchemaView::Submission;

    let mut out = match spec.kind {
        Date => json!({ "type": nullable("string", required), "format": "date" }),
        Flag { default } => json!({ "type": "boolean", "default": default }),
        Text {
            non_empty_on_submit,
        } => {
            let mut text = json!({ "type": nullable("string", required) });
            if submission && (required || non_empty_on_submit) {
                text["minLength"] = json!(1);
            }
            text
        }
        Count => json!({ "type": nullable("integer", required), "minimum": 1 }),
        Amount => json!({ "type": nullable("number", required), "minimum": 0 }),
        TextList {
            min_items_on_submit,
        } => {
            let min_items = if submission { min_items_on_submit } else { 0 };
            json!({ "type": "array", "items": { "type": "string" }, "minItems": min_items })
        }
        Attachment => json!({
            "type": nullable("object", required),
            "properties": {
                "filename": { "type": "string", "minLength": 1 },
                "size": { "type": "integer", "minimum": 0 },
                "type": { "type": "string" },
                "data": { "type": "string", "contentEncoding": "base64" },
            },
            "required": ["filename", "size", "type", "data"],
        }),
    };

    out["title"] = json!(spec.label);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> Value {
        json!({
            "starting_date": "2024-12-25",
            "meals_provided": true,
            "flight_information": "SQ123",
            "number_of_delegates": 20,
            "number_of_tour_leaders": 2,
            "hotel_selection": "Marina Bay Sands",
            "tour_fare": 2899.5,
            "single_supplement": null,
            "special_terms_enabled": true,
            "special_terms": ["Full payment is due {{45}} days before departure."],
            "tour_fair_includes": ["x"],
            "tour_fair_excludes": ["y"],
            "uploaded_file": {"filename": "a.pdf", "size": 100, "type": "application/pdf", "data": "QQ=="},
            "file_size_limit_enabled": true,
            "itinerary_language": "English"
        })
    }

    fn fields_of(errors: &ValidationErrors) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_submission_passes_both_views() {
        let payload = valid_submission();
        assert!(BOOKING_SCHEMA.validate(SchemaView::Submission, &payload).is_ok());
        assert!(BOOKING_SCHEMA.validate(SchemaView::Form, &payload).is_ok());
    }

    #[test]
    fn test_empty_object_is_valid_form_but_not_submission() {
        let payload = json!({});
        assert!(BOOKING_SCHEMA.validate(SchemaView::Form, &payload).is_ok());

        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(
            fields_of(&errors),
            vec![
                "meals_provided",
                "tour_fair_includes",
                "tour_fair_excludes",
                "uploaded_file",
                "itinerary_language"
            ]
        );
    }

    #[test]
    fn test_empty_itinerary_language_fails_submission() {
        let mut payload = valid_submission();
        payload["itinerary_language"] = json!("  ");

        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(fields_of(&errors), vec!["itinerary_language"]);
        assert_eq!(errors.first().unwrap().message, "Itinerary language is required");

        assert!(BOOKING_SCHEMA.validate(SchemaView::Form, &payload).is_ok());
    }

    #[test]
    fn test_null_uploaded_file_fails_submission() {
        let mut payload = valid_submission();
        payload["uploaded_file"] = Value::Null;

        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(fields_of(&errors), vec!["uploaded_file"]);
        assert_eq!(errors.first().unwrap().message, "Please upload a file");
    }

    #[test]
    fn test_attachment_subfields_reported_with_dotted_paths() {
        let mut payload = valid_submission();
        payload["uploaded_file"] = json!({"filename": "", "size": -1, "data": ""});

        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(
            fields_of(&errors),
            vec![
                "uploaded_file.filename",
                "uploaded_file.size",
                "uploaded_file.type",
                "uploaded_file.data"
            ]
        );
    }

    #[test]
    fn test_empty_lists_fail_only_on_submit() {
        let mut payload = valid_submission();
        payload["tour_fair_includes"] = json!([]);
        payload["special_terms"] = json!([]);

        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(fields_of(&errors), vec!["tour_fair_includes"]);
        assert_eq!(
            errors.first().unwrap().message,
            "Tour fare includes must contain at least 1 item"
        );

        assert!(BOOKING_SCHEMA.validate(SchemaView::Form, &payload).is_ok());
    }

    #[test]
    fn test_list_items_must_be_strings() {
        let mut payload = valid_submission();
        payload["tour_fair_excludes"] = json!(["ok", 3]);

        let errors = BOOKING_SCHEMA.validate(SchemaView::Form, &payload).unwrap_err();
        assert_eq!(fields_of(&errors), vec!["tour_fair_excludes.1"]);
    }

    #[test]
    fn test_counts_and_amounts_are_range_checked_in_both_views() {
        let mut payload = valid_submission();
        payload["number_of_delegates"] = json!(0);
        payload["number_of_tour_leaders"] = json!(1.5);
        payload["tour_fare"] = json!(-10);
        payload["single_supplement"] = json!("cheap");

        for view in [SchemaView::Form, SchemaView::Submission] {
            let errors = BOOKING_SCHEMA.validate(view, &payload).unwrap_err();
            assert_eq!(
                fields_of(&errors),
                vec![
                    "number_of_delegates",
                    "number_of_tour_leaders",
                    "tour_fare",
                    "single_supplement"
                ]
            );
        }
    }

    #[test]
    fn test_blank_hotel_selection_rejected_on_submit() {
        let mut payload = valid_submission();
        payload["hotel_selection"] = json!("");

        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(errors.first().unwrap().message, "Hotel selection cannot be empty");

        payload.as_object_mut().unwrap().remove("hotel_selection");
        assert!(BOOKING_SCHEMA.validate(SchemaView::Submission, &payload).is_ok());
    }

    #[test]
    fn test_starting_date_rules() {
        let mut payload = valid_submission();
        payload["starting_date"] = json!("");
        assert!(BOOKING_SCHEMA.validate(SchemaView::Submission, &payload).is_ok());

        payload["starting_date"] = json!("25/12/2024");
        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &payload)
            .unwrap_err();
        assert_eq!(fields_of(&errors), vec!["starting_date"]);

        payload["starting_date"] = json!("2024-02-30");
        assert!(BOOKING_SCHEMA.validate(SchemaView::Form, &payload).is_err());
    }

    #[test]
    fn test_non_object_payload() {
        let errors = BOOKING_SCHEMA
            .validate(SchemaView::Submission, &json!([1, 2]))
            .unwrap_err();
        assert_eq!(fields_of(&errors), vec!["body"]);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut payload = valid_submission();
        payload["agent_notes"] = json!({"anything": true});
        assert!(BOOKING_SCHEMA.validate(SchemaView::Submission, &payload).is_ok());
    }

    #[test]
    fn test_descriptor_required_lists_differ_by_view() {
        let form = BOOKING_SCHEMA.descriptor(SchemaView::Form);
        let submission = BOOKING_SCHEMA.descriptor(SchemaView::Submission);

        assert_eq!(form["required"], json!([]));
        assert_eq!(
            submission["required"],
            json!([
                "meals_provided",
                "tour_fair_includes",
                "tour_fair_excludes",
                "uploaded_file",
                "itinerary_language"
            ])
        );
        assert_eq!(form["properties"]["uploaded_file"]["type"], json!(["object", "null"]));
        assert_eq!(submission["properties"]["uploaded_file"]["type"], json!("object"));
        assert_eq!(submission["properties"]["tour_fair_includes"]["minItems"], json!(1));
        assert_eq!(form["properties"]["tour_fair_includes"]["minItems"], json!(0));
        assert_eq!(submission["properties"]["itinerary_language"]["minLength"], json!(1));
    }

    #[test]
    fn test_schema_view_from_str() {
        assert_eq!("Form".parse::<SchemaView>(), Ok(SchemaView::Form));
        assert_eq!(" submission ".parse::<SchemaView>(), Ok(SchemaView::Submission));
        assert!("draft".parse::<SchemaView>().is_err());
    }

    #[test]
    fn test_every_field_has_a_descriptor_entry() {
        let descriptor = BOOKING_SCHEMA.descriptor(SchemaView::Submission);
        let properties = descriptor["properties"].as_object().unwrap();
        assert_eq!(properties.len(), BOOKING_FIELDS.len());
        assert!(BOOKING_SCHEMA.field("tour_fare").is_some());
        assert!(BOOKING_SCHEMA.field("unknown").is_none());
    }
}
