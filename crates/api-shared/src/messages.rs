//! Messages returned in the `message` field of responses.

pub const SUBMITTED_NO_WEBHOOK: &str = "Form submitted successfully (no webhook configured)";
pub const SUBMITTED_DELIVERED: &str = "Form submitted successfully";
pub const SUBMITTED_DELIVERY_FAILED: &str =
    "Form submitted successfully, but webhook delivery failed";
pub const VALIDATION_ERROR: &str = "Validation error";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const SUBMISSION_FOUND: &str = "Submission found";
pub const SUBMISSION_NOT_FOUND: &str = "Submission not found";
pub const INVALID_SUBMISSION_ID: &str = "Invalid submission id";
