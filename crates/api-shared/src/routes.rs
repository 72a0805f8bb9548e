//! Paths and limits of the HTTP surface, shared by the router and the form client.

pub const HEALTH_PATH: &str = "/health";
pub const SUBMIT_PATH: &str = "/api/submit-form";
pub const SUBMISSIONS_PATH: &str = "/api/submissions";
pub const SCHEMA_PATH: &str = "/api/schema";

/// Largest request body the submission endpoint reads. Sized for a large attachment after
/// base64 inflation; the form refuses to send anything bigger.
pub const MAX_REQUEST_BYTES: usize = 128 * 1024 * 1024;
