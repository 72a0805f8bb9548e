//! Submission identifiers.
//!
//! Stored submissions are keyed by a UUID in canonical form: **32 lowercase hexadecimal
//! characters**, no hyphens (the value of `Uuid::new_v4().simple().to_string()`).
//!
//! Identifiers arriving from outside (for example the `/api/submissions/{id}` path) must already
//! be canonical. Uppercase, hyphenated or otherwise malformed values are rejected rather than
//! normalised, so a record has exactly one spelling of its id.

use crate::{SubmissionError, SubmissionResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Canonical submission identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionId {
    /// Generates a fresh random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::InvalidId`] if `input` is not 32 lowercase hex characters.
    pub fn parse(input: &str) -> SubmissionResult<Self> {
        if !Self::is_canonical(input) {
            return Err(SubmissionError::InvalidId(format!(
                "id must be 32 lowercase hex characters without hyphens, got: '{input}'"
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| SubmissionError::InvalidId(e.to_string()))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Purely syntactic check: exactly 32 bytes of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32 && input.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SubmissionId {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for SubmissionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for SubmissionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
