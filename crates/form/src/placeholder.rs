//! `{{placeholder}}` segmentation for special-terms templates.
//!
//! A template is split left to right into literal text and placeholder spans. From each `{{`
//! the next `}}` closes the span; spans do not nest. A `{{` with no later `}}` leaves the rest
//! of the string literal. Joining the segments of an unedited template gives back the input.

use crate::{FormError, FormResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// One piece of a template. `Placeholder` holds the text between the braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

impl Segment {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Segment::Placeholder(_))
    }
}

/// Splits `text` into segments. Empty literal runs are not emitted, so an empty string gives
/// no segments.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }
        segments.push(Segment::Placeholder(after_open[..end].to_string()));
        rest = &after_open[end + CLOSE.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }

    segments
}

/// Re-emits segments as text, wrapping placeholders in `{{ }}`.
pub fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => text.clone(),
            Segment::Placeholder(inner) => format!("{OPEN}{inner}{CLOSE}"),
        })
        .collect()
}

/// True when the template has at least one placeholder. Templates without one are edited as a
/// single plain field.
pub fn has_placeholders(text: &str) -> bool {
    segment(text).iter().any(Segment::is_placeholder)
}

/// The inner texts of every placeholder, in order.
pub fn placeholders(text: &str) -> Vec<String> {
    segment(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(inner) => Some(inner),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Replaces the inner text of the `nth` placeholder and returns the re-joined template.
/// Literal text is never touched.
///
/// # Errors
///
/// Returns `FormError::NoSuchPlaceholder` if the template has fewer than `nth + 1`
/// placeholders.
pub fn fill(text: &str, nth: usize, value: &str) -> FormResult<String> {
    let mut segments = segment(text);
    let slot = segments
        .iter_mut()
        .filter_map(|segment| match segment {
            Segment::Placeholder(inner) => Some(inner),
            Segment::Literal(_) => None,
        })
        .nth(nth)
        .ok_or(FormError::NoSuchPlaceholder(nth))?;

    *slot = value.to_string();
    Ok(join(&segments))
}
