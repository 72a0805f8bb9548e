//! Lenient coercion of text typed into the form's scalar inputs.
//!
//! These never fail: text that cannot be read falls back to a neutral value and the schema has
//! the final say at submit time.

use tourdesk_core::constants::ITINERARY_LANGUAGE_PRESETS;

/// Price text to an amount. Blank or unparsable text becomes `None`.
pub fn coerce_amount(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Count text to a count. Unparsable text becomes `1`.
pub fn coerce_count(text: &str) -> u32 {
    text.trim().parse::<u32>().unwrap_or(1)
}

/// Date text as entered. A blank date is absent.
pub fn coerce_date(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Optional free text. Blank text is absent.
pub fn coerce_text(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}

/// True when `language` is not one of the preset itinerary languages.
pub fn is_custom_language(language: &str) -> bool {
    !ITINERARY_LANGUAGE_PRESETS.contains(&language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("1999.50"), Some(1999.5));
        assert_eq!(coerce_amount(" 12 "), Some(12.0));
        assert_eq!(coerce_amount(""), None);
        assert_eq!(coerce_amount("abc"), None);
        assert_eq!(coerce_amount("NaN"), None);
        assert_eq!(coerce_amount("-5"), Some(-5.0));
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("25"), 25);
        assert_eq!(coerce_count(""), 1);
        assert_eq!(coerce_count("many"), 1);
        assert_eq!(coerce_count("-3"), 1);
        assert_eq!(coerce_count("2.5"), 1);
    }

    #[test]
    fn test_coerce_date_and_text() {
        assert_eq!(coerce_date(""), None);
        assert_eq!(coerce_date("2024-12-25"), Some("2024-12-25".to_string()));
        assert_eq!(coerce_text("  "), None);
        assert_eq!(coerce_text("SQ123"), Some("SQ123".to_string()));
    }

    #[test]
    fn test_custom_language() {
        assert!(!is_custom_language("English"));
        assert!(!is_custom_language("Chinese"));
        assert!(is_custom_language("Malay"));
    }
}
