//! The booking submission entity.

use crate::constants::{PRESET_SPECIAL_TERMS, PRESET_TOUR_FARE_EXCLUDES, PRESET_TOUR_FARE_INCLUDES};
use serde::{Deserialize, Deserializer, Serialize};
use tourdesk_files::UploadedFile;

fn default_true() -> bool {
    true
}

/// An explicit `null` reads as the type's default, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// A booking as collected by the form and accepted by the endpoint.
///
/// This is the lenient shape: every field the form may leave empty while editing is optional
/// here, and an explicit `null` is read like a missing key. Which fields are required at submit time is decided by
/// [`schema`](crate::schema), not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSubmission {
    #[serde(default)]
    pub starting_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meals_provided: bool,
    #[serde(default)]
    pub flight_information: Option<String>,
    #[serde(default)]
    pub number_of_delegates: Option<u32>,
    #[serde(default)]
    pub number_of_tour_leaders: Option<u32>,
    #[serde(default)]
    pub hotel_selection: Option<String>,
    #[serde(default)]
    pub tour_fare: Option<f64>,
    #[serde(default)]
    pub single_supplement: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub special_terms_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub special_terms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tour_fair_includes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tour_fair_excludes: Vec<String>,
    #[serde(default)]
    pub uploaded_file: Option<UploadedFile>,
    #[serde(default)]
    pub markdown_content: Option<String>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub file_size_limit_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub itinerary_language: String,
}

impl Default for BookingSubmission {
    fn default() -> Self {
        Self {
            starting_date: None,
            meals_provided: false,
            flight_information: None,
            number_of_delegates: None,
            number_of_tour_leaders: None,
            hotel_selection: None,
            tour_fare: None,
            single_supplement: None,
            special_terms_enabled: false,
            special_terms: Vec::new(),
            tour_fair_includes: Vec::new(),
            tour_fair_excludes: Vec::new(),
            uploaded_file: None,
            markdown_content: None,
            file_size_limit_enabled: true,
            itinerary_language: String::new(),
        }
    }
}

impl BookingSubmission {
    /// A blank booking with the include, exclude and special-terms lists seeded from presets.
    pub fn with_presets() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            special_terms: owned(PRESET_SPECIAL_TERMS),
            tour_fair_includes: owned(PRESET_TOUR_FARE_INCLUDES),
            tour_fair_excludes: owned(PRESET_TOUR_FARE_EXCLUDES),
            ..Self::default()
        }
    }
}
