//! Constants used throughout the tourdesk core crate.
//!
//! Preset list text lives here so the form model, the CLI and the tests all seed lists from
//! the same source.

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind host when `TOURDESK_BIND` is not set.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default timeout for the outbound webhook call.
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Itinerary languages offered as presets. Any other non-empty value is a custom language.
pub const ITINERARY_LANGUAGE_PRESETS: [&str; 2] = ["English", "Chinese"];

/// Items pre-populated into the "tour fare includes" list.
pub const PRESET_TOUR_FARE_INCLUDES: &[&str] = &[
    "Return economy class airfare and airport taxes",
    "Hotel accommodation based on twin sharing",
    "Meals as stated in the itinerary",
    "Sightseeing and entrance fees as stated in the itinerary",
    "Coach transfers throughout the tour",
    "Services of a professional tour leader",
];

/// Items pre-populated into the "tour fare excludes" list.
pub const PRESET_TOUR_FARE_EXCLUDES: &[&str] = &[
    "Travel insurance",
    "Visa fees",
    "Tips for local guides and drivers",
    "Personal expenses such as laundry, telephone calls and minibar",
    "Optional tours not stated in the itinerary",
];

/// Special-terms templates. `{{...}}` spans are edited in place by the user.
pub const PRESET_SPECIAL_TERMS: &[&str] = &[
    "A non-refundable deposit of {{30%}} of the tour fare is required upon confirmation.",
    "Full payment is due {{45}} days before departure.",
    "The tour fare is based on a minimum group size of {{15}} paying delegates.",
    "Cancellation within {{14}} days of departure forfeits the full tour fare.",
];
