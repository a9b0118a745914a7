//! Application-level configuration constants.

// Map
pub const MAP_ELEMENT_ID: &str = "map";
pub const MAP_ZOOM_LEVEL: u8 = 13;
pub const TILE_URL: &str = "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const PAN_DURATION_SECS: f64 = 1.0;

// Marker popups
pub const POPUP_MAX_WIDTH: u32 = 250;
pub const POPUP_MIN_WIDTH: u32 = 100;

// Persistence
pub const STORAGE_KEY: &str = "workouts";

// UI Behavior
/// Delay before the form's `display: grid` is restored after hiding it,
/// so the slide-out transition is skipped.
pub const FORM_REDISPLAY_DELAY_MS: u32 = 1000;
