//! Map surface: marker placement and view control.
//! [`LeafletMap`] binds to Leaflet through the helpers in map_helpers.js.

use crate::config::{
    PAN_DURATION_SECS, POPUP_MAX_WIDTH, POPUP_MIN_WIDTH, TILE_ATTRIBUTION, TILE_URL,
};
use crate::workout::{Coords, Workout};
use log::{debug, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/map_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = createMap)]
    fn create_map(
        element_id: &str,
        lat: f64,
        lng: f64,
        zoom: u8,
        tile_url: &str,
        attribution: &str,
        on_click: &Closure<dyn FnMut(f64, f64)>,
    ) -> JsValue;

    #[wasm_bindgen(js_name = addMarker)]
    fn add_marker(map: &JsValue, lat: f64, lng: f64, popup_options: JsValue, content: &str);

    #[wasm_bindgen(js_name = panTo)]
    fn pan_to(map: &JsValue, lat: f64, lng: f64, zoom: u8, duration_secs: f64);
}

/// What the controller needs from a map.
pub trait MapSurface {
    /// Place a marker for the workout with its popup opened.
    fn add_marker(&mut self, workout: &Workout);
    /// Re-center the view, animated.
    fn pan_to(&mut self, coords: Coords, zoom: u8);
}

/// Leaflet popup options for a workout marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

impl PopupOptions {
    pub fn for_workout(workout: &Workout) -> Self {
        Self {
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: false,
            close_on_click: false,
            class_name: workout.workout_type().popup_class(),
        }
    }
}

/// Popup text, e.g. `"🏃‍♂️ Running on April 14"`.
pub fn marker_content(workout: &Workout) -> String {
    format!("{} {}", workout.workout_type().icon(), workout.description())
}

/// A Leaflet map mounted into a DOM element.
pub struct LeafletMap {
    handle: JsValue,
    // Leaflet calls into this for every click; it must live as long as the map.
    _on_click: Closure<dyn FnMut(f64, f64)>,
}

impl LeafletMap {
    /// Create the map centered on `center`, add the tile layer and route
    /// clicks to `on_click`.
    pub fn mount(
        element_id: &str,
        center: Coords,
        zoom: u8,
        on_click: impl FnMut(Coords) + 'static,
    ) -> Self {
        let mut on_click = on_click;
        let closure = Closure::<dyn FnMut(f64, f64)>::new(move |lat: f64, lng: f64| {
            on_click(Coords::new(lat, lng));
        });
        let handle = create_map(
            element_id,
            center.lat,
            center.lng,
            zoom,
            TILE_URL,
            TILE_ATTRIBUTION,
            &closure,
        );
        debug!(
            "Map mounted in #{} at ({:.5}, {:.5})",
            element_id, center.lat, center.lng
        );
        Self {
            handle,
            _on_click: closure,
        }
    }
}

impl MapSurface for LeafletMap {
    fn add_marker(&mut self, workout: &Workout) {
        let options = match serde_wasm_bindgen::to_value(&PopupOptions::for_workout(workout)) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to build popup options for {}: {}", workout.id(), e);
                JsValue::UNDEFINED
            }
        };
        let coords = workout.coords();
        add_marker(
            &self.handle,
            coords.lat,
            coords.lng,
            options,
            &marker_content(workout),
        );
    }

    fn pan_to(&mut self, coords: Coords, zoom: u8) {
        pan_to(&self.handle, coords.lat, coords.lng, zoom, PAN_DURATION_SECS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Measurement;

    #[test]
    fn popup_options_follow_workout_type() {
        let w = Workout::create(Coords::new(0.0, 0.0), 20.0, 60.0, Measurement::ElevationGain(10.0));
        let opts = PopupOptions::for_workout(&w);
        assert_eq!(opts.class_name, "cycling-popup");
        assert_eq!(opts.max_width, 250);
        assert_eq!(opts.min_width, 100);
        assert!(!opts.auto_close && !opts.close_on_click);

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["className"], "cycling-popup");
        assert_eq!(value["closeOnClick"], false);
    }

    #[test]
    fn marker_content_has_icon_and_description() {
        let w = Workout::create(Coords::new(0.0, 0.0), 5.0, 30.0, Measurement::Cadence(180.0));
        let content = marker_content(&w);
        assert!(content.starts_with("🏃‍♂️ Running on "));
    }
}
