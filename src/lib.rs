//! Mapty: log running and cycling workouts on a map.
//!
//! The library holds everything below the UI: the [`workout`] model, [`form`]
//! validation, [`storage`] of the workout list, the [`map`] and
//! [`geolocation`] collaborators and the [`controller`] that ties them
//! together. The Yew front end lives in the binary.

use log::{info, warn};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod form;
pub mod geolocation;
pub mod logger;
pub mod map;
pub mod storage;
pub mod workout;

pub use controller::{AppError, Controller, MapStatus, Phase};
pub use form::{ValidationError, WorkoutForm};
pub use storage::{KeyValueStore, MemoryStore, StoreError};
pub use workout::{Coords, Measurement, Workout, WorkoutDetails, WorkoutId, WorkoutType};

/// Delete every stored workout and reload the page.
///
/// Exposed to JavaScript so it can be called from the browser console. The
/// app's own Reset button goes through [`Controller::reset`] instead.
#[wasm_bindgen]
pub fn reset() {
    let mut store = storage::BrowserStore::open();
    storage::clear_workouts(&mut store);
    reload_page();
}

/// Reload the page, bringing the app back up from whatever is stored.
pub fn reload_page() {
    match web_sys::window() {
        Some(window) => {
            info!("Reloading page");
            if let Err(e) = window.location().reload() {
                warn!("Reload failed: {:?}", e);
            }
        }
        None => warn!("No window to reload"),
    }
}
