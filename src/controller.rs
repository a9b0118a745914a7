//! Application controller.
//!
//! [`Controller`] is the single owner of the workout list. It sits between the
//! UI events (map clicks, form submissions, list clicks) and three
//! collaborators: the key-value store, the map surface and, indirectly, the
//! geolocation request that decides whether a map ever appears.
//!
//! Startup happens in two phases. [`Controller::new`] restores the persisted
//! list immediately so the list can render; markers wait until
//! [`Controller::on_map_ready`] hands over a map, which then draws every
//! restored workout once, in list order.

use crate::config::MAP_ZOOM_LEVEL;
use crate::form::{ValidationError, WorkoutForm};
use crate::geolocation::GeolocationError;
use crate::map::MapSurface;
use crate::storage::{clear_workouts, load_workouts, save_workouts, KeyValueStore};
use crate::workout::{Coords, Workout, WorkoutId};
use log::{debug, error, info, warn};
use std::fmt;

/// Where the user is in logging a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Nothing pending.
    Idle,
    /// A map location was picked and the form is open.
    AwaitingFormInput { coords: Coords },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    /// Waiting for the user's position.
    Loading,
    Ready,
    /// The position request failed; no workouts can be logged.
    Unavailable(GeolocationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A form was submitted without a selected map location.
    NoPendingLocation,
    Invalid(ValidationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoPendingLocation => write!(f, "Click on the map to pick a location first"),
            AppError::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Invalid(e)
    }
}

pub struct Controller<S: KeyValueStore, M: MapSurface> {
    store: S,
    map: Option<M>,
    map_status: MapStatus,
    phase: Phase,
    workouts: Vec<Workout>,
    zoom: u8,
}

impl<S: KeyValueStore, M: MapSurface> Controller<S, M> {
    /// First startup phase: restore persisted workouts.
    pub fn new(store: S) -> Self {
        let workouts = load_workouts(&store);
        info!("Controller started with {} restored workouts", workouts.len());
        Self {
            store,
            map: None,
            map_status: MapStatus::Loading,
            phase: Phase::Idle,
            workouts,
            zoom: MAP_ZOOM_LEVEL,
        }
    }

    /// Second startup phase: take the map and draw the restored markers.
    pub fn on_map_ready(&mut self, mut map: M) {
        for workout in &self.workouts {
            map.add_marker(workout);
        }
        debug!("Rendered {} restored markers", self.workouts.len());
        self.map = Some(map);
        self.map_status = MapStatus::Ready;
    }

    pub fn on_position_unavailable(&mut self, err: GeolocationError) {
        warn!("Map unavailable: {}", err);
        self.map_status = MapStatus::Unavailable(err);
    }

    /// A map location was clicked; the form should open.
    pub fn select_location(&mut self, coords: Coords) {
        debug!("Location selected at ({:.5}, {:.5})", coords.lat, coords.lng);
        self.phase = Phase::AwaitingFormInput { coords };
    }

    /// Dismiss the pending location without logging anything.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Validate the form and log a workout at the pending location.
    ///
    /// On error nothing changes and the form stays open. On success the
    /// workout is appended, drawn on the map, the full list is persisted and
    /// the controller returns to [`Phase::Idle`]. A failed write is logged;
    /// the workout still lives for the session.
    pub fn submit(&mut self, form: &WorkoutForm) -> Result<&Workout, AppError> {
        let Phase::AwaitingFormInput { coords } = self.phase else {
            return Err(AppError::NoPendingLocation);
        };

        let input = form.validate().map_err(|e| {
            debug!("Rejected {} form: {}", form.workout_type, e);
            AppError::from(e)
        })?;

        let workout = Workout::create(
            coords,
            input.distance_km,
            input.duration_min,
            input.measurement,
        );
        info!("Logged {} ({})", workout.description(), workout.id());

        if let Some(map) = self.map.as_mut() {
            map.add_marker(&workout);
        }
        self.workouts.push(workout);
        self.persist();
        self.phase = Phase::Idle;

        let last = self.workouts.len() - 1;
        Ok(&self.workouts[last])
    }

    /// Center the map on a workout. Returns its coordinates when found.
    pub fn focus_workout(&mut self, id: &WorkoutId) -> Option<Coords> {
        let coords = self.find(id)?.coords();
        match self.map.as_mut() {
            Some(map) => map.pan_to(coords, self.zoom),
            None => debug!("Map not ready, cannot focus workout {}", id),
        }
        Some(coords)
    }

    /// Forget every workout, persisted and in memory.
    pub fn reset(&mut self) {
        clear_workouts(&mut self.store);
        self.workouts.clear();
        self.phase = Phase::Idle;
    }

    pub fn find(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn map_status(&self) -> &MapStatus {
        &self.map_status
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        if let Err(e) = save_workouts(&mut self.store, &self.workouts) {
            error!("{}", e);
        }
    }
}
