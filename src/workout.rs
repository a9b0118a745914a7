//! Workout domain model.
//!
//! A [`Workout`] is an immutable record of one logged activity. The shared
//! fields live on the struct, the variant-specific ones live in
//! [`WorkoutDetails`], a tagged union whose `type` discriminant is flattened
//! into the same JSON object the list is persisted as:
//!
//! ```json
//! {"id":"18e2c…","date":"2024-04-14T09:12:00Z","coords":[51.5,-0.12],
//!  "distance":5.0,"duration":30.0,"description":"Running on April 14",
//!  "type":"running","cadence":180.0,"pace":6.0}
//! ```

use chrono::{DateTime, Datelike, Local, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A latitude/longitude pair, stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

/// Which activity a workout records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    /// Lowercase name, as used in the form `<select>` and CSS classes.
    pub fn name(self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions.
    pub fn label(self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }

    pub fn popup_class(self) -> String {
        format!("{}-popup", self.name())
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWorkoutType(pub String);

impl fmt::Display for UnknownWorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown workout type '{}'", self.0)
    }
}

impl std::error::Error for UnknownWorkoutType {}

impl FromStr for WorkoutType {
    type Err = UnknownWorkoutType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(UnknownWorkoutType(other.to_string())),
        }
    }
}

/// Opaque workout identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Millisecond timestamp plus a random 32-bit suffix, both hex.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix: u32 = rand::rng().random();
        Self(format!("{:x}-{:08x}", now.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The variant-specific measurement entered in the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Steps per minute.
    Cadence(f64),
    /// Metres climbed.
    ElevationGain(f64),
}

/// Variant fields of a workout, including its derived metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running {
        #[serde(rename = "cadence")]
        cadence_spm: f64,
        #[serde(rename = "pace", default)]
        pace_min_per_km: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain_m: f64,
        #[serde(rename = "speed", default)]
        speed_km_per_h: f64,
    },
}

impl WorkoutDetails {
    fn derive(measurement: Measurement, distance_km: f64, duration_min: f64) -> Self {
        match measurement {
            Measurement::Cadence(cadence_spm) => WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km: compute_running_pace(distance_km, duration_min),
            },
            Measurement::ElevationGain(elevation_gain_m) => WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h: compute_cycling_speed(distance_km, duration_min),
            },
        }
    }

    fn measurement(&self) -> Measurement {
        match *self {
            WorkoutDetails::Running { cadence_spm, .. } => Measurement::Cadence(cadence_spm),
            WorkoutDetails::Cycling {
                elevation_gain_m, ..
            } => Measurement::ElevationGain(elevation_gain_m),
        }
    }

    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutDetails::Running { .. } => WorkoutType::Running,
            WorkoutDetails::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// Minutes per kilometre. Infinite for a zero distance; callers reject that first.
#[inline]
pub fn compute_running_pace(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Kilometres per hour.
#[inline]
pub fn compute_cycling_speed(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// `"<Type> on <Month> <day>"`, e.g. `"Cycling on March 3"`.
pub fn format_description(workout_type: WorkoutType, date: &impl Datelike) -> String {
    format!(
        "{} on {} {}",
        workout_type.label(),
        MONTHS[date.month0() as usize],
        date.day()
    )
}

/// A single logged workout. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    id: WorkoutId,
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
    coords: Coords,
    #[serde(rename = "distance")]
    distance_km: f64,
    #[serde(rename = "duration")]
    duration_min: f64,
    #[serde(default)]
    description: String,
    #[serde(flatten)]
    details: WorkoutDetails,
}

impl Workout {
    /// Build a workout created now, with a fresh id.
    ///
    /// Preconditions (checked by the form, not here): `distance_km > 0`,
    /// `duration_min > 0`, and a positive cadence for running.
    pub fn create(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        measurement: Measurement,
    ) -> Self {
        let now = Utc::now();
        Self::with_identity(
            WorkoutId::generate(now),
            now,
            coords,
            distance_km,
            duration_min,
            measurement,
        )
    }

    /// Build a workout with a caller-supplied id and timestamp.
    pub fn with_identity(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        measurement: Measurement,
    ) -> Self {
        let details = WorkoutDetails::derive(measurement, distance_km, duration_min);
        let description = format_description(
            details.workout_type(),
            &created_at.with_timezone(&Local).date_naive(),
        );
        Self {
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            description,
            details,
        }
    }

    /// Rebuild a deserialized record into a proper workout.
    ///
    /// The derived metric is recomputed from the base fields; a stored
    /// description is kept, a missing one is derived. Returns `None` when the
    /// record breaks the positivity invariants.
    pub fn rehydrate(self) -> Option<Self> {
        let base_ok = is_positive(self.distance_km) && is_positive(self.duration_min);
        let measurement = self.details.measurement();
        let measurement_ok = match measurement {
            Measurement::Cadence(spm) => is_positive(spm),
            Measurement::ElevationGain(m) => m.is_finite() && m >= 0.0,
        };
        if !base_ok || !measurement_ok {
            return None;
        }

        let details = WorkoutDetails::derive(measurement, self.distance_km, self.duration_min);
        let description = if self.description.trim().is_empty() {
            format_description(
                details.workout_type(),
                &self.created_at.with_timezone(&Local).date_naive(),
            )
        } else {
            self.description
        };
        Some(Self {
            description,
            details,
            ..self
        })
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.details.workout_type()
    }
}

#[inline]
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::create(Coords::new(51.5, -0.1), 5.0, 30.0, Measurement::Cadence(180.0));
        match w.details() {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => {
                assert_eq!(*cadence_spm, 180.0);
                assert_eq!(*pace_min_per_km, 6.0);
            }
            other => panic!("expected running, got {:?}", other),
        }
        assert_eq!(w.workout_type(), WorkoutType::Running);
        assert!(w.description().starts_with("Running on "));
    }

    #[test]
    fn cycling_speed_is_km_per_hour() {
        let w = Workout::create(
            Coords::new(0.0, 0.0),
            20.0,
            60.0,
            Measurement::ElevationGain(300.0),
        );
        match w.details() {
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_km_per_h,
            } => {
                assert_eq!(*elevation_gain_m, 300.0);
                assert_eq!(*speed_km_per_h, 20.0);
            }
            other => panic!("expected cycling, got {:?}", other),
        }
    }

    #[test]
    fn derived_metrics_are_not_rounded() {
        assert_eq!(compute_running_pace(3.0, 20.0), 20.0 / 3.0);
        assert_eq!(compute_cycling_speed(7.0, 45.0), 7.0 / (45.0 / 60.0));
    }

    #[test]
    fn description_uses_month_name_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            format_description(WorkoutType::Cycling, &date),
            "Cycling on March 7"
        );
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(
            format_description(WorkoutType::Running, &date),
            "Running on December 31"
        );
    }

    #[test]
    fn description_follows_local_creation_date() {
        let created = at(2024, 6, 15);
        let w = Workout::with_identity(
            WorkoutId::from("w1"),
            created,
            Coords::new(1.0, 2.0),
            10.0,
            50.0,
            Measurement::Cadence(170.0),
        );
        let local = created.with_timezone(&Local);
        assert!(w.description().contains(MONTHS[local.month0() as usize]));
        assert!(w.description().ends_with(&local.day().to_string()));
    }

    #[test]
    fn generated_ids_differ() {
        let now = Utc::now();
        let a = WorkoutId::generate(now);
        let b = WorkoutId::generate(now);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with(&format!("{:x}-", now.timestamp_millis())));
    }

    #[test]
    fn serializes_with_type_tag_and_coordinate_array() {
        let w = Workout::with_identity(
            WorkoutId::from("abc"),
            at(2024, 4, 14),
            Coords::new(51.5, -0.12),
            5.0,
            30.0,
            Measurement::Cadence(180.0),
        );
        let value = serde_json::to_value(&w).unwrap();
        assert_eq!(value["type"], "running");
        assert_eq!(value["id"], "abc");
        assert_eq!(value["coords"], serde_json::json!([51.5, -0.12]));
        assert_eq!(value["cadence"], 180.0);
        assert_eq!(value["pace"], 6.0);
        assert!(value.get("elevationGain").is_none());
    }

    #[test]
    fn rehydrate_recomputes_metric_and_keeps_description() {
        let json = r#"{
            "date": "2024-02-01T08:00:00.000Z",
            "id": "7066123456",
            "coords": [40.0, -3.7],
            "distance": 27,
            "duration": 90,
            "type": "cycling",
            "elevationGain": 523,
            "speed": 999,
            "description": "Cycling on February 1"
        }"#;
        let raw: Workout = serde_json::from_str(json).unwrap();
        let w = raw.rehydrate().unwrap();
        assert_eq!(w.description(), "Cycling on February 1");
        match w.details() {
            WorkoutDetails::Cycling { speed_km_per_h, .. } => assert_eq!(*speed_km_per_h, 18.0),
            other => panic!("expected cycling, got {:?}", other),
        }
    }

    #[test]
    fn rehydrate_derives_missing_description() {
        let json = r#"{"date":"2024-05-20T12:00:00Z","id":"x","coords":[0,0],
            "distance":4,"duration":24,"type":"running","cadence":160}"#;
        let w: Workout = serde_json::from_str(json).unwrap();
        let w = w.rehydrate().unwrap();
        assert!(w.description().starts_with("Running on May"));
        match w.details() {
            WorkoutDetails::Running { pace_min_per_km, .. } => assert_eq!(*pace_min_per_km, 6.0),
            other => panic!("expected running, got {:?}", other),
        }
    }

    #[test]
    fn rehydrate_rejects_non_positive_records() {
        let json = r#"{"date":"2024-05-20T12:00:00Z","id":"x","coords":[0,0],
            "distance":0,"duration":24,"type":"running","cadence":160}"#;
        let w: Workout = serde_json::from_str(json).unwrap();
        assert!(w.rehydrate().is_none());
    }

    #[test]
    fn rehydrate_rejects_negative_elevation_gain() {
        let json = r#"{"date":"2024-05-20T12:00:00Z","id":"x","coords":[0,0],
            "distance":12,"duration":30,"type":"cycling","elevationGain":-50}"#;
        let w: Workout = serde_json::from_str(json).unwrap();
        assert!(w.rehydrate().is_none());
    }

    #[test]
    fn workout_type_parses_select_values() {
        assert_eq!("running".parse::<WorkoutType>(), Ok(WorkoutType::Running));
        assert_eq!("cycling".parse::<WorkoutType>(), Ok(WorkoutType::Cycling));
        assert!("swimming".parse::<WorkoutType>().is_err());
        assert_eq!(WorkoutType::Cycling.popup_class(), "cycling-popup");
    }
}
