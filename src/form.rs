//! Workout form input: raw field text in, validated workout parameters out.

use crate::workout::{Measurement, WorkoutType};
use std::fmt;

/// Names of the numeric form fields, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    ElevationGain,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Distance => "Distance",
            Field::Duration => "Duration",
            Field::Cadence => "Cadence",
            Field::ElevationGain => "Elevation gain",
        })
    }
}

/// Why a form submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotFinite { field: Field },
    NotPositive { field: Field },
    Negative { field: Field },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotFinite { field } => {
                write!(f, "{} has to be a number", field)
            }
            ValidationError::NotPositive { field } => {
                write!(f, "{} has to be a positive number", field)
            }
            ValidationError::Negative { field } => {
                write!(f, "{} cannot be negative", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Raw contents of the workout form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    pub workout_type: WorkoutType,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Form values that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedWorkout {
    pub distance_km: f64,
    pub duration_min: f64,
    pub measurement: Measurement,
}

impl WorkoutForm {
    /// Check every field the selected workout type needs.
    ///
    /// All of them must be finite. Distance, duration and cadence must be
    /// strictly positive; elevation gain may be zero but not negative.
    pub fn validate(&self) -> Result<ValidatedWorkout, ValidationError> {
        let distance_km = parse_number(&self.distance);
        let duration_min = parse_number(&self.duration);

        let measurement = match self.workout_type {
            WorkoutType::Running => {
                let cadence = parse_number(&self.cadence);
                require_finite(&[
                    (Field::Distance, distance_km),
                    (Field::Duration, duration_min),
                    (Field::Cadence, cadence),
                ])?;
                require_positive(&[
                    (Field::Distance, distance_km),
                    (Field::Duration, duration_min),
                    (Field::Cadence, cadence),
                ])?;
                Measurement::Cadence(cadence)
            }
            WorkoutType::Cycling => {
                let elevation = parse_number(&self.elevation);
                require_finite(&[
                    (Field::Distance, distance_km),
                    (Field::Duration, duration_min),
                    (Field::ElevationGain, elevation),
                ])?;
                require_positive(&[
                    (Field::Distance, distance_km),
                    (Field::Duration, duration_min),
                ])?;
                if elevation < 0.0 {
                    return Err(ValidationError::Negative {
                        field: Field::ElevationGain,
                    });
                }
                Measurement::ElevationGain(elevation)
            }
        };

        Ok(ValidatedWorkout {
            distance_km,
            duration_min,
            measurement,
        })
    }
}

/// Parse field text the way a browser's `Number()` does: blank is `0`,
/// `0x`/`0o`/`0b` prefixes select the radix, anything unparseable is `NaN`.
///
/// `Infinity` is read as `NaN`; both fail validation the same way.
pub fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(v) = parse_prefixed_integer(trimmed) {
        return v;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if trimmed.chars().all(|c| c.is_ascii_digit() || "+-.eE".contains(c)) => v,
        _ => f64::NAN,
    }
}

/// Unsigned `0x1F` / `0o17` / `0b101` literals.
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let lower = text.get(..2)?.to_ascii_lowercase();
    let radix = match lower.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    Some(
        u64::from_str_radix(&text[2..], radix)
            .map(|v| v as f64)
            .unwrap_or(f64::NAN),
    )
}

fn require_finite(values: &[(Field, f64)]) -> Result<(), ValidationError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, _)) => Err(ValidationError::NotFinite { field }),
        None => Ok(()),
    }
}

fn require_positive(values: &[(Field, f64)]) -> Result<(), ValidationError> {
    match values.iter().find(|(_, v)| *v <= 0.0) {
        Some(&(field, _)) => Err(ValidationError::NotPositive { field }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(distance: &str, duration: &str, cadence: &str) -> WorkoutForm {
        WorkoutForm {
            workout_type: WorkoutType::Running,
            distance: distance.into(),
            duration: duration.into(),
            cadence: cadence.into(),
            elevation: String::new(),
        }
    }

    fn cycling(distance: &str, duration: &str, elevation: &str) -> WorkoutForm {
        WorkoutForm {
            workout_type: WorkoutType::Cycling,
            distance: distance.into(),
            duration: duration.into(),
            cadence: String::new(),
            elevation: elevation.into(),
        }
    }

    #[test]
    fn parses_like_browser_number() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("  "), 0.0);
        assert_eq!(parse_number(" 5.5 "), 5.5);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert!(parse_number("abc").is_nan());
        assert!(parse_number("5km").is_nan());
        assert!(parse_number("inf").is_nan());
        assert!(parse_number("NaN").is_nan());
    }

    #[test]
    fn parses_radix_prefixed_integers() {
        assert_eq!(parse_number("0x10"), 16.0);
        assert_eq!(parse_number("0X1f"), 31.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert!(parse_number("0x").is_nan());
        assert!(parse_number("0xZZ").is_nan());
        assert!(parse_number("-0x10").is_nan());
        assert_eq!(parse_number("0.5"), 0.5);
    }

    #[test]
    fn accepts_valid_running_form() {
        let v = running("5", "30", "180").validate().unwrap();
        assert_eq!(v.distance_km, 5.0);
        assert_eq!(v.duration_min, 30.0);
        assert_eq!(v.measurement, Measurement::Cadence(180.0));
    }

    #[test]
    fn rejects_zero_negative_and_text_distance() {
        assert_eq!(
            running("0", "30", "180").validate(),
            Err(ValidationError::NotPositive {
                field: Field::Distance
            })
        );
        assert_eq!(
            running("-2", "30", "180").validate(),
            Err(ValidationError::NotPositive {
                field: Field::Distance
            })
        );
        assert_eq!(
            running("five", "30", "180").validate(),
            Err(ValidationError::NotFinite {
                field: Field::Distance
            })
        );
    }

    #[test]
    fn running_requires_positive_cadence() {
        assert_eq!(
            running("5", "30", "").validate(),
            Err(ValidationError::NotPositive {
                field: Field::Cadence
            })
        );
    }

    #[test]
    fn cycling_allows_flat_rides_but_not_negative_elevation() {
        let v = cycling("20", "60", "0").validate().unwrap();
        assert_eq!(v.measurement, Measurement::ElevationGain(0.0));
        assert_eq!(
            cycling("20", "60", "-5").validate(),
            Err(ValidationError::Negative {
                field: Field::ElevationGain
            })
        );
        assert_eq!(
            cycling("20", "60", "lots").validate(),
            Err(ValidationError::NotFinite {
                field: Field::ElevationGain
            })
        );
    }

    #[test]
    fn cycling_ignores_cadence_field() {
        let mut form = cycling("20", "60", "300");
        form.cadence = "garbage".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ValidationError::NotPositive {
            field: Field::Duration,
        };
        assert_eq!(err.to_string(), "Duration has to be a positive number");
    }
}
