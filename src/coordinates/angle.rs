//! # Angle and Direction Module
//!
//! Angle wrapping helpers and the [`Direction`] value type, the az/el pair an
//! observer points along.
//!
//! ## Conventions
//!
//! - Azimuth is measured in degrees clockwise from true north, in `[0, 360)`
//! - Elevation is measured in degrees above the local horizon, in `[-90, 90]`
//! - Longitudes are wrapped into `(-180, 180]` degrees or `(-π, π]` radians
//!
//! ## Examples
//!
//! ```rust
//! use geotracker::coordinates::angle::{wrap_180, wrap_360, Direction};
//!
//! assert_eq!(wrap_360(-90.0), 270.0);
//! assert_eq!(wrap_180(-180.0), 180.0);
//!
//! let east = Direction::new(450.0, 10.0);
//! assert_eq!(east.azimuth, 90.0);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::TAU;
use crate::{GeotrackerError, Result};

/// Wraps an angle in degrees into `[0, 360)`
pub fn wrap_360(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angle in degrees into `(-180, 180]`
pub fn wrap_180(degrees: f64) -> f64 {
    let wrapped = wrap_360(degrees);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Wraps an angle in radians into `(-π, π]`
pub fn wrap_pi(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Direction from an observer's vantage point
///
/// A direction is what a gimbal, antenna or camera is commanded to point at:
/// the azimuth from true north and the elevation above the horizon. It is a
/// plain value type; equality is component-wise.
///
/// Deserialized values are normalized like [`Direction::new`]; non-finite
/// components are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDirection", into = "RawDirection")]
pub struct Direction {
    /// Degrees clockwise from true north, `[0, 360)`
    pub azimuth: f64,
    /// Degrees above the local horizon, `[-90, 90]`
    pub elevation: f64,
}

#[derive(Serialize, Deserialize)]
struct RawDirection {
    azimuth: f64,
    elevation: f64,
}

impl TryFrom<RawDirection> for Direction {
    type Error = GeotrackerError;

    fn try_from(raw: RawDirection) -> Result<Self> {
        Direction::checked(raw.azimuth, raw.elevation)
    }
}

impl From<Direction> for RawDirection {
    fn from(d: Direction) -> Self {
        RawDirection {
            azimuth: d.azimuth,
            elevation: d.elevation,
        }
    }
}

impl Direction {
    /// Like [`Direction::new`], but rejects NaN and infinite components
    pub fn checked(azimuth: f64, elevation: f64) -> Result<Self> {
        if !azimuth.is_finite() || !elevation.is_finite() {
            return Err(GeotrackerError::InvalidCoordinate(format!(
                "direction az {} el {} is not finite",
                azimuth, elevation
            )));
        }
        Ok(Direction::new(azimuth, elevation))
    }

    /// Re-applies azimuth wrapping and elevation clamping
    ///
    /// The fields are public, so a direction built by hand may be out of
    /// range.
    pub fn normalized(self) -> Self {
        Direction::new(self.azimuth, self.elevation)
    }

    /// Creates a direction, wrapping the azimuth and clamping the elevation
    ///
    /// ```rust
    /// use geotracker::coordinates::angle::Direction;
    ///
    /// let d = Direction::new(-10.0, 95.0);
    /// assert_eq!(d.azimuth, 350.0);
    /// assert_eq!(d.elevation, 90.0);
    /// ```
    pub fn new(azimuth: f64, elevation: f64) -> Self {
        Direction {
            azimuth: wrap_360(azimuth),
            elevation: elevation.clamp(-90.0, 90.0),
        }
    }

    /// Returns a copy with the supplied components replaced
    ///
    /// `None` leaves the corresponding component at its current value. This
    /// is how degenerate look-angle results (target at zenith, coincident
    /// points) keep the previous pointing instead of producing NaN.
    pub fn updated(self, azimuth: Option<f64>, elevation: Option<f64>) -> Self {
        Direction {
            azimuth: azimuth.unwrap_or(self.azimuth),
            elevation: elevation.unwrap_or(self.elevation),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "az {:.4}°, el {:.4}°", self.azimuth, self.elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(360.0, 0.0)]
    #[case(-90.0, 270.0)]
    #[case(725.0, 5.0)]
    #[case(-1e-17, 0.0)]
    fn test_wrap_360(#[case] input: f64, #[case] expected: f64) {
        let wrapped = wrap_360(input);
        assert!((0.0..360.0).contains(&wrapped));
        assert_abs_diff_eq!(wrapped, expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(180.0, 180.0)]
    #[case(-180.0, 180.0)]
    #[case(190.0, -170.0)]
    #[case(-190.0, 170.0)]
    #[case(540.0, 180.0)]
    fn test_wrap_180(#[case] input: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(wrap_180(input), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_pi_keeps_pi() {
        assert_abs_diff_eq!(wrap_pi(PI), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(wrap_pi(-PI), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(wrap_pi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_direction_equality_is_componentwise() {
        assert_eq!(Direction::new(90.0, 10.0), Direction::new(90.0, 10.0));
        assert_ne!(Direction::new(90.0, 10.0), Direction::new(90.0, 11.0));
        assert_ne!(Direction::new(91.0, 10.0), Direction::new(90.0, 10.0));
    }

    #[test]
    fn test_deserialize_normalizes() {
        let d: Direction =
            serde_json::from_str(r#"{"azimuth": 720.0, "elevation": 200.0}"#).unwrap();
        assert_eq!(d, Direction::new(0.0, 90.0));
        let d: Direction =
            serde_json::from_str(r#"{"azimuth": -90.0, "elevation": -91.0}"#).unwrap();
        assert_eq!(d, Direction::new(270.0, -90.0));
    }

    #[test]
    fn test_checked_rejects_non_finite() {
        assert!(Direction::checked(f64::NAN, 0.0).is_err());
        assert!(Direction::checked(0.0, f64::INFINITY).is_err());
        assert_eq!(Direction::checked(365.0, 5.0).unwrap(), Direction::new(5.0, 5.0));
    }

    #[test]
    fn test_normalized_fixes_hand_built_values() {
        let raw = Direction {
            azimuth: 450.0,
            elevation: -120.0,
        };
        assert_eq!(raw.normalized(), Direction::new(90.0, -90.0));
    }

    #[test]
    fn test_direction_updated_keeps_missing_components() {
        let d = Direction::new(45.0, 5.0);
        assert_eq!(d.updated(None, None), d);
        assert_eq!(d.updated(Some(90.0), None), Direction::new(90.0, 5.0));
        assert_eq!(d.updated(None, Some(-3.0)), Direction::new(45.0, -3.0));
    }
}
