//! Geodetic coordinates: latitude, longitude and height on the reference
//! ellipsoid, as reported by GPS.

use serde::{Deserialize, Serialize};

use super::angle::wrap_180;
use super::cartesian::GeocentricPoint;
use crate::constants::{DEG2RAD, RAD2DEG};
use crate::geodesy::{self, Ellipsoid};
use crate::{GeotrackerError, Result};

/// A validated geodetic coordinate
///
/// Latitude is in `[-90, 90]` degrees, longitude in `(-180, 180]` degrees and
/// height in meters above the reference ellipsoid. The fields are private so
/// that every instance has passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct GeodeticCoordinate {
    latitude: f64,
    longitude: f64,
    height: f64,
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    height: f64,
}

impl TryFrom<RawCoordinate> for GeodeticCoordinate {
    type Error = GeotrackerError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        GeodeticCoordinate::new(raw.latitude, raw.longitude, raw.height)
    }
}

impl From<GeodeticCoordinate> for RawCoordinate {
    fn from(c: GeodeticCoordinate) -> Self {
        RawCoordinate {
            latitude: c.latitude,
            longitude: c.longitude,
            height: c.height,
        }
    }
}

impl GeodeticCoordinate {
    /// Creates a coordinate from degrees and meters
    ///
    /// A longitude of exactly -180 is stored as 180.
    ///
    /// # Errors
    ///
    /// [`GeotrackerError::InvalidCoordinate`] if the latitude is outside
    /// `[-90, 90]`, the longitude outside `[-180, 180]`, or any component is
    /// not finite.
    ///
    /// ```rust
    /// use geotracker::GeodeticCoordinate;
    ///
    /// let c = GeodeticCoordinate::new(39.0, -75.0, 4000.0).unwrap();
    /// assert_eq!(c.longitude(), -75.0);
    /// assert!(GeodeticCoordinate::new(95.0, 0.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeotrackerError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeotrackerError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !height.is_finite() {
            return Err(GeotrackerError::InvalidCoordinate(format!(
                "height {} is not finite",
                height
            )));
        }
        Ok(GeodeticCoordinate {
            latitude,
            longitude: wrap_180(longitude),
            height,
        })
    }

    /// Like [`GeodeticCoordinate::new`], but wraps any finite longitude into
    /// `(-180, 180]` instead of rejecting it
    pub fn wrapped(latitude: f64, longitude: f64, height: f64) -> Result<Self> {
        if !longitude.is_finite() {
            return Err(GeotrackerError::InvalidCoordinate(format!(
                "longitude {} is not finite",
                longitude
            )));
        }
        Self::new(latitude, wrap_180(longitude), height)
    }

    /// Creates a coordinate from radians and meters
    pub fn from_radians(latitude: f64, longitude: f64, height: f64) -> Result<Self> {
        Self::wrapped(latitude * RAD2DEG, longitude * RAD2DEG, height)
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Height above the ellipsoid in meters
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn latitude_radians(&self) -> f64 {
        self.latitude * DEG2RAD
    }

    pub fn longitude_radians(&self) -> f64 {
        self.longitude * DEG2RAD
    }

    /// Same horizontal position at a different height
    pub fn with_height(&self, height: f64) -> Result<Self> {
        Self::new(self.latitude, self.longitude, height)
    }

    /// Converts to ECEF with the rigorous ellipsoid transform
    ///
    /// # Errors
    ///
    /// [`GeotrackerError::Conversion`] carrying every fault found, e.g. a
    /// degenerate ellipsoid.
    pub fn to_geocentric(&self, ellipsoid: &Ellipsoid) -> Result<GeocentricPoint> {
        geodesy::geodetic_to_ecef(
            ellipsoid,
            self.latitude_radians(),
            self.longitude_radians(),
            self.height,
        )
        .map_err(GeotrackerError::Conversion)
    }
}

impl std::fmt::Display for GeodeticCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.6}° {}, {:.6}° {}, {:.1}m",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew,
            self.height
        )
    }
}
