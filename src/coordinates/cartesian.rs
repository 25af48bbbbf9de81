//! # Geocentric Cartesian Module
//!
//! [`GeocentricPoint`] is a position in the Earth-Centered, Earth-Fixed
//! (ECEF) frame, in meters:
//! - **X-axis**: through the intersection of the equator and the prime meridian
//! - **Y-axis**: through the equator at 90° east
//! - **Z-axis**: through the north pole
//!
//! Points have no lifecycle of their own. They are derived from a
//! [`GeodeticCoordinate`] whenever a calculation needs them and dropped
//! afterwards.
//!
//! The same type also carries unit vectors (surface normals, line-of-sight
//! directions) in the angle algorithm.
//!
//! ```rust
//! use geotracker::coordinates::cartesian::GeocentricPoint;
//!
//! let a = GeocentricPoint::new(3.0, 0.0, 0.0);
//! let b = GeocentricPoint::new(0.0, 4.0, 0.0);
//! assert_eq!(a.distance_to(&b), 5.0);
//! ```

use nalgebra::Vector3;

use super::geodetic::GeodeticCoordinate;
use crate::geodesy::{self, Ellipsoid};
use crate::{GeotrackerError, Result};

/// A point (or direction) in the ECEF frame, meters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeocentricPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl GeocentricPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        GeocentricPoint { x, y, z }
    }

    /// Euclidean distance from Earth's center
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Straight-line distance to another point
    pub fn distance_to(&self, other: &GeocentricPoint) -> f64 {
        (*self - *other).magnitude()
    }

    /// Unit vector in the same direction, `None` for the zero vector
    pub fn normalize(&self) -> Option<GeocentricPoint> {
        let mag_sq = self.x * self.x + self.y * self.y + self.z * self.z;
        if mag_sq == 0.0 {
            None
        } else {
            Some(*self / mag_sq.sqrt())
        }
    }

    pub fn dot(&self, other: &GeocentricPoint) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Converts back to geodetic coordinates with the rigorous iterative
    /// transform
    ///
    /// # Errors
    ///
    /// Returns [`GeotrackerError::Degenerate`] when the iteration hits a zero
    /// denominator, and [`GeotrackerError::InvalidCoordinate`] if the result
    /// cannot be represented as a geodetic coordinate.
    pub fn to_geodetic(&self, ellipsoid: &Ellipsoid) -> Result<GeodeticCoordinate> {
        let solution = geodesy::ecef_to_geodetic(ellipsoid, self);
        if solution.is_degenerate() {
            return Err(GeotrackerError::Degenerate(format!(
                "no geodetic solution for ({}, {}, {})",
                self.x, self.y, self.z
            )));
        }
        GeodeticCoordinate::from_radians(solution.latitude, solution.longitude, solution.height)
    }

    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_vector3(vec: Vector3<f64>) -> Self {
        GeocentricPoint {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
    }
}

impl From<Vector3<f64>> for GeocentricPoint {
    fn from(vec: Vector3<f64>) -> Self {
        GeocentricPoint::from_vector3(vec)
    }
}

impl std::ops::Add for GeocentricPoint {
    type Output = GeocentricPoint;

    fn add(self, other: GeocentricPoint) -> GeocentricPoint {
        GeocentricPoint::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for GeocentricPoint {
    type Output = GeocentricPoint;

    fn sub(self, other: GeocentricPoint) -> GeocentricPoint {
        GeocentricPoint::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f64> for GeocentricPoint {
    type Output = GeocentricPoint;

    fn mul(self, scalar: f64) -> GeocentricPoint {
        GeocentricPoint::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Div<f64> for GeocentricPoint {
    type Output = GeocentricPoint;

    fn div(self, scalar: f64) -> GeocentricPoint {
        GeocentricPoint::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}
