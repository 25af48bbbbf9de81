//! Line-of-sight look angle between two geodetic coordinates
//!
//! Distance, azimuth and elevation from an observer to a target, computed on
//! the approximate local Earth model (see [`crate::geodesy::local`]).
//!
//! Azimuth uses a globe-rotation trick: the target is re-expressed in a frame
//! where the observer sits at latitude 0, longitude 0, i.e. at
//! `(radius, 0, 0)`. In that frame `y` is the east component and `z` the north
//! component of the target's offset, so the bearing falls out of a single
//! `atan2`. A target due west of the observer gets an azimuth near 270°.
//!
//! Degenerate geometry never produces NaN. Coincident points yield neither
//! angle. A target at the zenith or nadir yields no azimuth on the equator
//! (and on the spherical model). Elsewhere on the oblate model the geodetic
//! vertical is tilted from the geocentric radius, so an overhead target gets
//! azimuth 0 (north) in the northern hemisphere and 180 in the southern. Missing
//! angles are reported as `None` so the caller can keep its previous pointing.
//!
//! ```rust
//! use geotracker::{GeodeticCoordinate, LookAngleCalculator};
//!
//! let observer = GeodeticCoordinate::new(39.0, -75.0, 4000.0).unwrap();
//! let target = GeodeticCoordinate::new(39.0, -76.0, 12000.0).unwrap();
//!
//! let look = LookAngleCalculator::new().compute(&observer, &target);
//! assert!((look.elevation.unwrap() - 4.88).abs() < 0.01);
//! assert!((look.azimuth.unwrap() - 270.34).abs() < 0.01);
//! ```

use log::debug;
use nalgebra::{Rotation3, Vector3};

use crate::constants::{RAD2DEG, ZENITH_THRESHOLD_M2};
use crate::coordinates::angle::{wrap_360, Direction};
use crate::coordinates::cartesian::GeocentricPoint;
use crate::coordinates::geodetic::GeodeticCoordinate;
use crate::geodesy::EarthModel;

/// Result of one look-angle calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngle {
    /// Straight-line distance in meters
    pub distance: f64,
    /// Degrees from true north in `[0, 360)`; `None` at zenith/nadir
    pub azimuth: Option<f64>,
    /// Degrees above the horizon in `[-90, 90]`; `None` for coincident points
    pub elevation: Option<f64>,
}

impl LookAngle {
    /// Applies this result on top of a previous direction
    ///
    /// Components that could not be computed keep their prior value.
    pub fn direction_from(&self, prior: Direction) -> Direction {
        prior.updated(self.azimuth, self.elevation)
    }
}

/// Computes look angles for a chosen Earth model
#[derive(Debug, Clone, Copy, Default)]
pub struct LookAngleCalculator {
    model: EarthModel,
}

impl LookAngleCalculator {
    /// Calculator on the oblate WGS84 model
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the Earth model
    pub fn with_model(mut self, model: EarthModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> EarthModel {
        self.model
    }

    /// Distance, azimuth and elevation from `observer` to `target`
    pub fn compute(&self, observer: &GeodeticCoordinate, target: &GeodeticCoordinate) -> LookAngle {
        let a = self.model.locate_coordinate(observer);
        let b = self.model.locate_coordinate(target);

        let offset = b.position - a.position;
        let distance = offset.magnitude();

        let rotated = self.rotate_globe(observer, target);
        let azimuth = if rotated.y * rotated.y + rotated.z * rotated.z > ZENITH_THRESHOLD_M2 {
            let theta = rotated.z.atan2(rotated.y) * RAD2DEG;
            Some(wrap_360(90.0 - theta))
        } else {
            None
        };

        // The dot product of the line of sight and the observer's normal is
        // cos(zenith angle); elevation is its complement.
        let elevation = offset.normalize().map(|line_of_sight| {
            let cos_zenith = line_of_sight.dot(&a.normal).clamp(-1.0, 1.0);
            90.0 - cos_zenith.acos() * RAD2DEG
        });

        debug!(
            "look angle {} -> {}: distance {:.3} m, azimuth {:?}, elevation {:?}",
            observer, target, distance, azimuth, elevation
        );

        LookAngle {
            distance,
            azimuth,
            elevation,
        }
    }

    /// Target position in a frame where the observer is at latitude 0,
    /// longitude 0
    ///
    /// The longitude shift is a rotation about z folded into the target's
    /// longitude. The remaining rotation about y by the observer's central
    /// latitude brings the observer down onto the equator.
    fn rotate_globe(
        &self,
        observer: &GeodeticCoordinate,
        target: &GeodeticCoordinate,
    ) -> GeocentricPoint {
        let shifted = self
            .model
            .locate(
                target.latitude(),
                target.longitude() - observer.longitude(),
                target.height(),
            )
            .position;

        let central = self.model.central_latitude(observer.latitude_radians());
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), central);
        GeocentricPoint::from(rotation * shifted.to_vector3())
    }
}

/// Look angle on the default oblate model
pub fn look_angle(observer: &GeodeticCoordinate, target: &GeodeticCoordinate) -> LookAngle {
    LookAngleCalculator::new().compute(observer, target)
}
