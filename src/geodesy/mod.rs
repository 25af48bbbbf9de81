//! Geodesy kernel
//!
//! Two Earth models live here:
//!
//! - [`ecef`]: the rigorous, ellipsoid-exact geodetic ⇄ ECEF transform
//!   (forward closed form, iterative inverse)
//! - [`local`]: the local-radius plus geocentric-latitude approximation that
//!   the look-angle algorithm is built on
//!
//! Look angles are computed on [`local`]; distances and conversions exposed on
//! the coordinate types use [`ecef`]. No single calculation mixes the two.

pub mod ecef;
pub mod local;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::constants::{WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M};
use crate::{GeotrackerError, Result};

pub use ecef::{ecef_to_geodetic, geodetic_to_ecef, GeodeticSolution};
pub use local::{EarthModel, LocalPoint};

/// Combinable error code of the rigorous transform
///
/// Each detected fault sets one bit, so a single call reports every problem
/// with its inputs at once.
///
/// ```rust
/// use geotracker::geodesy::ConversionErrors;
///
/// let errors = ConversionErrors::LATITUDE | ConversionErrors::SEMI_MAJOR;
/// assert!(errors.contains(ConversionErrors::LATITUDE));
/// assert!(!errors.contains(ConversionErrors::LONGITUDE));
/// assert_eq!(errors.bits(), 0x05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConversionErrors(u16);

impl ConversionErrors {
    pub const NONE: ConversionErrors = ConversionErrors(0x0000);
    /// Latitude outside [-90, 90] degrees
    pub const LATITUDE: ConversionErrors = ConversionErrors(0x0001);
    /// Longitude outside [-180, 360] degrees or not finite
    pub const LONGITUDE: ConversionErrors = ConversionErrors(0x0002);
    /// Semi-major axis less than or equal to zero
    pub const SEMI_MAJOR: ConversionErrors = ConversionErrors(0x0004);
    /// Semi-minor axis less than or equal to zero
    pub const SEMI_MINOR: ConversionErrors = ConversionErrors(0x0008);
    /// Semi-major axis less than semi-minor axis
    pub const SEMI_MAJOR_LESS_THAN_SEMI_MINOR: ConversionErrors = ConversionErrors(0x0010);

    const NAMES: [(ConversionErrors, &'static str); 5] = [
        (Self::LATITUDE, "latitude out of range"),
        (Self::LONGITUDE, "longitude out of range"),
        (Self::SEMI_MAJOR, "semi-major axis <= 0"),
        (Self::SEMI_MINOR, "semi-minor axis <= 0"),
        (Self::SEMI_MAJOR_LESS_THAN_SEMI_MINOR, "semi-major axis < semi-minor axis"),
    ];

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: ConversionErrors) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ConversionErrors {
    type Output = ConversionErrors;

    fn bitor(self, rhs: ConversionErrors) -> ConversionErrors {
        ConversionErrors(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConversionErrors {
    fn bitor_assign(&mut self, rhs: ConversionErrors) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ConversionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no error");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{} (0x{:04x})", names.join(", "), self.0)
    }
}

/// Reference ellipsoid (oblate spheroid) parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    semi_major: f64,
    semi_minor: f64,
}

impl Ellipsoid {
    /// The WGS84 ellipsoid used by GPS
    pub const WGS84: Ellipsoid = Ellipsoid::from_axes(WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M);

    /// Creates an ellipsoid without validating the axes
    ///
    /// Meant for constants; the rigorous transform still reports bad axes
    /// through [`ConversionErrors`].
    pub const fn from_axes(semi_major: f64, semi_minor: f64) -> Self {
        Ellipsoid {
            semi_major,
            semi_minor,
        }
    }

    /// Creates a validated ellipsoid
    ///
    /// # Errors
    ///
    /// [`GeotrackerError::Conversion`] with the axis flags that apply.
    pub fn new(semi_major: f64, semi_minor: f64) -> Result<Self> {
        let ellipsoid = Self::from_axes(semi_major, semi_minor);
        let errors = ellipsoid.parameter_errors();
        if errors.is_empty() {
            Ok(ellipsoid)
        } else {
            Err(GeotrackerError::Conversion(errors))
        }
    }

    /// Axis faults of this ellipsoid, empty when usable
    pub fn parameter_errors(&self) -> ConversionErrors {
        let mut errors = ConversionErrors::NONE;
        if !(self.semi_major > 0.0) {
            errors |= ConversionErrors::SEMI_MAJOR;
        }
        if !(self.semi_minor > 0.0) {
            errors |= ConversionErrors::SEMI_MINOR;
        }
        if self.semi_major < self.semi_minor {
            errors |= ConversionErrors::SEMI_MAJOR_LESS_THAN_SEMI_MINOR;
        }
        errors
    }

    /// Semi-major (equatorial) axis `a` in meters
    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    /// Semi-minor (polar) axis `b` in meters
    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    /// First eccentricity squared, `(a² - b²) / a²`
    pub fn eccentricity_squared(&self) -> f64 {
        let a2 = self.semi_major * self.semi_major;
        (a2 - self.semi_minor * self.semi_minor) / a2
    }

    /// Second eccentricity squared, `(a² - b²) / b²`
    pub fn second_eccentricity_squared(&self) -> f64 {
        let b2 = self.semi_minor * self.semi_minor;
        (self.semi_major * self.semi_major - b2) / b2
    }

    /// Flattening, `(a - b) / a`
    pub fn flattening(&self) -> f64 {
        (self.semi_major - self.semi_minor) / self.semi_major
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}
