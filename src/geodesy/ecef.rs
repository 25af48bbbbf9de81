//! Rigorous geodetic ⇄ ECEF conversion
//!
//! The forward direction is closed form. The inverse iterates sin/cos of the
//! latitude (Hannover iterative method, after Wenzel 1985) until the change
//! in sin(latitude) drops below 1e-12, which normally takes two or three
//! steps for heights within a few kilometers of the ellipsoid.
//!
//! Angles are in radians on both sides of this module; the degree based API
//! lives on [`GeodeticCoordinate`](crate::GeodeticCoordinate).

use log::trace;
use std::f64::consts::PI;

use super::{ConversionErrors, Ellipsoid};
use crate::constants::{
    ECEF_MAX_ITERATIONS, ECEF_TOLERANCE, LATITUDE_CLAMP_TOLERANCE, PI_OVER_2, TAU,
};
use crate::coordinates::angle::wrap_pi;
use crate::coordinates::cartesian::GeocentricPoint;

/// Result of the inverse transform, radians and meters
///
/// A zero denominator during the iteration produces the degenerate sentinel
/// (all three fields infinite). This is a defined outcome, not a panic; check
/// [`GeodeticSolution::is_degenerate`] before using the values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticSolution {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
}

impl GeodeticSolution {
    const DEGENERATE: GeodeticSolution = GeodeticSolution {
        latitude: f64::INFINITY,
        longitude: f64::INFINITY,
        height: f64::INFINITY,
    };

    pub fn is_degenerate(&self) -> bool {
        self.latitude.is_infinite() || self.longitude.is_infinite() || self.height.is_infinite()
    }
}

/// Converts geodetic latitude/longitude (radians) and height (meters) to ECEF
///
/// A latitude that overshoots ±π/2 by less than 0.1% is treated as rounding
/// and clamped to the pole. Longitude is normalized into `(-π, π]`.
///
/// # Errors
///
/// Every fault found is OR-ed into the returned [`ConversionErrors`]; no
/// point is produced in that case.
///
/// ```rust
/// use geotracker::geodesy::{geodetic_to_ecef, ConversionErrors, Ellipsoid};
///
/// let err = geodetic_to_ecef(&Ellipsoid::WGS84, 95f64.to_radians(), 0.0, 0.0).unwrap_err();
/// assert!(err.contains(ConversionErrors::LATITUDE));
/// ```
pub fn geodetic_to_ecef(
    ellipsoid: &Ellipsoid,
    latitude: f64,
    longitude: f64,
    height: f64,
) -> Result<GeocentricPoint, ConversionErrors> {
    let mut errors = ellipsoid.parameter_errors();

    let mut lat = latitude;
    if lat < -PI_OVER_2 && lat > -LATITUDE_CLAMP_TOLERANCE * PI_OVER_2 {
        lat = -PI_OVER_2;
    } else if lat > PI_OVER_2 && lat < LATITUDE_CLAMP_TOLERANCE * PI_OVER_2 {
        lat = PI_OVER_2;
    } else if !(-PI_OVER_2..=PI_OVER_2).contains(&lat) {
        // also catches NaN
        errors |= ConversionErrors::LATITUDE;
    }

    // sin/cos would wrap any angle, but reject values no caller should produce
    if !(-PI..=TAU).contains(&longitude) {
        errors |= ConversionErrors::LONGITUDE;
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let lon = wrap_pi(longitude);
    let e2 = ellipsoid.eccentricity_squared();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let rn = ellipsoid.semi_major() / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    Ok(GeocentricPoint::new(
        (rn + height) * cos_lat * lon.cos(),
        (rn + height) * cos_lat * lon.sin(),
        (rn * (1.0 - e2) + height) * sin_lat,
    ))
}

/// Converts an ECEF point back to geodetic latitude/longitude (radians) and
/// height (meters)
///
/// Every point has at least two mathematical solutions; the one with the
/// smallest |height| is returned. Points on the polar axis get longitude 0,
/// and Earth's center maps to latitude +π/2 with height `-b`.
pub fn ecef_to_geodetic(ellipsoid: &Ellipsoid, point: &GeocentricPoint) -> GeodeticSolution {
    let a = ellipsoid.semi_major();
    let e2 = ellipsoid.eccentricity_squared();
    let (x, y, z) = (point.x, point.y, point.z);

    let p = (x * x + y * y).sqrt();
    let rr = (x * x + y * y + z * z).sqrt();

    let longitude = if p / a < ECEF_TOLERANCE {
        if rr / a < ECEF_TOLERANCE {
            return GeodeticSolution {
                latitude: PI_OVER_2,
                longitude: 0.0,
                height: -ellipsoid.semi_minor(),
            };
        }
        0.0
    } else {
        y.atan2(x)
    };

    // sin and cos of the geocentric latitude
    let ct = z / rr;
    let st = p / rr;

    let denominator = 1.0 - e2 * (2.0 - e2) * st * st;
    if denominator == 0.0 {
        return GeodeticSolution::DEGENERATE;
    }
    let mut rx = 1.0 / denominator.sqrt();
    let mut cphi0 = st * (1.0 - e2) * rx;
    let mut sphi0 = ct * rx;

    let mut height;
    let mut cphi;
    let mut sphi;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let rn = a / (1.0 - e2 * sphi0 * sphi0).sqrt();
        height = p * cphi0 + z * sphi0 - rn * (1.0 - e2 * sphi0 * sphi0);

        if rn + height == 0.0 {
            return GeodeticSolution::DEGENERATE;
        }
        let rk = e2 * rn / (rn + height);

        let denominator = 1.0 - rk * (2.0 - rk) * st * st;
        if denominator == 0.0 {
            return GeodeticSolution::DEGENERATE;
        }
        rx = 1.0 / denominator.sqrt();

        cphi = st * (1.0 - rk) * rx;
        sphi = ct * rx;
        // sin(latitude(i) - latitude(i-1)) by the addition theorem
        let sdphi = sphi * cphi0 - cphi * sphi0;
        cphi0 = cphi;
        sphi0 = sphi;

        if sdphi * sdphi <= ECEF_TOLERANCE * ECEF_TOLERANCE || iterations >= ECEF_MAX_ITERATIONS {
            break;
        }
    }
    trace!("ecef_to_geodetic converged after {} iterations", iterations);

    GeodeticSolution {
        latitude: sphi.atan2(cphi.abs()),
        longitude,
        height,
    }
}
