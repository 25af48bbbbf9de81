//! Constants module for geodetic calculations

use std::f64::consts::PI;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Half of PI, the latitude of the north pole in radians
pub const PI_OVER_2: f64 = PI / 2.0;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// WGS84 ellipsoid
/// WGS84 equatorial (semi-major) radius in meters
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;
/// WGS84 polar (semi-minor) radius in meters
pub const WGS84_SEMI_MINOR_M: f64 = 6_356_752.314_245;
/// WGS84 first eccentricity squared, as used by the geocentric latitude shortcut
pub const WGS84_E2: f64 = 0.006_694_379_990_14;

// Spherical Earth
/// IUGG mean Earth radius in meters
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_009.0;

// Inverse transform iteration
/// Convergence bound on sin(latitude) between iterations
pub const ECEF_TOLERANCE: f64 = 1.0e-12;
/// Iteration cap; |height| near an axis length needs about 15 steps
pub const ECEF_MAX_ITERATIONS: u32 = 30;

/// Relative latitude overshoot tolerated (and clamped) before it is an error
pub const LATITUDE_CLAMP_TOLERANCE: f64 = 1.001;

// Look angle
/// Below this squared off-axis distance (m^2) the target is at zenith/nadir
pub const ZENITH_THRESHOLD_M2: f64 = 1.0e-6;
