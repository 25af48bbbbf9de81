//! Approximate local Earth model used by the look-angle algorithm
//!
//! A point is placed at the local Earth radius along the *geocentric*
//! latitude, then lifted by its height along the surface normal computed from
//! the *geodetic* latitude. With the oblate model this agrees with the
//! rigorous transform in [`super::ecef`] to well below a millimeter; the
//! spherical model is off by kilometers and only suits rough estimates.
//!
//! Reference: <https://en.wikipedia.org/wiki/Earth_radius> and
//! <https://en.wikipedia.org/wiki/Latitude#Geocentric_latitude>

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEG2RAD, MEAN_EARTH_RADIUS_M, WGS84_E2, WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M,
};
use crate::coordinates::cartesian::GeocentricPoint;
use crate::coordinates::geodetic::GeodeticCoordinate;

/// Shape of the Earth used by the look-angle algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarthModel {
    /// WGS84 oblate spheroid with the local-radius approximation
    #[default]
    Oblate,
    /// Sphere of the IUGG mean radius; geocentric and geodetic latitude agree
    Spherical,
}

/// A location in the approximate model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint {
    /// Position in meters, Earth-centered
    pub position: GeocentricPoint,
    /// Unit surface normal at the position
    pub normal: GeocentricPoint,
    /// Earth radius under the position in meters
    pub radius: f64,
}

/// Distance from Earth's center to the WGS84 surface at a geodetic latitude
/// (radians)
///
/// The argument is the geodetic latitude, not the geocentric one, even
/// though [`EarthModel::locate`] lays the radius along the geocentric
/// direction. For a surface point of geodetic latitude φ this formula is its
/// exact center distance, so feeding φ places the point on the ellipsoid;
/// feeding the geocentric latitude instead would put it up to about 70 m off.
pub fn earth_radius(latitude: f64) -> f64 {
    let a = WGS84_SEMI_MAJOR_M;
    let b = WGS84_SEMI_MINOR_M;
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let t1 = a * a * cos_lat;
    let t2 = b * b * sin_lat;
    let t3 = a * cos_lat;
    let t4 = b * sin_lat;
    ((t1 * t1 + t2 * t2) / (t3 * t3 + t4 * t4)).sqrt()
}

/// Converts a geodetic latitude to a geocentric latitude, radians
pub fn geocentric_latitude(latitude: f64) -> f64 {
    ((1.0 - WGS84_E2) * latitude.tan()).atan()
}

impl EarthModel {
    /// Earth radius under a geodetic latitude (radians)
    pub fn radius_at(&self, latitude: f64) -> f64 {
        match self {
            EarthModel::Oblate => earth_radius(latitude),
            EarthModel::Spherical => MEAN_EARTH_RADIUS_M,
        }
    }

    /// Latitude (radians) of the radius vector through a geodetic latitude
    pub fn central_latitude(&self, latitude: f64) -> f64 {
        match self {
            EarthModel::Oblate => geocentric_latitude(latitude),
            EarthModel::Spherical => latitude,
        }
    }

    /// Places a point given in degrees and meters
    ///
    /// The longitude is not range checked: the look-angle algorithm feeds
    /// longitude differences through here.
    pub fn locate(&self, latitude: f64, longitude: f64, height: f64) -> LocalPoint {
        let lat = latitude * DEG2RAD;
        let lon = longitude * DEG2RAD;
        // radius at the geodetic latitude, direction at the geocentric one
        let radius = self.radius_at(lat);
        let clat = self.central_latitude(lat);

        let (sin_lon, cos_lon) = lon.sin_cos();
        let (sin_clat, cos_clat) = clat.sin_cos();
        let surface = GeocentricPoint::new(
            radius * cos_lon * cos_clat,
            radius * sin_lon * cos_clat,
            radius * sin_clat,
        );

        let (sin_lat, cos_lat) = lat.sin_cos();
        let normal = GeocentricPoint::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);

        LocalPoint {
            position: surface + normal * height,
            normal,
            radius,
        }
    }

    pub fn locate_coordinate(&self, coordinate: &GeodeticCoordinate) -> LocalPoint {
        self.locate(coordinate.latitude(), coordinate.longitude(), coordinate.height())
    }
}
