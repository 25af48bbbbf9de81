pub mod angle;
pub mod cartesian;
pub mod geodetic;

pub use angle::Direction;
pub use cartesian::GeocentricPoint;
pub use geodetic::GeodeticCoordinate;
