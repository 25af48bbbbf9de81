//! Geotracker: geodetic coordinates, look angles and reactive target tracking
//!
//! This crate converts between geodetic (latitude, longitude, height) and
//! Earth-centered Earth-fixed coordinates, computes the distance, azimuth and
//! elevation from an observer to a target, and keeps those look angles up to
//! date as entities move.

use thiserror::Error;

pub mod config;
pub mod constants;
pub mod coordinates;
pub mod geodesy;
pub mod look_angle;
pub mod sources;
pub mod tracking;

// Re-export commonly used types
pub use config::TrackerConfig;
pub use coordinates::{Direction, GeocentricPoint, GeodeticCoordinate};
pub use geodesy::{ConversionErrors, EarthModel, Ellipsoid};
pub use look_angle::{look_angle, LookAngle, LookAngleCalculator};
pub use sources::{LogFilePositionSource, PositionSource};
pub use tracking::{
    Entity, EntityId, ListenerId, Observer, PositionInfo, PositionSample, RotationReading,
    Target, Tracker, TrackerEvent,
};

/// Main error type for the geotracker library
#[derive(Debug, Error)]
pub enum GeotrackerError {
    #[error("Conversion error: {0}")]
    Conversion(ConversionErrors),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("Entity is not an observer: {0}")]
    NotAnObserver(EntityId),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(EntityId),

    #[error("Position source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for geotracker operations
pub type Result<T> = std::result::Result<T, GeotrackerError>;

impl From<ConversionErrors> for GeotrackerError {
    fn from(errors: ConversionErrors) -> Self {
        GeotrackerError::Conversion(errors)
    }
}
