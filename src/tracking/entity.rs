//! Entities: things in the physical world, moving or not
//!
//! Each entity has a unique identity, an optional latest position and an
//! optional latest rotation (together, its pose). Position and rotation are
//! fed in by external sources: a GPS receiver, a MAVLink link, a log file,
//! a physics engine. Without a rotation source an entity simply has no
//! rotation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coordinates::geodetic::GeodeticCoordinate;
use crate::Result;

/// Opaque, stable identity of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generates a fresh random identity
    pub fn new_v4() -> Self {
        EntityId(Uuid::new_v4())
    }

    /// Wraps an identity received from elsewhere, e.g. a remote entity that
    /// transmits its own self-generated UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        EntityId(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        EntityId(uuid)
    }
}

/// A valid, timestamped position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub coordinate: GeodeticCoordinate,
    pub timestamp: DateTime<Utc>,
}

impl PositionInfo {
    pub fn new(coordinate: GeodeticCoordinate, timestamp: DateTime<Utc>) -> Self {
        PositionInfo {
            coordinate,
            timestamp,
        }
    }
}

/// A position fix as a source reports it, before validation
///
/// A missing timestamp means the source could not parse one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl PositionSample {
    /// Checks the sample and turns it into a [`PositionInfo`]
    ///
    /// # Errors
    ///
    /// [`crate::GeotrackerError::InvalidCoordinate`] for out-of-range
    /// latitude/longitude, [`crate::GeotrackerError::Source`] when the
    /// timestamp is missing.
    pub fn validate(&self) -> Result<PositionInfo> {
        let coordinate = GeodeticCoordinate::new(self.latitude, self.longitude, self.height)?;
        let timestamp = self.timestamp.ok_or_else(|| {
            crate::GeotrackerError::Source("sample has no valid timestamp".to_string())
        })?;
        Ok(PositionInfo::new(coordinate, timestamp))
    }
}

/// Orientation reading, Euler angles in degrees about the x, y and z axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationReading {
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationReading {
    pub fn from_euler(timestamp: DateTime<Utc>, x: f64, y: f64, z: f64) -> Self {
        RotationReading { timestamp, x, y, z }
    }
}

/// A positioned, oriented object with a stable identity
///
/// Entities are owned by a [`Tracker`](super::Tracker), which is the only
/// place they are mutated and which notifies subscribers of every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    position: Option<PositionInfo>,
    rotation: Option<RotationReading>,
}

impl Entity {
    /// Creates an entity with a fresh identity
    pub fn new() -> Self {
        Self::with_id(EntityId::new_v4())
    }

    /// Creates an entity mirroring an existing identity
    pub fn with_id(id: EntityId) -> Self {
        Entity {
            id,
            position: None,
            rotation: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Latest position fix, if any has arrived
    pub fn position(&self) -> Option<&PositionInfo> {
        self.position.as_ref()
    }

    pub fn coordinate(&self) -> Option<&GeodeticCoordinate> {
        self.position.as_ref().map(|p| &p.coordinate)
    }

    /// Latest rotation reading, if any has arrived
    pub fn rotation(&self) -> Option<&RotationReading> {
        self.rotation.as_ref()
    }

    pub(crate) fn set_position(&mut self, position: PositionInfo) {
        self.position = Some(position);
    }

    pub(crate) fn set_rotation(&mut self, rotation: RotationReading) {
        self.rotation = Some(rotation);
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_identities_are_unique() {
        let a = Entity::new();
        let b = Entity::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_mirrored_identity() {
        let uuid = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let entity = Entity::with_id(EntityId::from_uuid(uuid));
        assert_eq!(entity.id().as_uuid(), &uuid);
        assert_eq!(entity.id().to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(entity.position().is_none());
        assert!(entity.rotation().is_none());
    }

    #[test]
    fn test_setters_replace_state() {
        let mut entity = Entity::new();
        let coordinate = GeodeticCoordinate::new(1.0, 2.0, 3.0).unwrap();
        entity.set_position(PositionInfo::new(coordinate, noon()));
        assert_eq!(entity.coordinate(), Some(&coordinate));

        let reading = RotationReading::from_euler(noon(), 1.0, 2.0, 3.0);
        entity.set_rotation(reading);
        assert_eq!(entity.rotation(), Some(&reading));
    }

    #[test]
    fn test_sample_validation() {
        let good = PositionSample {
            latitude: 39.0,
            longitude: -75.0,
            height: 10.0,
            timestamp: Some(noon()),
        };
        let info = good.validate().unwrap();
        assert_eq!(info.timestamp, noon());
        assert_eq!(info.coordinate.latitude(), 39.0);

        let bad_latitude = PositionSample {
            latitude: 91.0,
            ..good
        };
        assert!(bad_latitude.validate().is_err());

        let no_timestamp = PositionSample {
            timestamp: None,
            ..good
        };
        assert!(no_timestamp.validate().is_err());
    }
}
