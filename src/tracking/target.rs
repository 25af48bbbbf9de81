//! What an observer looks at

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::coordinates::angle::Direction;
use crate::coordinates::geodetic::GeodeticCoordinate;

/// Something an observer can point at
///
/// Exactly one variant is active; replacing a target replaces it wholesale.
/// [`Target::Entity`] is a non-owning reference by identity: the referenced
/// entity lives and dies independently of any observer looking at it.
///
/// Equality only holds between values of the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Target {
    /// Look at nothing
    #[default]
    None,
    /// Look in a commanded compass direction and elevation
    Direction(Direction),
    /// Look at a fixed geographic coordinate
    Coordinate(GeodeticCoordinate),
    /// Look at another entity, following it as it moves
    Entity(EntityId),
}

impl Target {
    pub fn is_none(&self) -> bool {
        matches!(self, Target::None)
    }

    pub fn is_direction(&self) -> bool {
        matches!(self, Target::Direction(_))
    }

    pub fn is_coordinate(&self) -> bool {
        matches!(self, Target::Coordinate(_))
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Target::Entity(_))
    }

    /// The referenced entity, for [`Target::Entity`]
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Target::Entity(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<Direction> for Target {
    fn from(direction: Direction) -> Self {
        Target::Direction(direction)
    }
}

impl From<GeodeticCoordinate> for Target {
    fn from(coordinate: GeodeticCoordinate) -> Self {
        Target::Coordinate(coordinate)
    }
}

impl From<EntityId> for Target {
    fn from(id: EntityId) -> Self {
        Target::Entity(id)
    }
}
