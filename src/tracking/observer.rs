//! Observers: entities that keep a look angle to their target

use log::debug;

use super::target::Target;
use crate::coordinates::angle::Direction;
use crate::coordinates::geodetic::GeodeticCoordinate;
use crate::look_angle::LookAngleCalculator;

/// Pointing state of an observer
///
/// The observer's own position is held by its [`Entity`](super::Entity)
/// with the same identity; this struct holds what it looks at and the last
/// computed direction. The target is owned exclusively: setting a new one
/// drops the old.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observer {
    target: Target,
    look_angle: Option<Direction>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Last emitted direction; `None` until the first successful computation
    pub fn look_angle(&self) -> Option<Direction> {
        self.look_angle
    }

    /// Replaces the target, returning the previous one
    pub(crate) fn replace_target(&mut self, target: Target) -> Target {
        std::mem::replace(&mut self.target, target)
    }

    /// Recomputes the look angle
    ///
    /// `own` is the observer's position and `referenced` the position of the
    /// target entity (ignored for other variants). Returns the new direction
    /// when one is defined, which the caller emits unconditionally; `None`
    /// means there is nothing to emit.
    pub(crate) fn recompute(
        &mut self,
        calculator: &LookAngleCalculator,
        own: Option<&GeodeticCoordinate>,
        referenced: Option<&GeodeticCoordinate>,
    ) -> Option<Direction> {
        let direction = match (&self.target, own) {
            (Target::None, _) => return None,
            (Target::Direction(commanded), _) => commanded.normalized(),
            (Target::Coordinate(coordinate), Some(own)) => self.point_at(calculator, own, coordinate),
            (Target::Entity(id), Some(own)) => match referenced {
                Some(position) => self.point_at(calculator, own, position),
                None => {
                    debug!("target entity {} has no position yet", id);
                    return None;
                }
            },
            (_, None) => {
                debug!("observer has no position yet");
                return None;
            }
        };
        self.look_angle = Some(direction);
        Some(direction)
    }

    fn point_at(
        &self,
        calculator: &LookAngleCalculator,
        own: &GeodeticCoordinate,
        target: &GeodeticCoordinate,
    ) -> Direction {
        let prior = self.look_angle.unwrap_or_default();
        calculator.compute(own, target).direction_from(prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::entity::EntityId;
    use approx::assert_abs_diff_eq;

    fn coord(lat: f64, lon: f64, h: f64) -> GeodeticCoordinate {
        GeodeticCoordinate::new(lat, lon, h).unwrap()
    }

    #[test]
    fn test_none_target_emits_nothing() {
        let mut observer = Observer::new();
        let here = coord(0.0, 0.0, 0.0);
        assert_eq!(observer.recompute(&LookAngleCalculator::new(), Some(&here), None), None);
        assert_eq!(observer.look_angle(), None);
    }

    #[test]
    fn test_direction_passes_through() {
        let mut observer = Observer::new();
        let commanded = Direction::new(135.0, 20.0);
        observer.replace_target(Target::Direction(commanded));
        // no position needed for commanded pointing
        let emitted = observer.recompute(&LookAngleCalculator::new(), None, None);
        assert_eq!(emitted, Some(commanded));
        assert_eq!(observer.look_angle(), Some(commanded));
    }

    #[test]
    fn test_direction_is_brought_into_range() {
        let mut observer = Observer::new();
        observer.replace_target(Target::Direction(Direction {
            azimuth: 720.0,
            elevation: 200.0,
        }));
        let emitted = observer.recompute(&LookAngleCalculator::new(), None, None).unwrap();
        assert_eq!(emitted, Direction::new(0.0, 90.0));
    }

    #[test]
    fn test_coordinate_target() {
        let mut observer = Observer::new();
        observer.replace_target(Target::Coordinate(coord(39.0, -76.0, 12000.0)));

        let calculator = LookAngleCalculator::new();
        assert_eq!(observer.recompute(&calculator, None, None), None);

        let own = coord(39.0, -75.0, 4000.0);
        let direction = observer.recompute(&calculator, Some(&own), None).unwrap();
        assert_abs_diff_eq!(direction.elevation, 4.881, epsilon = 0.01);
        assert_abs_diff_eq!(direction.azimuth, 270.339, epsilon = 0.01);
    }

    #[test]
    fn test_entity_target_needs_both_positions() {
        let mut observer = Observer::new();
        observer.replace_target(Target::Entity(EntityId::new_v4()));
        let calculator = LookAngleCalculator::new();
        let own = coord(0.0, 0.0, 0.0);
        assert_eq!(observer.recompute(&calculator, Some(&own), None), None);

        let there = coord(0.0, 1.0, 0.0);
        let direction = observer.recompute(&calculator, Some(&own), Some(&there)).unwrap();
        assert_abs_diff_eq!(direction.azimuth, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_keeps_previous_direction() {
        let mut observer = Observer::new();
        let calculator = LookAngleCalculator::new();
        let own = coord(0.0, 0.0, 0.0);

        observer.replace_target(Target::Coordinate(coord(0.0, 1.0, 0.0)));
        let first = observer.recompute(&calculator, Some(&own), None).unwrap();

        observer.replace_target(Target::Coordinate(own));
        let second = observer.recompute(&calculator, Some(&own), None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut observer = Observer::new();
        let id = EntityId::new_v4();
        assert_eq!(observer.replace_target(Target::Entity(id)), Target::None);
        assert_eq!(observer.replace_target(Target::None), Target::Entity(id));
    }
}
