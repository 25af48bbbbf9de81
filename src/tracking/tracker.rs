//! The reactive notification graph
//!
//! A [`Tracker`] owns every entity and observer, keeps a registry of who is
//! subscribed to whose position changes, and delivers [`TrackerEvent`]s to
//! external listeners. All work happens synchronously inside the call that
//! delivered an update, in the order updates arrive. Listeners only see a
//! shared reference to the event and cannot reach back into the tracker, so
//! no subscriber ever observes an entity mid-update.
//!
//! ```rust
//! use chrono::Utc;
//! use geotracker::{GeodeticCoordinate, PositionInfo, Target, Tracker, TrackerEvent};
//!
//! let mut tracker = Tracker::new();
//! let observer = tracker.add_observer();
//! let aircraft = tracker.add_entity();
//! let events = tracker.event_channel();
//!
//! tracker.set_target(observer, Target::Entity(aircraft)).unwrap();
//! let here = GeodeticCoordinate::new(39.0, -75.0, 4000.0).unwrap();
//! let there = GeodeticCoordinate::new(39.0, -76.0, 12000.0).unwrap();
//! tracker.set_position(observer, PositionInfo::new(here, Utc::now())).unwrap();
//! tracker.set_position(aircraft, PositionInfo::new(there, Utc::now())).unwrap();
//!
//! let look = tracker.observer(observer).unwrap().look_angle().unwrap();
//! assert!((look.elevation - 4.88).abs() < 0.01);
//! assert!(events
//!     .try_iter()
//!     .any(|e| matches!(e, TrackerEvent::LookAngleChanged { .. })));
//! ```

use log::{debug, warn};
use std::collections::HashMap;
use std::sync::mpsc;

use super::entity::{Entity, EntityId, PositionInfo, PositionSample, RotationReading};
use super::observer::Observer;
use super::target::Target;
use crate::config::TrackerConfig;
use crate::coordinates::angle::Direction;
use crate::geodesy::Ellipsoid;
use crate::look_angle::{LookAngle, LookAngleCalculator};
use crate::sources::PositionSource;
use crate::{GeotrackerError, Result};

/// Notifications delivered to tracker listeners
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// An entity received a new position (also sent for identical values)
    PositionChanged {
        entity: EntityId,
        position: PositionInfo,
    },
    /// An entity received a new rotation reading
    RotationChanged {
        entity: EntityId,
        rotation: RotationReading,
    },
    /// An observer's target was replaced
    TargetChanged { observer: EntityId, target: Target },
    /// An observer recomputed its look angle (also sent when unchanged)
    LookAngleChanged {
        observer: EntityId,
        direction: Direction,
    },
    /// An entity was removed from the tracker
    EntityRemoved { entity: EntityId },
}

/// Handle returned by [`Tracker::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// returns false once the listener can never receive again
type Listener = Box<dyn FnMut(&TrackerEvent) -> bool + Send>;

/// Owner of entities and observers and of the subscriptions between them
pub struct Tracker {
    calculator: LookAngleCalculator,
    ellipsoid: Ellipsoid,
    entities: HashMap<EntityId, Entity>,
    observers: HashMap<EntityId, Observer>,
    // publisher -> observers recomputing on its position changes, in
    // subscription order; an observer aiming at itself appears twice
    subscriptions: HashMap<EntityId, Vec<EntityId>>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Tracker {
    /// Creates a tracker with the default configuration
    pub fn new() -> Self {
        Self::with_config(&TrackerConfig::default())
    }

    pub fn with_config(config: &TrackerConfig) -> Self {
        Tracker {
            calculator: LookAngleCalculator::new().with_model(config.earth_model),
            ellipsoid: config.ellipsoid,
            entities: HashMap::new(),
            observers: HashMap::new(),
            subscriptions: HashMap::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn calculator(&self) -> &LookAngleCalculator {
        &self.calculator
    }

    /// Adds a plain entity with a fresh identity
    pub fn add_entity(&mut self) -> EntityId {
        let id = EntityId::new_v4();
        self.entities.insert(id, Entity::with_id(id));
        id
    }

    /// Adds a plain entity mirroring an existing identity
    ///
    /// # Errors
    ///
    /// [`GeotrackerError::DuplicateEntity`] if the identity is taken.
    pub fn add_entity_with_id(&mut self, id: EntityId) -> Result<EntityId> {
        if self.entities.contains_key(&id) {
            return Err(GeotrackerError::DuplicateEntity(id));
        }
        self.entities.insert(id, Entity::with_id(id));
        Ok(id)
    }

    /// Adds an observer with a fresh identity and no target
    pub fn add_observer(&mut self) -> EntityId {
        let id = self.add_entity();
        self.attach_observer(id);
        id
    }

    /// Adds an observer mirroring an existing identity
    pub fn add_observer_with_id(&mut self, id: EntityId) -> Result<EntityId> {
        self.add_entity_with_id(id)?;
        self.attach_observer(id);
        Ok(id)
    }

    fn attach_observer(&mut self, id: EntityId) {
        self.observers.insert(id, Observer::new());
        // an observer always follows its own position
        self.subscribe(id, id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn observer(&self, id: EntityId) -> Option<&Observer> {
        self.observers.get(&id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Observers currently recomputing on `publisher`'s position changes
    pub fn subscribers(&self, publisher: EntityId) -> Vec<EntityId> {
        let mut unique = Vec::new();
        for id in self.subscriptions.get(&publisher).into_iter().flatten() {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        unique
    }

    /// Registers a listener for every [`TrackerEvent`]
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TrackerEvent) + Send + 'static,
    {
        let mut listener = listener;
        self.push_listener(Box::new(move |event| {
            listener(event);
            true
        }))
    }

    fn push_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Removes a listener; returns whether it was registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Registers a listener that forwards every event into a channel
    ///
    /// Once the receiver is dropped, the listener is removed on the next
    /// event.
    pub fn event_channel(&mut self) -> mpsc::Receiver<TrackerEvent> {
        let (sender, receiver) = mpsc::channel();
        self.push_listener(Box::new(move |event| sender.send(event.clone()).is_ok()));
        receiver
    }

    /// Stores a new position and recomputes every subscribed observer
    ///
    /// Identical positions are not suppressed: subscribers are notified on
    /// every call.
    pub fn set_position(&mut self, id: EntityId, position: PositionInfo) -> Result<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(GeotrackerError::UnknownEntity(id))?;
        entity.set_position(position);
        self.emit(TrackerEvent::PositionChanged {
            entity: id,
            position,
        });

        for observer in self.subscribers(id) {
            self.recompute(observer);
        }
        Ok(())
    }

    /// Validates a raw sample and applies it
    ///
    /// Invalid samples are dropped without touching the entity. Returns
    /// whether the sample was applied.
    ///
    /// # Errors
    ///
    /// [`GeotrackerError::UnknownEntity`] if `id` is not tracked.
    pub fn offer_sample(&mut self, id: EntityId, sample: &PositionSample) -> Result<bool> {
        if !self.contains(id) {
            return Err(GeotrackerError::UnknownEntity(id));
        }
        match sample.validate() {
            Ok(position) => {
                self.set_position(id, position)?;
                Ok(true)
            }
            Err(err) => {
                warn!("dropping position sample for {}: {}", id, err);
                Ok(false)
            }
        }
    }

    /// Feeds every remaining sample of a position source to an entity
    ///
    /// Returns the number of positions applied. A closed source simply stops
    /// producing samples.
    pub fn drain_source<S>(&mut self, id: EntityId, source: &mut S) -> Result<usize>
    where
        S: PositionSource + ?Sized,
    {
        if !self.contains(id) {
            return Err(GeotrackerError::UnknownEntity(id));
        }
        let mut applied = 0;
        while let Some(position) = source.next_position() {
            self.set_position(id, position)?;
            applied += 1;
        }
        debug!("source for {} closed after {} positions", id, applied);
        Ok(applied)
    }

    /// Stores a rotation reading verbatim
    pub fn set_rotation(&mut self, id: EntityId, rotation: RotationReading) -> Result<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(GeotrackerError::UnknownEntity(id))?;
        entity.set_rotation(rotation);
        self.emit(TrackerEvent::RotationChanged {
            entity: id,
            rotation,
        });
        Ok(())
    }

    /// Replaces an observer's target and recomputes its look angle
    ///
    /// The subscription to a previously referenced entity is dropped before
    /// the new one is made, all within this call.
    ///
    /// # Errors
    ///
    /// [`GeotrackerError::NotAnObserver`] if `observer` is not an observer,
    /// [`GeotrackerError::UnknownEntity`] if the new target references an
    /// entity that is not tracked, [`GeotrackerError::InvalidCoordinate`] for
    /// a non-finite commanded direction. The old target stays in place on
    /// error. Commanded directions are normalized before they are stored.
    pub fn set_target(&mut self, observer: EntityId, target: Target) -> Result<()> {
        if !self.observers.contains_key(&observer) {
            return Err(if self.contains(observer) {
                GeotrackerError::NotAnObserver(observer)
            } else {
                GeotrackerError::UnknownEntity(observer)
            });
        }
        let target = match target {
            Target::Direction(commanded) => {
                Target::Direction(Direction::checked(commanded.azimuth, commanded.elevation)?)
            }
            Target::Entity(referenced) if !self.contains(referenced) => {
                return Err(GeotrackerError::UnknownEntity(referenced));
            }
            other => other,
        };

        let previous = match self.observers.get_mut(&observer) {
            Some(state) => state.replace_target(target),
            None => return Err(GeotrackerError::UnknownEntity(observer)),
        };
        if let Some(old) = previous.entity() {
            self.unsubscribe(old, observer);
        }
        self.emit(TrackerEvent::TargetChanged { observer, target });

        if let Some(new) = target.entity() {
            self.subscribe(new, observer);
        }
        self.recompute(observer);
        Ok(())
    }

    /// Removes an entity (or observer) from the tracker
    ///
    /// Observers aiming at the removed entity lose their target: they are
    /// unsubscribed and reset to [`Target::None`].
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(GeotrackerError::UnknownEntity(id))?;
        self.observers.remove(&id);

        self.subscriptions.remove(&id);
        for subscribers in self.subscriptions.values_mut() {
            subscribers.retain(|subscriber| *subscriber != id);
        }

        let orphaned: Vec<EntityId> = self
            .observers
            .iter()
            .filter(|(_, state)| state.target().entity() == Some(id))
            .map(|(observer, _)| *observer)
            .collect();
        for observer in orphaned {
            warn!("observer {} lost its target {}", observer, id);
            if let Some(state) = self.observers.get_mut(&observer) {
                state.replace_target(Target::None);
            }
            self.emit(TrackerEvent::TargetChanged {
                observer,
                target: Target::None,
            });
        }

        self.emit(TrackerEvent::EntityRemoved { entity: id });
        Ok(entity)
    }

    /// One-off look angle between two tracked entities' latest positions
    pub fn look_angle_between(&self, from: EntityId, to: EntityId) -> Option<LookAngle> {
        let a = self.entities.get(&from)?.coordinate()?;
        let b = self.entities.get(&to)?.coordinate()?;
        Some(self.calculator.compute(a, b))
    }

    /// Straight-line distance between two tracked entities using the
    /// rigorous ellipsoid transform
    pub fn line_of_sight_distance(&self, from: EntityId, to: EntityId) -> Result<Option<f64>> {
        let a = self
            .entities
            .get(&from)
            .ok_or(GeotrackerError::UnknownEntity(from))?;
        let b = self
            .entities
            .get(&to)
            .ok_or(GeotrackerError::UnknownEntity(to))?;
        match (a.coordinate(), b.coordinate()) {
            (Some(a), Some(b)) => {
                let a = a.to_geocentric(&self.ellipsoid)?;
                let b = b.to_geocentric(&self.ellipsoid)?;
                Ok(Some(a.distance_to(&b)))
            }
            _ => Ok(None),
        }
    }

    fn subscribe(&mut self, publisher: EntityId, observer: EntityId) {
        debug!("{} subscribes to {}", observer, publisher);
        self.subscriptions.entry(publisher).or_default().push(observer);
    }

    fn unsubscribe(&mut self, publisher: EntityId, observer: EntityId) {
        debug!("{} unsubscribes from {}", observer, publisher);
        if let Some(subscribers) = self.subscriptions.get_mut(&publisher) {
            if let Some(index) = subscribers.iter().position(|s| *s == observer) {
                subscribers.remove(index);
            }
            if subscribers.is_empty() {
                self.subscriptions.remove(&publisher);
            }
        }
    }

    fn recompute(&mut self, id: EntityId) {
        let own = self.entities.get(&id).and_then(|e| e.coordinate()).copied();
        let Some(state) = self.observers.get(&id) else {
            return;
        };
        let referenced = match state.target().entity() {
            Some(target) => match self.entities.get(&target) {
                Some(entity) => entity.coordinate().copied(),
                None => {
                    warn!("observer {} references unknown entity {}", id, target);
                    None
                }
            },
            None => None,
        };

        let calculator = self.calculator;
        let direction = match self.observers.get_mut(&id) {
            Some(state) => state.recompute(&calculator, own.as_ref(), referenced.as_ref()),
            None => None,
        };
        if let Some(direction) = direction {
            debug!("observer {} look angle {}", id, direction);
            self.emit(TrackerEvent::LookAngleChanged {
                observer: id,
                direction,
            });
        }
    }

    fn emit(&mut self, event: TrackerEvent) {
        self.listeners.retain_mut(|(id, listener)| {
            let alive = listener(&event);
            if !alive {
                debug!("dropping closed listener {:?}", id);
            }
            alive
        });
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("calculator", &self.calculator)
            .field("entities", &self.entities.len())
            .field("observers", &self.observers.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
