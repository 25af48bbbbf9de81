//! Entities, observers and the reactive tracker that connects them
//!
//! An [`Entity`] is anything with a position and, optionally, a rotation.
//! An [`Observer`] is an entity that also looks at a [`Target`] and keeps a
//! look angle to it. The [`Tracker`] owns both and recomputes look angles
//! whenever a position they depend on changes.

pub mod entity;
pub mod observer;
pub mod target;
pub mod tracker;

pub use entity::{Entity, EntityId, PositionInfo, PositionSample, RotationReading};
pub use observer::Observer;
pub use target::Target;
pub use tracker::{ListenerId, Tracker, TrackerEvent};
