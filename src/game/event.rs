//! Event System
//!
//! Systems report what happened through typed queues instead of calling
//! each other. Physics sends contact events, the locomotion system sends
//! animation changes; scenes drain whatever they care about each tick.

use super::entity::Entity;
use crate::platforming::LocomotionState;

/// A queue for events of a single type.
/// Events are collected during the tick and drained by the scene.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all game events.
pub struct Events {
    /// Two colliders started touching
    pub collision_enter: EventQueue<CollisionEvent>,

    /// Two colliders stopped touching (either may already be dead)
    pub collision_exit: EventQueue<CollisionEvent>,

    /// An actor's locomotion state changed
    pub animation_changed: EventQueue<AnimationChangedEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self {
            collision_enter: EventQueue::new(),
            collision_exit: EventQueue::new(),
            animation_changed: EventQueue::new(),
        }
    }

    /// Clear all event queues. Call at end of tick.
    pub fn clear_all(&mut self) {
        self.collision_enter.clear();
        self.collision_exit.clear();
        self.animation_changed.clear();
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Contact between two colliders. `entity_a < entity_b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    pub entity_a: Entity,
    pub entity_b: Entity,
}

impl CollisionEvent {
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            Self { entity_a: a, entity_b: b }
        } else {
            Self { entity_a: b, entity_b: a }
        }
    }

    pub fn involves(&self, entity: Entity) -> bool {
        self.entity_a == entity || self.entity_b == entity
    }

    /// The partner of `entity` in this contact.
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.entity_a == entity {
            Some(self.entity_b)
        } else if self.entity_b == entity {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationChangedEvent {
    pub entity: Entity,
    pub from: LocomotionState,
    pub to: LocomotionState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_collision_pair_is_ordered() {
        let a = Entity::new(4, 0);
        let b = Entity::new(1, 2);
        let event = CollisionEvent::new(a, b);
        assert_eq!(event, CollisionEvent::new(b, a));
        assert_eq!(event.entity_a, b);
        assert_eq!(event.other(a), Some(b));
        assert_eq!(event.other(Entity::new(9, 0)), None);
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();
        events.animation_changed.send(AnimationChangedEvent {
            entity: Entity::default(),
            from: LocomotionState::Idle,
            to: LocomotionState::Walking,
        });
        assert_eq!(events.animation_changed.len(), 1);

        events.clear_all();
        assert!(events.animation_changed.is_empty());
    }
}
