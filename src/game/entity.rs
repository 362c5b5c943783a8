//! Entity handles with generational indices
//!
//! An `Entity` is a slot index plus a generation. Despawning bumps the
//! slot's generation, so any handle still pointing at the old occupant
//! stops resolving. Riders hold platform handles this way: a platform
//! destroyed mid-ride simply fails the liveness check on the next tick.

use serde::{Serialize, Deserialize};

/// Handle to an entity in a `World`.
///
/// Copyable and non-owning. Two handles with the same index but a
/// different generation name different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Placeholder handle that is never alive.
    pub const NULL: Entity = Entity { index: u32::MAX, generation: 0 };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index (component storages are indexed by this).
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::NULL
    }
}

/// Hands out entity slots and tracks which generation is current.
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    /// Freed slots, reused LIFO
    free_indices: Vec<u32>,
    alive_count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_indices: Vec::new(),
            alive_count: 0,
        }
    }

    /// Allocate a handle, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        self.alive_count += 1;

        if let Some(index) = self.free_indices.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            return Entity::new(index, self.generations[slot]);
        }

        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.alive.push(true);
        Entity::new(index, 0)
    }

    /// Release a handle. Returns false if it was already dead, which makes
    /// double-destroy harmless.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.index as usize;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.alive[slot] = false;
        self.free_indices.push(entity.index);
        self.alive_count -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        if entity.is_null() {
            return false;
        }
        let slot = entity.index as usize;
        slot < self.generations.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation
    }

    /// Current handle for a slot, if the slot is occupied.
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let slot = index as usize;
        if slot < self.alive.len() && self.alive[slot] {
            Some(Entity::new(index, self.generations[slot]))
        } else {
            None
        }
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Iterate over every live handle in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(slot, _)| Entity::new(slot as u32, self.generations[slot]))
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
