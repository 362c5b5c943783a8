//! Component Storage
//!
//! `ComponentStorage<T>` is a sparse array indexed by entity slot. Each
//! occupied slot also remembers the generation it was inserted for, so a
//! lookup through a stale handle misses instead of returning data that
//! now belongs to whoever reused the slot.

use super::entity::Entity;

/// Sparse storage for one component type.
pub struct ComponentStorage<T> {
    data: Vec<Option<(u32, T)>>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert or replace the component for an entity.
    pub fn insert(&mut self, entity: Entity, component: T) {
        let idx = entity.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some((entity.generation(), component));
    }

    /// Remove the component, returning it if the handle matched.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.data.get_mut(entity.index() as usize)?;
        if !matches!(slot, Some((generation, _)) if *generation == entity.generation()) {
            return None;
        }
        slot.take().map(|(_, c)| c)
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        match self.data.get(entity.index() as usize) {
            Some(Some((generation, c))) if *generation == entity.generation() => Some(c),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match self.data.get_mut(entity.index() as usize) {
            Some(Some((generation, c))) if *generation == entity.generation() => Some(c),
            _ => None,
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Iterate over `(entity, component)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.data.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()
                .map(|(generation, c)| (Entity::new(idx as u32, *generation), c))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.data.iter_mut().enumerate().filter_map(|(idx, slot)| {
            slot.as_mut()
                .map(|(generation, c)| (Entity::new(idx as u32, *generation), c))
        })
    }

    /// Handles of every entity that has this component.
    pub fn entities(&self) -> Vec<Entity> {
        self.iter().map(|(e, _)| e).collect()
    }

    /// Drop whatever occupies a slot. Used by despawn.
    pub fn clear_slot(&mut self, index: u32) {
        if let Some(slot) = self.data.get_mut(index as usize) {
            *slot = None;
        }
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let entity = Entity::new(5, 0);

        storage.insert(entity, 42);
        assert_eq!(storage.get(entity), Some(&42));
        assert!(storage.contains(entity));
        assert!(!storage.contains(Entity::new(4, 0)));
    }

    #[test]
    fn test_stale_generation_misses() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        let old = Entity::new(2, 0);
        let new = Entity::new(2, 1);

        storage.insert(new, "replacement");
        assert_eq!(storage.get(old), None);
        assert_eq!(storage.remove(old), None);
        assert_eq!(storage.get(new), Some(&"replacement"));
    }

    #[test]
    fn test_remove() {
        let mut storage: ComponentStorage<i32> = ComponentStorage::new();
        let entity = Entity::new(3, 0);

        storage.insert(entity, 100);
        assert_eq!(storage.remove(entity), Some(100));
        assert!(!storage.contains(entity));
        assert_eq!(storage.count(), 0);
    }

    #[test]
    fn test_iteration_reports_handles() {
        let mut storage: ComponentStorage<&str> = ComponentStorage::new();
        storage.insert(Entity::new(0, 0), "zero");
        storage.insert(Entity::new(5, 3), "five");

        let items: Vec<_> = storage.iter().collect();
        assert_eq!(items, vec![(Entity::new(0, 0), &"zero"), (Entity::new(5, 3), &"five")]);
    }
}
