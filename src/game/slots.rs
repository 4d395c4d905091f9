//! Sparse slot storage
//!
//! `SlotStorage<T>` maps sprite slot indices to data. Slots are addressed by
//! `SpriteId::index()`; generation checks are the allocator's job.

use super::entity::SpriteId;

/// Sparse array indexed by `SpriteId::index()`, with holes for free slots.
#[derive(Debug)]
pub struct SlotStorage<T> {
    data: Vec<Option<T>>,
}

impl<T> SlotStorage<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.data.resize_with(index + 1, || None);
        }
    }

    /// Insert a value for a slot, replacing whatever was there.
    pub fn insert(&mut self, id: SpriteId, value: T) {
        let idx = id.index() as usize;
        self.ensure_capacity(idx);
        self.data[idx] = Some(value);
    }

    pub fn remove(&mut self, id: SpriteId) -> Option<T> {
        self.data.get_mut(id.index() as usize).and_then(|slot| slot.take())
    }

    pub fn get(&self, id: SpriteId) -> Option<&T> {
        self.data.get(id.index() as usize).and_then(|opt| opt.as_ref())
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut T> {
        self.data.get_mut(id.index() as usize).and_then(|opt| opt.as_mut())
    }

    /// Empty every slot, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in &mut self.data {
            *slot = None;
        }
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|opt| opt.is_some()).count()
    }
}

impl<T> Default for SlotStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut storage: SlotStorage<i32> = SlotStorage::new();
        let id = SpriteId::new(5, 0);

        storage.insert(id, 42);
        assert_eq!(storage.get(id), Some(&42));
        assert_eq!(storage.count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut storage: SlotStorage<i32> = SlotStorage::new();
        let a = SpriteId::new(3, 0);
        let b = SpriteId::new(100, 0);

        storage.insert(a, 100);
        storage.insert(b, 999);
        assert_eq!(storage.remove(a), Some(100));
        assert_eq!(storage.get(a), None);
        assert_eq!(storage.get(SpriteId::new(50, 0)), None);

        storage.clear();
        assert_eq!(storage.count(), 0);
    }
}
