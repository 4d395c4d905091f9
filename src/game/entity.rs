//! Sprite handles with generational indices
//!
//! Game scripts hold on to `SpriteId`s long after the sprite behind them
//! may have been reaped or wiped by a restart:
//! - Each slot has a generation counter
//! - When a sprite is reaped, its slot can be reused
//! - The generation increments on reuse, invalidating old handles
//!
//! A stale handle never matches the new sprite that reused its slot, so
//! callbacks registered against a destroyed sprite quietly do nothing.

/// A handle to a sprite.
///
/// Consists of an index (which slot in the sprite arena) and a generation
/// (which version of that slot). Two handles with the same index but
/// different generations refer to different sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId {
    /// Index into the sprite slots
    index: u32,
    /// Generation counter - increments when slot is reused
    generation: u32,
}

impl SpriteId {
    /// Should only be called by SpriteAllocator.
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index (for slot storage access).
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// A handle that never resolves to a sprite.
    pub const NULL: SpriteId = SpriteId { index: u32::MAX, generation: 0 };

    pub fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        SpriteId::NULL
    }
}

/// Allocates and tracks sprite slots.
///
/// Freed slots are reused with an incremented generation.
#[derive(Debug)]
pub struct SpriteAllocator {
    /// Generation counter for each slot
    generations: Vec<u32>,
    /// Free slots available for reuse (LIFO)
    free_indices: Vec<u32>,
    /// Next fresh index if no free slots available
    next_fresh: u32,
    /// Number of currently allocated handles
    live_count: u32,
}

impl SpriteAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_indices: Vec::new(),
            next_fresh: 0,
            live_count: 0,
        }
    }

    pub fn allocate(&mut self) -> SpriteId {
        self.live_count += 1;

        if let Some(index) = self.free_indices.pop() {
            // Generation was already incremented on free
            SpriteId::new(index, self.generations[index as usize])
        } else {
            let index = self.next_fresh;
            self.next_fresh += 1;
            self.generations.push(0);
            SpriteId::new(index, 0)
        }
    }

    /// Free a handle, making its slot available for reuse.
    /// Returns true if the handle was current and is now freed.
    pub fn free(&mut self, id: SpriteId) -> bool {
        if !self.is_current(id) {
            return false;
        }

        self.generations[id.index as usize] += 1;
        self.free_indices.push(id.index);
        self.live_count -= 1;
        true
    }

    /// Does this handle still refer to an allocated slot?
    pub fn is_current(&self, id: SpriteId) -> bool {
        if id.is_null() {
            return false;
        }
        let idx = id.index as usize;
        idx < self.generations.len() && self.generations[idx] == id.generation
    }

    /// Handles allocated and not yet freed
    pub fn live_count(&self) -> u32 {
        self.live_count
    }

    /// Free every slot at once. All outstanding handles become stale.
    pub fn clear(&mut self) {
        for gen in &mut self.generations {
            *gen += 1;
        }
        self.free_indices.clear();
        // Reverse so slot 0 is handed out first again
        for i in (0..self.next_fresh).rev() {
            self.free_indices.push(i);
        }
        self.live_count = 0;
    }
}

impl Default for SpriteAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut alloc = SpriteAllocator::new();

        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!(alloc.live_count(), 2);
        assert!(alloc.is_current(a));
        assert!(alloc.is_current(b));

        assert!(alloc.free(a));
        assert!(!alloc.free(a));
        assert_eq!(alloc.live_count(), 1);
        assert!(!alloc.is_current(a));
        assert!(alloc.is_current(b));
    }

    #[test]
    fn test_generation_prevents_reuse_collision() {
        let mut alloc = SpriteAllocator::new();

        let a = alloc.allocate();
        alloc.free(a);

        let b = alloc.allocate();
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert!(!alloc.is_current(a));
        assert!(alloc.is_current(b));
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let mut alloc = SpriteAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        alloc.clear();

        assert_eq!(alloc.live_count(), 0);
        assert!(!alloc.is_current(a));
        assert!(!alloc.is_current(b));

        let c = alloc.allocate();
        assert_eq!(c.index(), 0);
        assert_ne!(c, a);
    }

    #[test]
    fn test_null_handle() {
        let alloc = SpriteAllocator::new();
        assert!(!alloc.is_current(SpriteId::NULL));
        assert!(SpriteId::default().is_null());
    }
}
