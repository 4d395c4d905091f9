//! Sprite World
//!
//! The World is the container for every sprite in play:
//! - Slot allocation with generational handles
//! - Insertion order, which is draw order
//! - The platform list consulted by gravity landing
//! - Deferred removal: `destroy` only marks, `reap` removes
//!
//! Reaping happens in exactly one place (the start of the physics step),
//! so every other pass in a frame sees a stable list.

use super::entity::{SpriteAllocator, SpriteId};
use super::slots::SlotStorage;
use super::sprite::Sprite;

pub struct World {
    /// Slot allocator for handles
    allocator: SpriteAllocator,

    /// Sprite data by slot
    slots: SlotStorage<Sprite>,

    /// Registered sprites in insertion (= draw) order
    order: Vec<SpriteId>,

    /// Sprites used as landing surfaces, in registration order
    platforms: Vec<SpriteId>,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: SpriteAllocator::new(),
            slots: SlotStorage::new(),
            order: Vec::new(),
            platforms: Vec::new(),
        }
    }

    /// Append a sprite to the world and return its handle.
    pub fn spawn(&mut self, sprite: Sprite) -> SpriteId {
        let id = self.allocator.allocate();
        self.slots.insert(id, sprite);
        self.order.push(id);
        id
    }

    /// Register an existing sprite as a platform.
    pub fn add_platform(&mut self, id: SpriteId) {
        if self.contains(id) && !self.platforms.contains(&id) {
            self.platforms.push(id);
        }
    }

    /// Is the handle still registered? True for sprites marked dead
    /// but not yet reaped.
    pub fn contains(&self, id: SpriteId) -> bool {
        self.allocator.is_current(id)
    }

    /// Registered and not marked dead.
    pub fn is_alive(&self, id: SpriteId) -> bool {
        self.get(id).is_some_and(|s| s.is_alive())
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        if !self.allocator.is_current(id) {
            return None;
        }
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        if !self.allocator.is_current(id) {
            return None;
        }
        self.slots.get_mut(id)
    }

    /// Handles in draw order, dead-but-unreaped sprites included.
    pub fn ids(&self) -> &[SpriteId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.order
            .iter()
            .filter_map(move |&id| self.slots.get(id).map(|s| (id, s)))
    }

    pub fn platforms(&self) -> &[SpriteId] {
        &self.platforms
    }

    /// Number of registered sprites, including ones awaiting reaping.
    pub fn len(&self) -> usize {
        self.allocator.live_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every sprite marked dead. Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.order.len();
        let slots = &mut self.slots;
        let allocator = &mut self.allocator;
        self.order.retain(|&id| {
            let alive = slots.get(id).is_some_and(|s| s.is_alive());
            if !alive {
                slots.remove(id);
                allocator.free(id);
            }
            alive
        });
        let allocator = &self.allocator;
        self.platforms.retain(|&id| allocator.is_current(id));
        before - self.order.len()
    }

    /// Drop every sprite and platform. Outstanding handles go stale.
    pub fn clear(&mut self) {
        self.allocator.clear();
        self.slots.clear();
        self.order.clear();
        self.platforms.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
