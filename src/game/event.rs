//! Event Registry
//!
//! Listener lists keyed by trigger type. Game scripts register closures;
//! the frame loop invokes them in registration order. Registrations are
//! append-only and survive restarts.
//!
//! Dispatch takes a list out of the registry, runs it against `&mut Game`,
//! then puts it back with `restore`. Listeners registered while a list was
//! out land behind the existing ones and first run on the next dispatch.

use super::entity::SpriteId;
use super::runtime::Game;
use crate::input::Key;

/// Zero-argument callback (start, held key, key press, click, late update)
pub type Handler = Box<dyn FnMut(&mut Game)>;

/// Pre-physics callback receiving the frame's `dt` in seconds
pub type UpdateHandler = Box<dyn FnMut(&mut Game, f32)>;

/// Called with both sprites while their rectangles overlap
pub type OverlapHandler = Box<dyn FnMut(&mut Game, SpriteId, SpriteId)>;

/// Handlers grouped by key, keys kept in first-registration order
pub struct ListenerMap<K> {
    entries: Vec<(K, Vec<Handler>)>,
}

impl<K: Copy + PartialEq> ListenerMap<K> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, key: K, handler: Handler) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, handlers)) => handlers.push(handler),
            None => self.entries.push((key, vec![handler])),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Number of handlers registered for `key`
    pub fn count(&self, key: K) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, hs)| hs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut Vec<Handler>)> {
        self.entries.iter_mut().map(|(k, hs)| (*k, hs))
    }

    pub(crate) fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Put `taken` back, merging anything registered in the meantime.
    pub(crate) fn restore(&mut self, mut taken: Self) {
        for (key, handlers) in self.entries.drain(..) {
            for handler in handlers {
                taken.push(key, handler);
            }
        }
        *self = taken;
    }
}

impl<K: Copy + PartialEq> Default for ListenerMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A pair of sprites watched for overlap
pub struct OverlapTriple {
    pub a: SpriteId,
    pub b: SpriteId,
    pub(crate) handler: OverlapHandler,
}

/// Every registered listener, by trigger.
#[derive(Default)]
pub struct EventRegistry {
    /// Run at launch and after every restart
    pub(crate) on_start: Vec<Handler>,

    /// Run every frame while the key is down
    pub(crate) key_held: ListenerMap<Key>,

    /// Run once per key-down event
    pub(crate) key_pressed: ListenerMap<Key>,

    /// Run once per mouse press inside the sprite
    pub(crate) clicks: ListenerMap<SpriteId>,

    /// Pre-physics, with `dt`
    pub(crate) update: Vec<UpdateHandler>,

    /// Post-physics
    pub(crate) late_update: Vec<Handler>,

    pub(crate) overlaps: Vec<OverlapTriple>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start_count(&self) -> usize {
        self.on_start.len()
    }

    pub fn update_count(&self) -> usize {
        self.update.len()
    }

    pub fn late_update_count(&self) -> usize {
        self.late_update.len()
    }

    pub fn overlap_count(&self) -> usize {
        self.overlaps.len()
    }

    pub fn key_held(&self) -> &ListenerMap<Key> {
        &self.key_held
    }

    pub fn key_pressed(&self) -> &ListenerMap<Key> {
        &self.key_pressed
    }

    pub fn clicks(&self) -> &ListenerMap<SpriteId> {
        &self.clicks
    }
}

/// Put a taken listener list back, keeping ones registered meanwhile behind it.
pub(crate) fn restore<T>(slot: &mut Vec<T>, mut taken: Vec<T>) {
    taken.append(slot);
    *slot = taken;
}
