//! Sprite image cache
//!
//! Decoded and scaled images keyed by (path, width, height), so spawning
//! the same bullet a thousand times costs one decode. Nothing is ever
//! evicted; failures are not cached and will be retried next time.

use crate::backend::{AssetError, GraphicsBackend, ImageId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

type CacheKey = (PathBuf, u32, u32);

#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<CacheKey, ImageId>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached image for `path` at `width` x `height`, loading it on a miss.
    pub fn get_or_load(
        &mut self,
        gfx: &mut dyn GraphicsBackend,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<ImageId, AssetError> {
        let key = (path.to_path_buf(), width, height);
        if let Some(&id) = self.images.get(&key) {
            return Ok(id);
        }
        let id = gfx.load_scaled_image(path, width, height)?;
        log::debug!("cached {} at {}x{}", path.display(), width, height);
        self.images.insert(key, id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessGraphics;

    #[test]
    fn test_same_key_decodes_once() {
        let mut gfx = HeadlessGraphics::new().with_image("rock.png", 32, 32);
        let log = gfx.log();
        let mut cache = ImageCache::new();

        let a = cache.get_or_load(&mut gfx, Path::new("rock.png"), 26, 26).unwrap();
        let b = cache.get_or_load(&mut gfx, Path::new("rock.png"), 26, 26).unwrap();
        assert_eq!(a, b);
        assert_eq!(log.decodes(), 1);

        // Different size is a different entry
        let c = cache.get_or_load(&mut gfx, Path::new("rock.png"), 13, 13).unwrap();
        assert_ne!(a, c);
        assert_eq!(log.decodes(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mut gfx = HeadlessGraphics::new();
        let mut cache = ImageCache::new();
        assert!(cache.get_or_load(&mut gfx, Path::new("missing.png"), 8, 8).is_err());
        assert!(cache.is_empty());
    }
}
