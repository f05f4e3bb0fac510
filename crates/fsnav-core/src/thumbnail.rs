//! Decoded preview images keyed by file name.

use std::collections::HashMap;
use std::path::Path;

use image::DynamicImage;

use crate::error::CoreResult;

/// Owns at most one preview image per file name.
///
/// Storing a second image for the same name drops the first. Callers borrow
/// images through [`ThumbnailCache::get`] and never own them.
#[derive(Debug)]
pub struct ThumbnailCache<I = DynamicImage> {
    images: HashMap<String, I>,
}

impl<I> Default for ThumbnailCache<I> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
        }
    }
}

impl<I> ThumbnailCache<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file_name: &str) -> Option<&I> {
        self.images.get(file_name)
    }

    /// Stores `image` for `file_name`, releasing any image already there.
    pub fn put(&mut self, file_name: impl Into<String>, image: I) {
        let file_name = file_name.into();
        if self.images.insert(file_name, image).is_some() {
            tracing::trace!("replaced cached thumbnail");
        }
    }

    /// Removes and returns the image for `file_name`.
    pub fn remove(&mut self, file_name: &str) -> Option<I> {
        self.images.remove(file_name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Releases every image and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.images.len();
        self.images.clear();
        count
    }
}

/// Decodes the image at `path` and scales it to fit in a
/// `max_size` × `max_size` box, preserving aspect ratio.
///
/// # Errors
///
/// Returns [`crate::CoreError::Image`] if the file cannot be opened or decoded.
pub fn decode_thumbnail(path: &Path, max_size: u32) -> CoreResult<DynamicImage> {
    let img = image::open(path)?;
    Ok(img.thumbnail(max_size, max_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Counts drops so tests can observe releases.
    struct Tracked {
        id: u32,
        drops: Rc<Cell<u32>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn put_then_get() {
        let mut cache = ThumbnailCache::new();
        cache.put("/a.png", 1);
        assert_eq!(cache.get("/a.png"), Some(&1));
        assert_eq!(cache.get("/b.png"), None);
    }

    #[test]
    fn second_put_releases_first_image() {
        let drops = Rc::new(Cell::new(0));
        let mut cache = ThumbnailCache::new();

        cache.put("/a.png", Tracked { id: 1, drops: drops.clone() });
        cache.put("/a.png", Tracked { id: 2, drops: drops.clone() });

        assert_eq!(drops.get(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/a.png").unwrap().id, 2);
    }

    #[test]
    fn clear_releases_everything() {
        let drops = Rc::new(Cell::new(0));
        let mut cache = ThumbnailCache::new();
        cache.put("/a.png", Tracked { id: 1, drops: drops.clone() });
        cache.put("/b.png", Tracked { id: 2, drops: drops.clone() });

        assert_eq!(cache.clear(), 2);
        assert_eq!(drops.get(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_hands_back_ownership() {
        let mut cache = ThumbnailCache::new();
        cache.put("/a.png", 7);
        assert_eq!(cache.remove("/a.png"), Some(7));
        assert!(cache.get("/a.png").is_none());
    }

    #[test]
    fn decode_thumbnail_fits_box() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wide.png");
        image::RgbaImage::new(300, 150).save(&path).unwrap();

        let thumb = decode_thumbnail(&path, 128).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (128, 64));
    }

    #[test]
    fn decode_thumbnail_rejects_non_images() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fake.png");
        std::fs::write(&path, "not an image").unwrap();

        assert!(matches!(
            decode_thumbnail(&path, 64).unwrap_err(),
            crate::error::CoreError::Image(_)
        ));
    }
}
