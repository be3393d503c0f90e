//! Ordered collection of loaded images and the current selection.

use std::sync::Arc;

use crate::constants::text;
use crate::error::{Result, WorkspaceError};
use crate::resource::{ImageData, ImageSource, ResourceHandle, ResourceRegistry, ResourceStats, read_image};

/// An image owned by the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Stable id (the original file name)
    pub id: String,
    /// Renderable resource; borrowed by the viewport, released by the collection
    pub handle: ResourceHandle,
    /// Label shown in the file input
    pub display_name: String,
    pub width: u32,
    pub height: u32,
    pub mime: &'static str,
}

impl LoadedImage {
    fn from_data(handle: ResourceHandle, data: &ImageData) -> Self {
        Self {
            id: data.name.clone(),
            handle,
            display_name: data.name.clone(),
            width: data.width,
            height: data.height,
            mime: data.mime_type(),
        }
    }
}

/// Loaded images plus the index of the one being viewed.
///
/// Owns every [`ResourceHandle`] it hands out. Failed loads leave the
/// collection exactly as it was, and dropping the collection releases
/// whatever is still loaded.
#[derive(Debug, Default)]
pub struct ImageCollection {
    items: Vec<LoadedImage>,
    current_index: usize,
    registry: ResourceRegistry,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LoadedImage] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the viewed image; `None` when empty.
    pub fn current_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.current_index)
        }
    }

    pub fn current(&self) -> Option<&LoadedImage> {
        self.items.get(self.current_index)
    }

    /// Label for the file input: current image name or the placeholder.
    pub fn file_label(&self) -> &str {
        self.current()
            .map(|image| image.display_name.as_str())
            .unwrap_or(text::FILE_PLACEHOLDER)
    }

    /// Decoded data behind a handle, for rendering.
    pub fn image_data(&self, handle: ResourceHandle) -> Option<&ImageData> {
        self.registry.get(handle)
    }

    pub fn resource_stats(&self) -> ResourceStats {
        self.registry.stats()
    }

    fn read_all(files: &[ImageSource]) -> Result<Vec<ImageData>> {
        files.iter().map(read_image).collect()
    }

    fn register_all(&mut self, data: Vec<ImageData>) -> usize {
        let count = data.len();
        for image in data {
            let handle = self.registry.register(image.clone());
            self.items.push(LoadedImage::from_data(handle, &image));
        }
        self.current_index = 0;
        count
    }

    /// Append `files` and view the first image.
    ///
    /// Every file is read before anything is registered, so one unreadable
    /// file aborts the whole load. An empty list is a no-op.
    pub fn load(&mut self, files: &[ImageSource]) -> Result<usize> {
        if files.is_empty() {
            log::debug!("Load called with no files, ignoring");
            return Ok(0);
        }
        let data = Self::read_all(files)?;
        let count = self.register_all(data);
        log::info!("🖼️ Loaded {} images ({} total)", count, self.items.len());
        Ok(count)
    }

    /// Release everything, then load `files`.
    ///
    /// Files are read first; if any fails the previous images stay loaded.
    pub fn replace(&mut self, files: &[ImageSource]) -> Result<usize> {
        let data = Self::read_all(files)?;
        self.delete_all();
        let count = self.register_all(data);
        log::info!("🖼️ Replaced collection with {} images", count);
        Ok(count)
    }

    /// View the image at `index`.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(WorkspaceError::Range {
                index,
                len: self.items.len(),
            });
        }
        self.current_index = index;
        log::debug!("Selected image {} ({})", index, self.items[index].id);
        Ok(())
    }

    /// Advance to the next image, wrapping around.
    pub fn select_next(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.items.len();
        Some(self.current_index)
    }

    /// Go back to the previous image, wrapping around.
    pub fn select_prev(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.current_index = if self.current_index == 0 {
            self.items.len() - 1
        } else {
            self.current_index - 1
        };
        Some(self.current_index)
    }

    /// Remove one image and release its handle.
    pub fn remove(&mut self, index: usize) -> Result<LoadedImage> {
        if index >= self.items.len() {
            return Err(WorkspaceError::Range {
                index,
                len: self.items.len(),
            });
        }
        let image = self.items.remove(index);
        self.registry.release(image.handle);

        if self.items.is_empty() {
            self.current_index = 0;
        } else if index < self.current_index || self.current_index >= self.items.len() {
            self.current_index = self.current_index.saturating_sub(1);
        }
        log::debug!("Removed image {} ({} left)", image.id, self.items.len());
        Ok(image)
    }

    /// Release every handle and empty the collection.
    pub fn delete_all(&mut self) -> usize {
        let count = self.items.len();
        for image in self.items.drain(..) {
            self.registry.release(image.handle);
        }
        self.current_index = 0;
        if count > 0 {
            log::debug!("Deleted all {} images", count);
        }
        count
    }

    /// Bytes of every image, in order, for submission.
    ///
    /// Fails if any listed image no longer has a live handle.
    pub fn payload(&self) -> Result<Vec<(&LoadedImage, Arc<[u8]>)>> {
        self.items
            .iter()
            .map(|image| match self.registry.bytes(image.handle) {
                Some(bytes) => Ok((image, bytes)),
                None => {
                    log::error!("{} is listed but {} is not live", image.id, image.handle);
                    Err(WorkspaceError::input(image.id.as_str(), "image handle was released"))
                }
            })
            .collect()
    }
}

impl Drop for ImageCollection {
    fn drop(&mut self) {
        if !self.items.is_empty() {
            log::debug!("Collection torn down with {} images", self.items.len());
            self.delete_all();
        }
    }
}
