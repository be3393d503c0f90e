//! Owned, renderable image resources.
//!
//! Every image shown in the workspace is backed by a [`ResourceHandle`] issued
//! by a [`ResourceRegistry`]. The registry owns the bytes; handles are plain
//! ids that renderers borrow. Releasing a handle drops the bytes and is
//! idempotent, so redundant cleanup paths are harmless.

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageFormat;

use crate::error::{Result, WorkspaceError};

/// Where an image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A file on disk, read on acquisition
    Path(PathBuf),
    /// Bytes already in memory (drag-and-drop, file input)
    Memory { name: String, bytes: Vec<u8> },
}

impl ImageSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes,
        }
    }

    /// File name used as the image id and label.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            Self::Memory { name, .. } => name.clone(),
        }
    }
}

/// Decoded metadata plus the raw bytes of an image file.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub name: String,
    pub bytes: Arc<[u8]>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Read and sniff an image source.
///
/// Only content `image` recognises is accepted; anything else is an input
/// error rather than a crash.
pub fn read_image(source: &ImageSource) -> Result<ImageData> {
    let name = source.name();
    let bytes: Vec<u8> = match source {
        ImageSource::Path(path) => read_file(path)?,
        ImageSource::Memory { bytes, .. } => bytes.clone(),
    };
    inspect_bytes(name, bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn inspect_bytes(name: String, bytes: Vec<u8>) -> Result<ImageData> {
    if bytes.is_empty() {
        return Err(WorkspaceError::input(name, "file is empty"));
    }

    let format = image::guess_format(&bytes)
        .map_err(|e| WorkspaceError::input(name.clone(), format!("not an image ({})", e)))?;

    let (width, height) = image::ImageReader::with_format(Cursor::new(&bytes[..]), format)
        .into_dimensions()
        .map_err(|e| WorkspaceError::input(name.clone(), e.to_string()))?;

    Ok(ImageData {
        name,
        bytes: Arc::from(bytes),
        format,
        width,
        height,
    })
}

/// Opaque reference to a registered image, rendered as a `blob:` style URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(u64);

impl ResourceHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:pixdesk/{}", self.0)
    }
}

/// Acquisition/release counters, used to prove nothing leaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceStats {
    pub acquired: u64,
    pub released: u64,
    pub live: usize,
}

/// Owner of every live image resource.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    next_id: u64,
    live: HashMap<ResourceHandle, ImageData>,
    acquired: u64,
    released: u64,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `source` and register it.
    pub fn acquire(&mut self, source: &ImageSource) -> Result<ResourceHandle> {
        let data = read_image(source)?;
        Ok(self.register(data))
    }

    /// Register data that has already been read. Never fails.
    pub fn register(&mut self, data: ImageData) -> ResourceHandle {
        self.next_id += 1;
        let handle = ResourceHandle(self.next_id);
        log::debug!(
            "🖼️ Acquired {} for {} ({}x{}, {} bytes)",
            handle,
            data.name,
            data.width,
            data.height,
            data.bytes.len()
        );
        self.live.insert(handle, data);
        self.acquired += 1;
        handle
    }

    /// Release a handle. Returns false if it was already released.
    pub fn release(&mut self, handle: ResourceHandle) -> bool {
        match self.live.remove(&handle) {
            Some(data) => {
                self.released += 1;
                log::debug!("Released {} ({})", handle, data.name);
                true
            }
            None => {
                log::debug!("Ignoring release of {}: already released", handle);
                false
            }
        }
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&ImageData> {
        self.live.get(&handle)
    }

    /// Shared view of the bytes behind a live handle.
    pub fn bytes(&self, handle: ResourceHandle) -> Option<Arc<[u8]>> {
        self.live.get(&handle).map(|data| Arc::clone(&data.bytes))
    }

    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            acquired: self.acquired,
            released: self.released,
            live: self.live.len(),
        }
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            log::warn!(
                "Resource registry dropped with {} live handles, releasing",
                self.live.len()
            );
            let handles: Vec<ResourceHandle> = self.live.keys().copied().collect();
            for handle in handles {
                self.release(handle);
            }
        }
    }
}
