//! Image lookup by name
//!
//! The game never loads pixels itself. A `ResourceProvider` maps image names
//! (file stems such as `player2_jump`) to opaque handles owned by whoever
//! draws the frame. Missing names are normal and render as placeholders.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::sim::Player;

/// File extensions picked up when scanning an asset directory
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Opaque reference to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub u32);

/// Name-to-image lookup
pub trait ResourceProvider {
    fn get(&self, name: &str) -> Option<ImageHandle>;
}

/// Images found on disk (or registered by name), keyed by file stem
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    handles: BTreeMap<String, ImageHandle>,
    paths: Vec<PathBuf>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog from bare file names; non-image files are skipped
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for name in names {
            catalog.insert(PathBuf::from(name.as_ref()));
        }
        catalog
    }

    /// Index every image in `dir`
    ///
    /// A missing directory yields an empty catalog (everything renders as a
    /// placeholder); other I/O failures are returned.
    pub fn scan_dir(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            log::warn!("Asset directory {} not found, using placeholders", dir.display());
            return Ok(Self::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        // read_dir order is platform dependent
        files.sort();

        let mut catalog = Self::new();
        for path in files {
            catalog.insert(path);
        }
        log::info!("Indexed {} images from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    fn insert(&mut self, path: PathBuf) -> Option<ImageHandle> {
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !is_image {
            return None;
        }
        let stem = path.file_stem()?.to_str()?.to_string();
        if let Some(&handle) = self.handles.get(&stem) {
            return Some(handle);
        }
        let handle = ImageHandle(self.paths.len() as u32);
        log::debug!("Asset {stem} -> {}", path.display());
        self.handles.insert(stem, handle);
        self.paths.push(path);
        Some(handle)
    }

    /// Source file of a handle
    pub fn path(&self, handle: ImageHandle) -> Option<&Path> {
        self.paths.get(handle.0 as usize).map(PathBuf::as_path)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl ResourceProvider for AssetCatalog {
    fn get(&self, name: &str) -> Option<ImageHandle> {
        self.handles.get(name).copied()
    }
}

/// Idle and jump images for the player's current form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinImages {
    pub idle: Option<ImageHandle>,
    pub jump: Option<ImageHandle>,
}

impl SkinImages {
    /// Missing idle falls back to the base skin, missing jump to idle
    pub fn resolve(provider: &dyn ResourceProvider, player: &Player) -> Self {
        let idle = provider
            .get(&player.idle_skin())
            .or_else(|| provider.get(&player.base_skin));
        let jump = provider.get(&player.jump_skin()).or(idle);
        Self { idle, jump }
    }

    /// Image for the current pose, `None` means draw the placeholder
    pub fn current(&self, jumping: bool) -> Option<ImageHandle> {
        if jumping { self.jump } else { self.idle }
    }
}
