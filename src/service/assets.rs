//! Asset Retrieval
//!
//! The download path ends with "hand the caller the bytes for this
//! artwork". Where those bytes live is not this system's business, so
//! retrieval sits behind the [`AssetStore`] seam: a filesystem
//! implementation for deployment, an in-memory one for the demo binary
//! and tests.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Byte retrieval for artwork assets.
pub trait AssetStore: Send + Sync {
    /// Read the asset at `path` (catalog-relative, leading `/` allowed).
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Filesystem-backed asset store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    /// Serve assets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for FsAssetStore {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let relative = Path::new(path.trim_start_matches('/'));
        // Catalog paths are operator-supplied, but keep reads jailed to
        // the root anyway.
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "asset path escapes the store root",
            ));
        }
        std::fs::read(self.root.join(relative))
    }
}

/// In-memory asset store for demos and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetStore {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset under `path`.
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(normalize(&path.into()), bytes.into());
    }
}

impl AssetStore for MemoryAssetStore {
    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.assets
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "asset not found"))
    }
}

fn normalize(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}

/// MIME type for a delivery path, by extension.
pub fn mime_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_lookup() {
        assert_eq!(mime_for_path("/fortunes/cat_.svg"), "image/svg+xml");
        assert_eq!(mime_for_path("a.PNG"), "image/png");
        assert_eq!(mime_for_path("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for_path("blob.bin"), "application/octet-stream");
        assert_eq!(mime_for_path("noext"), "application/octet-stream");
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryAssetStore::new();
        store.insert("/fortunes/cat_.svg", b"<svg/>".to_vec());

        // Leading slash is insignificant on both sides.
        assert_eq!(store.read("fortunes/cat_.svg").unwrap(), b"<svg/>");
        assert_eq!(store.read("/fortunes/cat_.svg").unwrap(), b"<svg/>");
        assert!(store.read("/missing.svg").is_err());
    }

    #[test]
    fn test_fs_store_rejects_traversal() {
        let store = FsAssetStore::new("/tmp/assets");
        let err = store.read("../etc/passwd").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
