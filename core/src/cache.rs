//! Build-cache pruning under a workspace root.

use std::path::Path;

use tracing::{debug, warn};

/// Relative cache directories removed by a prune, in removal order.
const CACHE_DIRS: &[&str] = &[
    ".turbo",
    ".next",
    "node_modules/.cache",
    ".parcel-cache",
    "dist",
    "build/.cache",
];

/// Removes well-known build/bundler/package-manager cache directories.
pub struct CacheCleaner;

impl CacheCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Remove the known cache directories under `root`, recursively and
    /// permanently. A missing directory is not an error; returns `false`
    /// only when a removal fails partway, leaving the remaining targets
    /// untouched.
    pub async fn clear(&self, root: &Path) -> bool {
        for dir in CACHE_DIRS {
            let target = root.join(dir);
            match tokio::fs::remove_dir_all(&target).await {
                Ok(()) => debug!(path = %target.display(), "removed cache directory"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %target.display(), error = %e, "cache removal failed");
                    return false;
                }
            }
        }
        true
    }
}

impl Default for CacheCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_with_no_targets_succeeds() {
        let root = tempfile::tempdir().unwrap();
        let cleaner = CacheCleaner::new();
        // Absence of targets is success, not failure
        assert!(cleaner.clear(root.path()).await);
    }

    #[tokio::test]
    async fn test_clear_removes_known_directories() {
        let root = tempfile::tempdir().unwrap();
        let next = root.path().join(".next");
        let node_cache = root.path().join("node_modules/.cache");
        std::fs::create_dir_all(&next).unwrap();
        std::fs::create_dir_all(&node_cache).unwrap();
        std::fs::write(next.join("trace"), b"x").unwrap();

        let cleaner = CacheCleaner::new();
        assert!(cleaner.clear(root.path()).await);
        assert!(!next.exists());
        assert!(!node_cache.exists());
        // node_modules itself stays
        assert!(root.path().join("node_modules").exists());
    }

    #[tokio::test]
    async fn test_clear_leaves_unrelated_directories() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        std::fs::create_dir_all(&src).unwrap();

        let cleaner = CacheCleaner::new();
        assert!(cleaner.clear(root.path()).await);
        assert!(src.exists());
    }
}
