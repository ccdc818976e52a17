//! Clip existence checks.

use std::path::Path;

/// Decides whether a clip has already been rendered.
///
/// The key is the clip's target path; a hit means the renderer leaves the
/// clip alone. There is no content hashing and no invalidation.
pub trait ClipCache {
    fn contains(&self, clip: &Path) -> bool;
}

/// Treats any existing file at the target path as rendered.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsClipCache;

impl ClipCache for FsClipCache {
    fn contains(&self, clip: &Path) -> bool {
        clip.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_cache_follows_files() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("r_00001.wav");

        assert!(!FsClipCache.contains(&clip));
        std::fs::write(&clip, b"RIFF").unwrap();
        assert!(FsClipCache.contains(&clip));
    }
}
