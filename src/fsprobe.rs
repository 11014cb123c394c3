//! Filesystem probing behind a trait.
//!
//! Convention dispatch walks the application tree asking only two questions:
//! is this path a readable controller file, is this path a directory. Keeping
//! those answers behind [`FileProbe`] lets tests resolve against a fake tree
//! without touching disk.

use std::path::Path;

/// Filesystem answers used by convention dispatch and asset serving.
pub trait FileProbe: Send + Sync {
    /// True when `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// True when `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Probe backed by `std::fs` metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeProbe;

impl FileProbe for NativeProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_probe_answers() {
        let probe = NativeProbe;
        assert!(probe.is_file(Path::new("Cargo.toml")));
        assert!(probe.is_dir(Path::new("src")));
        assert!(!probe.is_file(Path::new("no-such-file")));
        assert!(!probe.is_dir(Path::new("Cargo.toml")));
    }
}
