//! Minimal filesystem seam for the state file.
//!
//! | Trait | Production | Test |
//! |-------|------------|------|
//! | [`ReadFile`], [`WriteFile`], [`ExistsFile`] | [`SystemFs`] | [`MemFs`]* |
//!
//! *Available with `#[cfg(test)]` or the `"test-support"` feature.

use std::io;
use std::path::Path;

pub trait ReadFile {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

pub trait WriteFile {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

pub trait ExistsFile {
    fn exists(&self, path: &Path) -> bool;
}

/// Delegates to `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl ReadFile for SystemFs {
    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

impl WriteFile for SystemFs {
    #[inline]
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

impl ExistsFile for SystemFs {
    #[inline]
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use mem::MemFs;

#[cfg(any(test, feature = "test-support"))]
mod mem {
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use super::{ExistsFile, ReadFile, WriteFile};

    /// In-memory files keyed by the raw [`PathBuf`], no normalization.
    ///
    /// Clones share the same files, so a test can keep a handle after moving
    /// one into a store.
    #[derive(Debug, Clone, Default)]
    pub struct MemFs {
        files: Arc<Mutex<HashMap<PathBuf, String>>>,
    }

    impl MemFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<String>) {
            self.files
                .lock()
                .unwrap()
                .insert(path.as_ref().to_path_buf(), content.into());
        }

        pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
            self.files.lock().unwrap().get(path.as_ref()).cloned()
        }
    }

    impl ReadFile for MemFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.get(path)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
        }
    }

    impl WriteFile for MemFs {
        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            self.insert(path, contents);
            Ok(())
        }
    }

    impl ExistsFile for MemFs {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }
}
