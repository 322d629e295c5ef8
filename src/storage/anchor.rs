//! Anchor directory
//!
//! The real on-disk directory that lock files and the log file live in.

use std::io;
use std::path::{Path, PathBuf};

/// Absolute, symlink-free directory resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    dir: PathBuf,
}

impl Anchor {
    /// Resolves `dir` to its canonical path
    ///
    /// Fails if the directory does not exist or is not a directory.
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().canonicalize()?;
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("anchor is not a directory: {}", dir.display()),
            ));
        }
        Ok(Self { dir })
    }

    /// Directory containing the running executable
    pub fn from_current_exe() -> io::Result<Self> {
        let exe = std::env::current_exe()?.canonicalize()?;
        let dir = exe.parent().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("executable has no parent directory: {}", exe.display()),
            )
        })?;
        Self::new(dir)
    }

    /// Returns the anchor directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path of an entry directly under the anchor
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.join(name)
    }
}

impl AsRef<Path> for Anchor {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}
