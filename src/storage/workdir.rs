//! Scoped working-directory changes
//!
//! Each guard records the working directory in effect when it was created
//! and restores it when dropped, whether the scope ends normally, through
//! `?` or by unwinding. Nested guards unwind in reverse order because Rust
//! drops them that way.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Anchor, LogSink};

/// Restores the recorded working directory on drop
#[derive(Debug)]
#[must_use = "the working directory is restored as soon as the guard is dropped"]
pub struct WorkdirGuard {
    previous: PathBuf,
    current: PathBuf,
}

impl WorkdirGuard {
    /// Records the current directory and changes into `target`
    pub fn enter(target: impl AsRef<Path>) -> io::Result<Self> {
        let previous = env::current_dir()?;
        let current = target.as_ref().to_path_buf();
        env::set_current_dir(&current)?;
        Ok(Self { previous, current })
    }

    /// Directory that will be restored
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Directory entered by this guard
    pub fn current(&self) -> &Path {
        &self.current
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Changes into the anchor directory
pub fn enter_root(anchor: &Anchor) -> io::Result<WorkdirGuard> {
    WorkdirGuard::enter(anchor.path())
}

/// Changes into `anchor/name`, creating missing segments first
///
/// Creation is reported through the sink as `mkdir: <path>`.
pub fn enter_subdirectory(
    anchor: &Anchor,
    sink: &LogSink,
    name: impl AsRef<Path>,
) -> io::Result<WorkdirGuard> {
    let subdirectory = anchor.join(name);
    if !subdirectory.exists() {
        fs::create_dir_all(&subdirectory)?;
        sink.log([format!("mkdir: {}", subdirectory.display())])?;
    }
    WorkdirGuard::enter(subdirectory)
}

/// Runs `f` inside the anchor directory
pub fn in_root<T>(anchor: &Anchor, f: impl FnOnce() -> T) -> io::Result<T> {
    let _guard = enter_root(anchor)?;
    Ok(f())
}

/// Runs `f` inside `anchor/name`
pub fn in_subdirectory<T>(
    anchor: &Anchor,
    sink: &LogSink,
    name: impl AsRef<Path>,
    f: impl FnOnce() -> T,
) -> io::Result<T> {
    let _guard = enter_subdirectory(anchor, sink, name)?;
    Ok(f())
}
