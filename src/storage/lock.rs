//! Single-instance process locks
//!
//! A lock is an empty `<name>.lock` file in the anchor directory holding an
//! exclusive advisory lock (`flock` on Unix). Only processes that use this
//! same mechanism are excluded. Acquisition blocks in the kernel until the
//! current holder releases; there is no timeout.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::workdir::{self, WorkdirGuard};
use super::Anchor;

/// Extension appended to lock names
pub const LOCK_EXTENSION: &str = "lock";

/// Held exclusive lock; released on drop
///
/// While held, the working directory is the anchor directory. On drop the
/// lock is released, the file closed and the previous working directory
/// restored, in that order.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ProcessLock {
    file: File,
    name: String,
    path: PathBuf,
    _workdir: WorkdirGuard,
}

impl ProcessLock {
    /// Acquires the lock, blocking until it is available
    pub fn acquire(anchor: &Anchor, name: &str) -> io::Result<Self> {
        let (file, path, workdir) = open_lock_file(anchor, name)?;
        file.lock_exclusive()?;

        Ok(Self {
            file,
            name: name.to_string(),
            path,
            _workdir: workdir,
        })
    }

    /// Acquires the lock if nobody holds it, `None` otherwise
    pub fn try_acquire(anchor: &Anchor, name: &str) -> io::Result<Option<Self>> {
        let (file, path, workdir) = open_lock_file(anchor, name)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                file,
                name: name.to_string(),
                path,
                _workdir: workdir,
            })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Runs `f` while holding the lock
    pub fn run<T>(anchor: &Anchor, name: &str, f: impl FnOnce() -> T) -> io::Result<T> {
        let _lock = Self::acquire(anchor, name)?;
        Ok(f())
    }

    /// Lock name derived from the running executable's file stem
    pub fn default_name() -> io::Result<String> {
        let exe = std::env::current_exe()?;
        name_from_path(&exe).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot derive a lock name from {}", exe.display()),
            )
        })
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ProcessLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// File stem of `path`, used as a lock name
pub fn name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Enters the anchor and opens (creating, truncating) the lock file
///
/// Nothing is locked yet; a failure here leaves no state behind.
fn open_lock_file(anchor: &Anchor, name: &str) -> io::Result<(File, PathBuf, WorkdirGuard)> {
    validate_name(name)?;

    let workdir = workdir::enter_root(anchor)?;
    let path = anchor.join(format!("{}.{}", name, LOCK_EXTENSION));
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)?;

    Ok((file, path, workdir))
}

fn validate_name(name: &str) -> io::Result<()> {
    let has_separator = name.chars().any(std::path::is_separator);
    if name.is_empty() || has_separator || name == "." || name == ".." {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid lock name: {:?}", name),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Anchor) {
        let dir = TempDir::new().unwrap();
        let anchor = Anchor::new(dir.path()).unwrap();
        (dir, anchor)
    }

    fn cwd() -> PathBuf {
        env::current_dir().unwrap().canonicalize().unwrap()
    }

    #[test]
    #[serial]
    fn acquire_creates_empty_lock_file() {
        let (_dir, anchor) = setup();

        let lock = ProcessLock::acquire(&anchor, "backup").unwrap();
        assert_eq!(lock.name(), "backup");
        assert_eq!(lock.path(), anchor.join("backup.lock"));
        assert!(lock.path().is_file());
        assert_eq!(std::fs::metadata(lock.path()).unwrap().len(), 0);
    }

    #[test]
    #[serial]
    fn protected_block_runs_in_anchor() {
        let (_dir, anchor) = setup();
        let before = cwd();

        {
            let _lock = ProcessLock::acquire(&anchor, "job").unwrap();
            assert_eq!(cwd(), anchor.path());
        }

        assert_eq!(cwd(), before);
    }

    #[test]
    #[serial]
    fn held_lock_excludes_second_holder() {
        let (_dir, anchor) = setup();

        let first = ProcessLock::acquire(&anchor, "sync").unwrap();
        assert!(ProcessLock::try_acquire(&anchor, "sync").unwrap().is_none());

        drop(first);
        let second = ProcessLock::try_acquire(&anchor, "sync").unwrap();
        assert!(second.is_some());
    }

    #[test]
    #[serial]
    fn different_names_do_not_conflict() {
        let (_dir, anchor) = setup();

        let _a = ProcessLock::acquire(&anchor, "a").unwrap();
        let b = ProcessLock::try_acquire(&anchor, "b").unwrap();
        assert!(b.is_some());
    }

    #[test]
    #[serial]
    fn failed_try_restores_directory() {
        let (_dir, anchor) = setup();
        let before = cwd();

        {
            let _held = ProcessLock::acquire(&anchor, "busy").unwrap();
            assert!(ProcessLock::try_acquire(&anchor, "busy").unwrap().is_none());
            assert_eq!(cwd(), anchor.path());
        }

        assert_eq!(cwd(), before);
    }

    #[test]
    #[serial]
    fn run_releases_after_closure() {
        let (_dir, anchor) = setup();

        let value = ProcessLock::run(&anchor, "once", || 42).unwrap();
        assert_eq!(value, 42);
        assert!(ProcessLock::try_acquire(&anchor, "once").unwrap().is_some());
    }

    #[test]
    #[serial]
    fn blocked_acquire_waits_for_release() {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let (_dir, anchor) = setup();
        let path = anchor.join("wait.lock");

        // The waiting side opens the file directly so only one thread
        // touches the working directory.
        let held = ProcessLock::acquire(&anchor, "wait").unwrap();
        let (tx, rx) = mpsc::channel();
        let waiter = thread::spawn(move || {
            let file = OpenOptions::new().write(true).open(&path).unwrap();
            file.lock_exclusive().unwrap();
            tx.send(()).unwrap();
        });

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        drop(held);
        rx.recv_timeout(Duration::from_secs(10)).unwrap();
        waiter.join().unwrap();
    }

    #[test]
    #[serial]
    fn invalid_names_are_rejected_before_locking() {
        let (_dir, anchor) = setup();
        let before = cwd();

        for name in ["", "a/b", ".", ".."] {
            let err = ProcessLock::acquire(&anchor, name).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }

        assert_eq!(cwd(), before);
        assert_eq!(std::fs::read_dir(anchor.path()).unwrap().count(), 0);
    }

    #[test]
    #[serial]
    fn open_failure_propagates() {
        let (_dir, anchor) = setup();
        std::fs::create_dir(anchor.join("taken.lock")).unwrap();
        let before = cwd();

        let err = ProcessLock::acquire(&anchor, "taken").unwrap_err();
        assert!(err.raw_os_error().is_some());
        assert_eq!(cwd(), before);
    }

    #[test]
    fn names_come_from_file_stems() {
        assert_eq!(
            name_from_path(Path::new("/opt/scripts/backup.py")),
            Some("backup".to_string())
        );
        assert_eq!(name_from_path(Path::new("nightly")), Some("nightly".to_string()));
        assert_eq!(name_from_path(Path::new("/")), None);
    }

    #[test]
    fn default_name_uses_executable() {
        let name = ProcessLock::default_name().unwrap();
        assert!(!name.is_empty());
    }
}
