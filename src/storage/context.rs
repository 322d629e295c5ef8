//! Startup context
//!
//! Bundles the values resolved once per process (anchor, configuration,
//! terminal snapshot) and hands them to the components that need them.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::workdir::{self, WorkdirGuard};
use super::{Anchor, Config, ConfigError, LogSink, ProcessLock};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to resolve anchor directory {path}: {source}")]
    Anchor { path: PathBuf, source: io::Error },

    #[error("Failed to locate the running executable: {0}")]
    Executable(io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Process-wide values, resolved at startup and passed explicitly
#[derive(Debug, Clone)]
pub struct Context {
    anchor: Anchor,
    config: Config,
    sink: LogSink,
}

impl Context {
    /// Builds a context from already-resolved parts
    pub fn new(anchor: Anchor, config: Config, tty: bool) -> Self {
        let sink = LogSink::new(&anchor, &config, tty);
        Self {
            anchor,
            config,
            sink,
        }
    }

    /// Resolves the anchor (the override, else the executable's directory),
    /// loads its configuration and snapshots whether stdout is a terminal
    pub fn discover(anchor_override: Option<&Path>) -> Result<Self, ContextError> {
        let anchor = match anchor_override {
            Some(path) => Anchor::new(path).map_err(|source| ContextError::Anchor {
                path: path.to_path_buf(),
                source,
            })?,
            None => Anchor::from_current_exe().map_err(ContextError::Executable)?,
        };

        let config = Config::for_anchor(anchor.path())?;
        let tty = io::stdout().is_terminal();

        Ok(Self::new(anchor, config, tty))
    }

    /// Returns the anchor directory
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Returns the loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the tee logger
    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Terminal snapshot taken at startup
    pub fn is_tty(&self) -> bool {
        self.sink.is_tty()
    }

    pub fn enter_root(&self) -> io::Result<WorkdirGuard> {
        workdir::enter_root(&self.anchor)
    }

    pub fn enter_subdirectory(&self, name: impl AsRef<Path>) -> io::Result<WorkdirGuard> {
        workdir::enter_subdirectory(&self.anchor, &self.sink, name)
    }

    /// Blocks until the named lock is held
    pub fn lock(&self, name: &str) -> io::Result<ProcessLock> {
        ProcessLock::acquire(&self.anchor, name)
    }

    pub fn try_lock(&self, name: &str) -> io::Result<Option<ProcessLock>> {
        ProcessLock::try_acquire(&self.anchor, name)
    }

    /// Locks on the running executable's name
    pub fn lock_default(&self) -> io::Result<ProcessLock> {
        self.lock(&ProcessLock::default_name()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discover_with_override() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("scriptkit.toml"),
            "[log]\nfile = \"ctx.log\"\n",
        )
        .unwrap();

        let ctx = Context::discover(Some(dir.path())).unwrap();
        assert_eq!(ctx.anchor().path(), dir.path().canonicalize().unwrap());
        assert_eq!(ctx.config().log().file, "ctx.log");
        assert_eq!(ctx.sink().path(), ctx.anchor().join("ctx.log"));
    }

    #[test]
    fn discover_without_override_uses_executable_dir() {
        let ctx = Context::discover(None).unwrap();
        let exe = std::env::current_exe().unwrap().canonicalize().unwrap();
        assert_eq!(ctx.anchor().path(), exe.parent().unwrap());
    }

    #[test]
    fn missing_anchor_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = Context::discover(Some(&missing)).unwrap_err();
        assert!(matches!(err, ContextError::Anchor { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn tty_snapshot_is_fixed_at_construction() {
        let dir = TempDir::new().unwrap();
        let anchor = Anchor::new(dir.path()).unwrap();

        let ctx = Context::new(anchor, Config::default(), true);
        assert!(ctx.is_tty());
        assert!(ctx.sink().is_tty());
    }

    #[test]
    #[serial]
    fn components_share_the_anchor() {
        let dir = TempDir::new().unwrap();
        let anchor = Anchor::new(dir.path()).unwrap();
        let ctx = Context::new(anchor, Config::default(), false);

        {
            let lock = ctx.lock("ctx").unwrap();
            assert!(ctx.try_lock("ctx").unwrap().is_none());
            assert_eq!(lock.path(), ctx.anchor().join("ctx.lock"));
        }

        {
            let guard = ctx.enter_subdirectory("out").unwrap();
            assert_eq!(guard.current(), ctx.anchor().join("out"));
        }

        {
            let guard = ctx.enter_root().unwrap();
            assert_eq!(guard.current(), ctx.anchor().path());
        }

        {
            let lock = ctx.lock_default().unwrap();
            assert!(lock.path().starts_with(ctx.anchor().path()));
        }
    }
}
