//! # Storage Layer
//!
//! Everything that touches the anchor directory on disk.
//!
//! ## Files
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Log | One `<UTC ISO-8601> <message>` line per record | `<anchor>/log.txt` |
//! | Locks | Empty marker files holding an advisory lock | `<anchor>/<name>.lock` |
//! | Config | TOML | `<anchor>/scriptkit.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`ProcessLock`] uses file locking (`fs2`) to serialize processes
//! - [`LogSink`] appends are not synchronized across processes
//! - The working directory is process-wide; [`WorkdirGuard`]s must be
//!   dropped in reverse order of creation, which scoping guarantees
//!
//! ## Key Types
//!
//! - [`Context`] - Values resolved once at startup
//! - [`Anchor`] - The directory everything is resolved against
//! - [`WorkdirGuard`] - Scoped working-directory change
//! - [`ProcessLock`] - Scoped exclusive lock on a named resource
//! - [`LogSink`] - Tee logger with a fatal exit path

mod anchor;
mod config;
mod context;
mod lock;
mod sink;
pub mod workdir;

pub use anchor::Anchor;
pub use config::{
    AnchorConfig, Config, ConfigError, GlobalConfig, LogConfig, OutputFormat, ANCHOR_CONFIG_FILE,
};
pub use context::{Context, ContextError};
pub use lock::{name_from_path, ProcessLock, LOCK_EXTENSION};
pub use sink::{Emitted, LogSink, QUITTING};
pub use workdir::WorkdirGuard;
