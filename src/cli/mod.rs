//! # Command-Line Interface
//!
//! Exposes the library primitives to shell scripts.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Logging | Tee a message to the log and console | `log`, `warn`, `die` |
//! | Scopes | Run a command under a lock or in a subdirectory | `lock`, `subdir` |
//! | Helpers | Text transforms and file inspection | `slug`, `unquote`, `mime`, `spawn` |
//!
//! ## Anchor
//!
//! Lock files and the log live in the anchor directory: `--anchor`,
//! `$SCRIPTKIT_ANCHOR`, or the directory of the `scriptkit` executable.
//!
//! ```bash
//! scriptkit --anchor ~/jobs lock -- ./nightly.sh
//! scriptkit --anchor ~/jobs log "backup: finished" 3 files
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod lock_cmd;
mod log_cmd;
mod output;
mod util_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
