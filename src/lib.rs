//! scriptkit - Shared infrastructure for suites of independent scripts
//!
//! Scripts resolve everything against an anchor directory. Within it,
//! scriptkit provides scoped working-directory changes, single-instance
//! locks on named resources, and a tee logger that writes each message to
//! a log file and the console, with an explicit fatal exit path.

pub mod domain;
pub mod storage;
pub mod support;
pub mod cli;

pub use domain::{slugify, strip_smartquotes, ExitOutcome, LogRecord, Severity};
pub use storage::{Anchor, Context, LogSink, ProcessLock, WorkdirGuard};
