//! Domain models for scriptkit
//!
//! Contains message formatting and text transforms without any I/O concerns.

mod record;
mod text;

pub use record::{
    format_message, format_timestamp, log_line, render_tag, split_tag, Color, Console,
    ExitOutcome, LogRecord, Severity, TAG_SEPARATOR, TAG_WIDTH,
};
pub use text::{slugify, strip_smartquotes};
