//! Log record model
//!
//! A record is never persisted as an object. It carries the parts of a
//! message plus the rendering hints, and knows how to format itself for
//! the console and for the log file.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width of the centred tag field
pub const TAG_WIDTH: usize = 10;

/// Separator between a tag and the rest of the first part
pub const TAG_SEPARATOR: char = ':';

/// SGR colour code used to highlight a tag, e.g. `32` or `1;31`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub const GREEN: &'static str = "32";
    pub const YELLOW: &'static str = "33";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn green() -> Self {
        Self::new(Self::GREEN)
    }

    pub fn yellow() -> Self {
        Self::new(Self::YELLOW)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category of a record. Only affects the default highlight colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
        }
    }
}

/// Console stream a record is mirrored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Console {
    #[default]
    Stdout,
    Stderr,
}

/// What happens after a record has been written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitOutcome {
    #[default]
    Continue,
    Terminate(i32),
}

impl ExitOutcome {
    /// Maps the boolean form of the fatal flag: `true` terminates with code 1
    pub fn from_flag(fatal: bool) -> Self {
        if fatal {
            ExitOutcome::Terminate(1)
        } else {
            ExitOutcome::Continue
        }
    }

    /// Maps the integer form of the fatal flag: zero means continue
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            ExitOutcome::Continue
        } else {
            ExitOutcome::Terminate(code)
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExitOutcome::Continue => None,
            ExitOutcome::Terminate(code) => Some(*code),
        }
    }
}

/// A single message on its way to the log file and the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    parts: Vec<String>,
    pub severity: Severity,
    /// Overrides the severity's colour
    pub color: Option<Color>,
    /// Overrides the terminal snapshot taken at startup
    pub tty: Option<bool>,
    pub console: Option<Console>,
    /// Written to the console after the message
    pub end: String,
}

impl LogRecord {
    /// Builds a record from anything displayable
    pub fn new<I, T>(parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self {
            parts: parts.into_iter().map(|p| p.to_string()).collect(),
            severity: Severity::Info,
            color: None,
            tty: None,
            console: None,
            end: "\n".to_string(),
        }
    }

    pub fn warn<I, T>(parts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::new(parts).with_severity(Severity::Warn)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_tty(mut self, tty: bool) -> Self {
        self.tty = Some(tty);
        self
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = Some(console);
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = end.into();
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Renders the message without timestamp
    pub fn render(&self, tty: bool, color: &Color) -> String {
        format_message(&self.parts, tty, color)
    }
}

/// Splits `tag: rest` when the separator appears before any whitespace
pub fn split_tag(first: &str) -> Option<(&str, &str)> {
    let sep = first.find(|c: char| c == TAG_SEPARATOR || c.is_whitespace())?;
    if first[sep..].starts_with(TAG_SEPARATOR) {
        Some((&first[..sep], &first[sep + TAG_SEPARATOR.len_utf8()..]))
    } else {
        None
    }
}

/// Renders a tag in its fixed-width field
pub fn render_tag(tag: &str, tty: bool, color: &Color) -> String {
    if tty {
        format!(
            "\x1b[30m[\x1b[{}m{:^width$}\x1b[30m]\x1b[0m",
            color,
            tag,
            width = TAG_WIDTH
        )
    } else {
        format!("[{:^width$}]", tag, width = TAG_WIDTH)
    }
}

/// Formats message parts for output
///
/// The rest of the first part keeps its leading whitespace, so
/// `"tag: message"` renders as `"[   tag    ]  message"`.
pub fn format_message(parts: &[String], tty: bool, color: &Color) -> String {
    let Some((first, rest)) = parts.split_first() else {
        return String::new();
    };

    match split_tag(first) {
        Some((tag, tail)) => {
            let mut pieces = Vec::with_capacity(parts.len() + 1);
            pieces.push(render_tag(tag, tty, color));
            pieces.push(tail.to_string());
            pieces.extend(rest.iter().cloned());
            pieces.join(" ")
        }
        None => parts.join(" "),
    }
}

/// Formats a UTC timestamp the way log lines carry it
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Builds the persisted line, newline included
pub fn log_line(at: DateTime<Utc>, message: &str) -> String {
    format!("{} {}\n", format_timestamp(at), message)
}
