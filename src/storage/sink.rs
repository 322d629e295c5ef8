//! Tee logging with timestamps
//!
//! Every record is appended as one line to the log file inside the anchor
//! directory and mirrored to the console. The file is opened, appended and
//! closed per record; appends from separate processes are not synchronized.
//!
//! Termination is separate from severity: [`LogSink::fatal`] and
//! [`LogSink::die`] write the record, print `Quitting.` and exit.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{Anchor, Config, LogConfig};
use crate::domain::{log_line, Console, ExitOutcome, LogRecord};

/// Printed before a fatal exit
pub const QUITTING: &str = "Quitting.";

/// What a single emission produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub at: DateTime<Utc>,
    /// Console form, without timestamp
    pub message: String,
    /// Line appended to the log file, timestamp and newline included
    pub line: String,
}

/// Writes records to the log file and the console
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
    tty: bool,
    settings: LogConfig,
}

impl LogSink {
    /// Creates a sink for the anchor; `tty` is the terminal snapshot used
    /// unless a record overrides it
    pub fn new(anchor: &Anchor, config: &Config, tty: bool) -> Self {
        let settings = config.log().clone();
        Self {
            path: anchor.join(&settings.file),
            tty,
            settings,
        }
    }

    /// Returns the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Terminal snapshot taken at startup
    pub fn is_tty(&self) -> bool {
        self.tty
    }

    /// Logs space-joined parts with the default colour
    pub fn log<I, T>(&self, parts: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        self.emit(&LogRecord::new(parts)).map(|_| ())
    }

    /// Logs with the warning colour; never terminates
    pub fn warn<I, T>(&self, parts: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        self.emit(&LogRecord::warn(parts)).map(|_| ())
    }

    /// Writes a record to both destinations
    pub fn emit(&self, record: &LogRecord) -> io::Result<Emitted> {
        let console = record.console.unwrap_or(self.settings.console);
        match console {
            Console::Stdout => self.emit_to(record, &mut io::stdout().lock()),
            Console::Stderr => self.emit_to(record, &mut io::stderr().lock()),
        }
    }

    /// Writes a record to the log file and to `console`
    ///
    /// Both destinations get the same rendering, escape codes included when
    /// the effective TTY setting is on. Nothing reaches the console if the
    /// append fails.
    pub fn emit_to<W: Write>(&self, record: &LogRecord, console: &mut W) -> io::Result<Emitted> {
        let tty = record.tty.unwrap_or(self.tty);
        let color = record
            .color
            .as_ref()
            .unwrap_or_else(|| self.settings.color_for(record.severity));

        let message = record.render(tty, color);
        let at = Utc::now();
        let line = log_line(at, &message);

        self.append(&line)?;

        console.write_all(message.as_bytes())?;
        console.write_all(record.end.as_bytes())?;
        console.flush()?;

        Ok(Emitted { at, message, line })
    }

    /// Appends one line to the log file, opening and closing it
    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Emits the record, then exits if the outcome asks for it
    ///
    /// This is the combined form of the old `fatal` flag:
    /// `ExitOutcome::from_flag(true)` exits with 1, `from_code(n)` with `n`.
    pub fn log_with(&self, record: &LogRecord, outcome: ExitOutcome) -> io::Result<Emitted> {
        match outcome {
            ExitOutcome::Continue => self.emit(record),
            ExitOutcome::Terminate(code) => self.fatal(record, code),
        }
    }

    /// Emits the record, prints `Quitting.` and exits with `code`
    ///
    /// A log file that cannot be written is reported on stderr; the process
    /// still exits with `code`.
    pub fn fatal(&self, record: &LogRecord, code: i32) -> ! {
        if let Err(err) = self.emit(record) {
            eprintln!("Error: failed to write {}: {}", self.path.display(), err);
        }
        self.quit(code)
    }

    /// Unconditionally fatal with exit code 1
    pub fn die<I, T>(&self, parts: I) -> !
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        self.fatal(&LogRecord::new(parts), 1)
    }

    fn quit(&self, code: i32) -> ! {
        let _ = Self::write_quitting(&mut io::stdout().lock());
        std::process::exit(code)
    }

    /// Writes `Quitting.` to `console`; the testable half of a fatal exit
    pub fn write_quitting<W: Write>(console: &mut W) -> io::Result<()> {
        writeln!(console, "{}", QUITTING)?;
        console.flush()
    }
}
