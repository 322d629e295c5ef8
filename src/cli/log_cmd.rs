//! Tee logging commands: `log`, `warn`, `die`

use anyhow::{Context as _, Result};
use clap::Args;

use super::output::Output;
use crate::domain::{Color, Console, ExitOutcome, LogRecord, Severity};
use crate::storage::Context;

/// Options shared by `log` and `warn`
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Message parts, joined by single spaces. A leading `tag:` is highlighted.
    #[arg(required = true)]
    pub parts: Vec<String>,

    /// SGR colour code for the tag (e.g. 32, 1;31)
    #[arg(long)]
    pub color: Option<String>,

    /// Exit with this code after logging (0 continues)
    #[arg(long, value_name = "CODE", allow_negative_numbers = true)]
    pub fatal: Option<i32>,

    /// Mirror to stderr instead of the configured stream
    #[arg(long)]
    pub stderr: bool,

    /// Do not end the console line with a newline
    #[arg(long, short = 'n')]
    pub no_newline: bool,

    /// Force tag colouring on
    #[arg(long, conflicts_with = "no_tty")]
    pub tty: bool,

    /// Force tag colouring off
    #[arg(long)]
    pub no_tty: bool,
}

impl LogArgs {
    fn record(&self, severity: Severity) -> LogRecord {
        let mut record = LogRecord::new(&self.parts).with_severity(severity);
        if let Some(color) = &self.color {
            record = record.with_color(Color::new(color.clone()));
        }
        if self.stderr {
            record = record.with_console(Console::Stderr);
        }
        if self.no_newline {
            record = record.with_end("");
        }
        if self.tty {
            record = record.with_tty(true);
        } else if self.no_tty {
            record = record.with_tty(false);
        }
        record
    }
}

/// Runs `log` or `warn`
pub fn log(ctx: &Context, output: &Output, args: &LogArgs, severity: Severity) -> Result<()> {
    let record = args.record(severity);
    let outcome = args.fatal.map(ExitOutcome::from_code).unwrap_or_default();
    output.verbose_ctx(
        severity.as_str(),
        &format!("Appending to {}", ctx.sink().path().display()),
    );

    ctx.sink()
        .log_with(&record, outcome)
        .with_context(|| format!("Failed to write {}", ctx.sink().path().display()))?;

    Ok(())
}

/// Runs `die`
pub fn die(ctx: &Context, output: &Output, parts: &[String]) -> ! {
    output.verbose_ctx("die", &format!("Appending to {}", ctx.sink().path().display()));
    ctx.sink().die(parts)
}
