//! Commands that run a child inside a scope: `lock` and `subdir`

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode, ExitStatus};

use anyhow::{Context as _, Result};

use super::output::Output;
use crate::storage::{name_from_path, Context};

/// Exit code when `--try` finds the lock held (EX_TEMPFAIL)
pub const LOCK_BUSY: u8 = 75;

/// Runs `command` while holding the named lock
///
/// Without a name, the lock is named after the command's file stem.
pub fn lock(
    ctx: &Context,
    output: &Output,
    name: Option<String>,
    try_only: bool,
    command: &[String],
) -> Result<ExitCode> {
    let (program, args) = split_command(command)?;
    let name = match name {
        Some(name) => name,
        None => name_from_path(Path::new(program))
            .with_context(|| format!("Cannot derive a lock name from '{}'", program))?,
    };

    let origin = env::current_dir().context("Failed to read working directory")?;

    output.verbose_ctx("lock", &format!("Acquiring '{}' in {}", name, ctx.anchor().path().display()));
    let _lock = if try_only {
        match ctx.try_lock(&name).with_context(|| format!("Failed to lock '{}'", name))? {
            Some(lock) => lock,
            None => {
                output.error(&format!("Lock '{}' is held by another process", name));
                return Ok(ExitCode::from(LOCK_BUSY));
            }
        }
    } else {
        ctx.lock(&name).with_context(|| format!("Failed to lock '{}'", name))?
    };
    output.verbose_ctx("lock", &format!("Holding '{}'", name));

    // The child keeps the caller's working directory; only the lock lives
    // in the anchor.
    let status = Command::new(resolve_program(&origin, program))
        .args(args)
        .current_dir(&origin)
        .status()
        .with_context(|| format!("Failed to run '{}'", program))?;

    output.verbose_ctx("lock", &format!("Releasing '{}' ({})", name, status));
    Ok(exit_code(status))
}

/// Runs `command` inside `<anchor>/<name>`, creating it if needed
pub fn subdir(ctx: &Context, output: &Output, name: &str, command: &[String]) -> Result<ExitCode> {
    let (program, args) = split_command(command)?;
    let origin = env::current_dir().context("Failed to read working directory")?;

    let guard = ctx
        .enter_subdirectory(name)
        .with_context(|| format!("Failed to enter '{}'", name))?;
    output.verbose_ctx("subdir", &format!("Running in {}", guard.current().display()));

    let status = Command::new(resolve_program(&origin, program))
        .args(args)
        .status()
        .with_context(|| format!("Failed to run '{}'", program))?;

    Ok(exit_code(status))
}

fn split_command(command: &[String]) -> Result<(&str, &[String])> {
    let (program, args) = command
        .split_first()
        .context("No command given after '--'")?;
    Ok((program.as_str(), args))
}

/// Paths with a separator are resolved against the caller's directory;
/// bare names are left for `PATH` lookup
fn resolve_program(origin: &Path, program: &str) -> PathBuf {
    let path = Path::new(program);
    if path.is_absolute() || !program.chars().any(std::path::is_separator) {
        path.to_path_buf()
    } else {
        origin.join(path)
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    let code = status.code().unwrap_or(1).clamp(0, 255);
    ExitCode::from(code as u8)
}
