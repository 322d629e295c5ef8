//! Collaborator commands: `slug`, `unquote`, `mime`, `spawn`, `config`

use std::path::Path;

use anyhow::{Context as _, Result};

use super::output::Output;
use crate::domain::{slugify, strip_smartquotes};
use crate::storage::Context;
use crate::support;

pub fn slug(output: &Output, text: &str, allow: &str) -> Result<()> {
    output.value("slug", &slugify(text, allow));
    Ok(())
}

pub fn unquote(output: &Output, text: &str) -> Result<()> {
    output.value("text", &strip_smartquotes(text));
    Ok(())
}

pub fn mime(output: &Output, path: &Path) -> Result<()> {
    let mime = support::mime_type(path)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;
    output.value("mime", &mime);
    Ok(())
}

pub fn spawn(output: &Output, program: &str, args: &[String]) -> Result<()> {
    let pid = support::spawn(program, args).with_context(|| format!("Failed to start '{}'", program))?;
    output.verbose_ctx("spawn", &format!("Started '{}' as {}", program, pid));

    if output.is_json() {
        output.data(&serde_json::json!({ "pid": pid }));
    } else {
        println!("{}", pid);
    }
    Ok(())
}

/// Prints the effective configuration and where it was resolved from
pub fn config(ctx: &Context, output: &Output) -> Result<()> {
    output.data(&serde_json::json!({
        "anchor": ctx.anchor().path().display().to_string(),
        "log_file": ctx.sink().path().display().to_string(),
        "tty": ctx.is_tty(),
        "config": ctx.config(),
    }));
    Ok(())
}
