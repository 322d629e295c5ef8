//! Main CLI application structure

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{lock_cmd, log_cmd, util_cmd};
use crate::domain::Severity;
use crate::storage::Context;

#[derive(Parser)]
#[command(name = "scriptkit")]
#[command(author, version, about = "Locks, working-directory scopes and tee logging for scripts")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding lock files and the log (defaults to the executable's directory)
    #[arg(long, global = true, env = "SCRIPTKIT_ANCHOR")]
    pub anchor: Option<PathBuf>,

    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append a timestamped message to the log and print it
    Log(log_cmd::LogArgs),

    /// Like `log`, highlighted in the warning colour
    Warn(log_cmd::LogArgs),

    /// Log a message, print "Quitting." and exit with code 1
    Die {
        /// Message parts, joined by single spaces
        #[arg(required = true)]
        parts: Vec<String>,
    },

    /// Run a command while holding an exclusive lock
    Lock {
        /// Lock name (defaults to the command's file name without extension)
        #[arg(long)]
        name: Option<String>,

        /// Exit with code 75 instead of waiting when the lock is held
        #[arg(long = "try")]
        try_only: bool,

        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Run a command inside a subdirectory of the anchor, creating it if needed
    Subdir {
        /// Subdirectory path relative to the anchor
        name: String,

        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Print the slug of a text
    Slug {
        text: String,

        /// Extra characters to keep
        #[arg(long, default_value = "")]
        allow: String,
    },

    /// Replace curly quotation marks with straight ones
    Unquote { text: String },

    /// Print the MIME type of a file
    Mime { path: PathBuf },

    /// Start a program in this environment and print its PID without waiting
    Spawn {
        program: String,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show the effective configuration
    Config,
}

/// Main entry point for the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let ctx = Context::discover(cli.anchor.as_deref())?;
    let format = cli
        .format
        .unwrap_or(ctx.config().global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose(&format!("Anchor: {}", ctx.anchor().path().display()));

    match cli.command {
        Commands::Log(args) => log_cmd::log(&ctx, &output, &args, Severity::Info)?,
        Commands::Warn(args) => log_cmd::log(&ctx, &output, &args, Severity::Warn)?,
        Commands::Die { parts } => log_cmd::die(&ctx, &output, &parts),

        Commands::Lock { name, try_only, command } => {
            return lock_cmd::lock(&ctx, &output, name, try_only, &command);
        }
        Commands::Subdir { name, command } => {
            return lock_cmd::subdir(&ctx, &output, &name, &command);
        }

        Commands::Slug { text, allow } => util_cmd::slug(&output, &text, &allow)?,
        Commands::Unquote { text } => util_cmd::unquote(&output, &text)?,
        Commands::Mime { path } => util_cmd::mime(&output, &path)?,
        Commands::Spawn { program, args } => util_cmd::spawn(&output, &program, &args)?,
        Commands::Config => util_cmd::config(&ctx, &output)?,
    }

    output.verbose("Command completed successfully");
    Ok(ExitCode::SUCCESS)
}
