//! Output formatting for CLI commands

use serde::Serialize;

pub use crate::storage::OutputFormat;

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a command result: the text as-is, or `{"key": text}` as JSON
    pub fn value(&self, key: &str, text: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", text),
            OutputFormat::Json => println!("{}", serde_json::json!({ key: text })),
        }
    }

    /// Prints an error message
    pub fn error(&self, message: &str) {
        match self.format {
            OutputFormat::Text => eprintln!("Error: {}", message),
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "success": false,
                        "error": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        let json = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };
        if let Ok(json) = json {
            println!("{}", json);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
