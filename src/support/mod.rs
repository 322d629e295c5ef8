//! # Collaborators
//!
//! Thin helpers scripts reach for next to the core primitives.
//!
//! - [`mime_type`] - MIME type of a file, by content first
//! - [`spawn`] - start a process in the caller's environment without waiting

mod mime;
mod spawn;

pub use mime::{mime_type, EMPTY, OCTET_STREAM, TEXT};
pub use spawn::{spawn, spawn_child, spawn_self};
