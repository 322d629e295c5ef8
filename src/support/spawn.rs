//! Same-environment process spawning
//!
//! Children inherit the caller's environment, working directory and
//! standard streams. Nothing here waits for them; the caller owns their
//! lifecycle.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Child, Command};

/// Starts `program` with `args` and returns its PID immediately
pub fn spawn<I, S>(program: impl AsRef<Path>, args: I) -> io::Result<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Ok(spawn_child(program, args)?.id())
}

/// Re-runs the current executable with `args`
pub fn spawn_self<I, S>(args: I) -> io::Result<u32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    spawn(std::env::current_exe()?, args)
}

/// Like [`spawn`], but hands back the child for callers that do want to wait
pub fn spawn_child<I, S>(program: impl AsRef<Path>, args: I) -> io::Result<Child>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program.as_ref()).args(args).spawn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn child_runs_with_forwarded_arguments() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");

        let mut child = spawn_child(
            "sh",
            ["-c", "printf '%s' \"$1\" > \"$2\"", "sh", "forwarded", marker.to_str().unwrap()],
        )
        .unwrap();
        assert!(child.wait().unwrap().success());

        assert_eq!(std::fs::read_to_string(&marker).unwrap(), "forwarded");
    }

    #[cfg(unix)]
    #[test]
    fn child_inherits_environment() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("env");
        std::env::set_var("SCRIPTKIT_SPAWN_TEST", "inherited");

        let mut child = spawn_child(
            "sh",
            ["-c", "printf '%s' \"$SCRIPTKIT_SPAWN_TEST\" > \"$1\"", "sh", marker.to_str().unwrap()],
        )
        .unwrap();
        assert!(child.wait().unwrap().success());

        assert_eq!(std::fs::read_to_string(&marker).unwrap(), "inherited");
    }

    #[cfg(unix)]
    #[test]
    fn spawn_returns_without_waiting() {
        let started = std::time::Instant::now();
        let pid = spawn("sleep", ["2"]).unwrap();

        assert!(pid > 0);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn spawn_self_starts_current_executable() {
        let pid = spawn_self(["--list", "--format", "terse"]).unwrap();
        assert_ne!(pid, std::process::id());
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = spawn("/definitely/not/a/program", Vec::<&str>::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
