//! scriptkit - Locks, working-directory scopes and tee logging for scripts

use std::process::ExitCode;

fn main() -> ExitCode {
    match scriptkit::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
