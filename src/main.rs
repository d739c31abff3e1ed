//! Binary entrypoint for the `grove` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    // Recording and replay are selected in commands::dispatch via GROVE_RECORD / GROVE_REPLAY.
    match guardian_grove::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, filtered by `GROVE_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("GROVE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
