//! Command dispatch and handlers.

pub mod create;
pub mod generate;
pub mod notify;

use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::workflow::WorkflowOptions;

/// Dispatch a parsed command to its handler.
///
/// When `GROVE_RECORD` is set to a directory path, API and clock interactions
/// are recorded to per-port cassette files in a session directory under it.
/// When `GROVE_REPLAY` names a cassette file, or a directory written by a
/// recording session, the API is never contacted.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    if let Command::Notify { file, json } = command {
        return notify::run(file.as_deref(), *json);
    }

    let config = Config::from_env()?;
    let (ctx, session) = context_for(&config)?;

    let result = runtime()?.block_on(dispatch_with_context(command, &ctx, &config));

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    match command {
        Command::Generate(args) => generate::run(ctx, config, args).await,
        Command::Create { goal, yes } => create::run(ctx, config, goal, *yes).await,
        Command::Notify { file, json } => notify::run(file.as_deref(), *json),
    }
}

fn context_for(config: &Config) -> Result<(ServiceContext, Option<RecordingSession>), String> {
    if let Some(path) = &config.replay_cassette {
        let ctx = if path.is_dir() {
            ServiceContext::replaying_from(&CassetteConfig::from_session_dir(path))?
        } else {
            ServiceContext::replaying(path)?
        };
        return Ok((ctx, None));
    }
    if let Some(root) = &config.record_dir {
        let session = RecordingSession::new(root)?;
        tracing::info!(dir = %session.output_dir().display(), "recording session started");
        let ctx = ServiceContext::recording(config, &session);
        return Ok((ctx, Some(session)));
    }
    Ok((ServiceContext::live(config), None))
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}

/// Workflow settings derived from the configuration.
pub(crate) fn workflow_options(config: &Config) -> WorkflowOptions {
    WorkflowOptions { request_timeout: config.request_timeout }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn options_follow_configured_timeout() {
        let config = Config { request_timeout: Duration::from_secs(3), ..Config::default() };
        assert_eq!(workflow_options(&config).request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn live_context_without_record_or_replay() {
        let (_ctx, session) = context_for(&Config::default()).unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn missing_replay_cassette_is_an_error() {
        let config = Config {
            replay_cassette: Some("/nonexistent/grove.cassette.yaml".into()),
            ..Config::default()
        };
        assert!(context_for(&config).is_err());
    }
}
