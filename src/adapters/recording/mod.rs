//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod goals_api;

pub use clock::RecordingClock;
pub use goals_api::RecordingGoalsApi;

use std::sync::PoisonError;

use serde::Serialize;
use serde_json::{json, Value};

use crate::cassette::session::SharedRecorder;

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "unserializable": e.to_string() }))
}

/// Record an interaction with a plain (non-Result) return value.
///
/// Mirror of `replaying::next_output`.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, to_json(input), to_json(output));
}

/// Record a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Mirror of `replaying::replay_result`:
/// - `Ok(v)` is stored as `{"Ok": v}`
/// - `Err(e)` is stored as `{"Err": e.to_string()}`
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => json!({ "Ok": to_json(v) }),
        Err(e) => json!({ "Err": e.to_string() }),
    };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, to_json(input), output);
}
