//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod goals_api;

pub use clock::ReplayingClock;
pub use goals_api::ReplayingGoalsApi;

use std::error::Error;
use std::sync::PoisonError;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cassette::config::SharedReplayer;

/// Fetch the recorded output of the next `port::method` interaction.
///
/// # Errors
///
/// Returns an error if no cassette is loaded for the port or the cassette has
/// no (more) interactions for the pair.
pub(crate) fn next_output(
    replayer: Option<&SharedReplayer>,
    port: &str,
    method: &str,
) -> Result<Value, String> {
    let replayer = replayer
        .ok_or_else(|| format!("{port}::{method} called but no cassette is loaded for {port}"))?;
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).map(|i| i.output.clone()).map_err(|e| e.to_string())
}

/// Turn a recorded `{"Ok": v}` / `{"Err": msg}` output back into a `Result`.
///
/// Mirror of `recording::record_result`.
///
/// # Errors
///
/// Returns the recorded error, or an error describing a malformed output.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: Value,
) -> Result<T, Box<dyn Error + Send + Sync>> {
    let mut map = match output {
        Value::Object(map) => map,
        other => return Err(format!("malformed recorded result: {other}").into()),
    };
    if let Some(ok) = map.remove("Ok") {
        return serde_json::from_value(ok)
            .map_err(|e| format!("recorded Ok value has the wrong shape: {e}").into());
    }
    match map.remove("Err") {
        Some(Value::String(message)) => Err(message.into()),
        Some(other) => Err(other.to_string().into()),
        None => Err("malformed recorded result: expected an Ok or Err key".into()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn replays_ok_and_err() {
        let ok: Value = replay_result(json!({"Ok": {"tasks": []}})).unwrap();
        assert_eq!(ok, json!({"tasks": []}));

        let err = replay_result::<Value>(json!({"Err": "gateway timeout"})).unwrap_err();
        assert_eq!(err.to_string(), "gateway timeout");
    }

    #[test]
    fn malformed_outputs_are_errors() {
        assert!(replay_result::<Value>(json!("plain")).is_err());
        assert!(replay_result::<Value>(json!({"Maybe": 1})).is_err());
        assert!(replay_result::<u64>(json!({"Ok": "not a number"})).is_err());
    }

    #[test]
    fn unconfigured_port_is_an_error() {
        let err = next_output(None, "api", "create_goal").unwrap_err();
        assert!(err.contains("no cassette is loaded for api"));
    }
}
