//! Replaying adapter for the `GoalsApi` port.

use super::{next_output, replay_result};
use crate::cassette::config::SharedReplayer;
use crate::ports::{ApiFuture, CreateGoalRequest, GenerateTasksRequest, GoalsApi};

/// Serves recorded API responses from a cassette.
pub struct ReplayingGoalsApi {
    replayer: Option<SharedReplayer>,
}

impl ReplayingGoalsApi {
    /// Create a replaying client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying client with no cassette; every call fails.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn replay(&self, method: &str) -> ApiFuture<'_> {
        let output = next_output(self.replayer.as_ref(), "api", method);
        Box::pin(async move {
            match output {
                Ok(output) => replay_result(output),
                Err(message) => Err(message.into()),
            }
        })
    }
}

impl GoalsApi for ReplayingGoalsApi {
    fn generate_tasks(&self, _request: &GenerateTasksRequest) -> ApiFuture<'_> {
        self.replay("generate_tasks")
    }

    fn create_goal(&self, _request: &CreateGoalRequest) -> ApiFuture<'_> {
        self.replay("create_goal")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    fn request() -> GenerateTasksRequest {
        GenerateTasksRequest {
            user_id: "p".into(),
            title: "t".into(),
            description: "d".into(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn serves_recorded_responses_then_runs_dry() {
        let mut cassette = Cassette::new("api", Utc::now());
        cassette.interactions.push(Interaction {
            seq: 0,
            port: "api".into(),
            method: "generate_tasks".into(),
            input: json!({}),
            output: json!({"Ok": {"tasks": [{"title": "Tune"}]}}),
        });
        let api = ReplayingGoalsApi::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));

        let response = api.generate_tasks(&request()).await.unwrap();
        assert_eq!(response["tasks"][0]["title"], "Tune");

        let err = api.generate_tasks(&request()).await.unwrap_err();
        assert!(err.to_string().contains("cassette exhausted"));
    }

    #[tokio::test]
    async fn unconfigured_client_fails_every_call() {
        let api = ReplayingGoalsApi::unconfigured();
        assert!(api.generate_tasks(&request()).await.is_err());
    }
}
