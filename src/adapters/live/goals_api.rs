//! Live adapter for the `GoalsApi` port over HTTP.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::ports::goals_api::{ApiFuture, CreateGoalRequest, GenerateTasksRequest, GoalsApi};

const GENERATE_TASKS_PATH: &str = "/goals/generate-tasks";
const CREATE_GOAL_PATH: &str = "/goals";

/// Goals API client backed by `reqwest`.
pub struct LiveGoalsApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LiveGoalsApi {
    /// Creates a client for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url, token }
    }

    /// Creates a client from the configured URL and token.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone(), config.api_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POSTs `body` as JSON and returns the decoded JSON response.
    fn post<B>(&self, path: &str, body: &B) -> ApiFuture<'_>
    where
        B: Serialize + Clone + Send + 'static,
    {
        let url = self.url(path);
        let body = body.clone();

        Box::pin(async move {
            let mut request = self.client.post(&url).json(&body);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Guardian Grove API request to {url} failed: {e}").into()
                },
            )?;

            let status = response.status();
            let response_text =
                response.text().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to read Guardian Grove API response: {e}").into()
                })?;

            if !status.is_success() {
                let msg = serde_json::from_str::<ApiError>(&response_text)
                    .map(|e| e.message)
                    .unwrap_or(response_text);
                return Err(format!("Guardian Grove API error ({}): {msg}", status.as_u16()).into());
            }

            serde_json::from_str::<Value>(&response_text).map_err(
                |e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Failed to parse Guardian Grove API response: {e}").into()
                },
            )
        })
    }
}

/// Error body returned by the API on failure.
#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GoalsApi for LiveGoalsApi {
    fn generate_tasks(&self, request: &GenerateTasksRequest) -> ApiFuture<'_> {
        tracing::debug!(url = %self.url(GENERATE_TASKS_PATH), "requesting task generation");
        self.post(GENERATE_TASKS_PATH, request)
    }

    fn create_goal(&self, request: &CreateGoalRequest) -> ApiFuture<'_> {
        tracing::debug!(
            url = %self.url(CREATE_GOAL_PATH),
            tasks = request.tasks.len(),
            "creating goal"
        );
        self.post(CREATE_GOAL_PATH, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_without_double_slash() {
        let api = LiveGoalsApi::new("https://grove.example/api/", None);
        assert_eq!(api.url(GENERATE_TASKS_PATH), "https://grove.example/api/goals/generate-tasks");
        assert_eq!(api.url(CREATE_GOAL_PATH), "https://grove.example/api/goals");
    }

    #[test]
    fn from_config_uses_url_and_token() {
        let config = Config { api_token: Some("t".into()), ..Config::default() };
        let api = LiveGoalsApi::from_config(&config);
        assert_eq!(api.base_url, crate::config::DEFAULT_API_URL);
        assert_eq!(api.token.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let api = LiveGoalsApi::new("http://127.0.0.1:9", None);
        let request = GenerateTasksRequest {
            user_id: "p".into(),
            title: "t".into(),
            description: "d".into(),
            due_date: None,
        };
        let err = api.generate_tasks(&request).await.unwrap_err();
        assert!(err.to_string().contains("request to http://127.0.0.1:9"));
    }
}
