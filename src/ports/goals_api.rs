//! Goals API port: the two remote calls the goal workflow makes.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::goal::Task;

/// Boxed future returned by [`GoalsApi`] methods, keeping the trait dyn-compatible.
///
/// Responses are handed back as raw JSON; shape checking belongs to
/// [`crate::goal::decode`].
pub type ApiFuture<'a> = Pin<
    Box<dyn Future<Output = Result<serde_json::Value, Box<dyn Error + Send + Sync>>> + Send + 'a>,
>;

/// Body of the task generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTasksRequest {
    /// Acting user.
    pub user_id: String,
    /// Goal title.
    pub title: String,
    /// Natural-language goal description.
    pub description: String,
    /// Optional due date, sent as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Body of the goal persistence call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    /// Acting user.
    pub user_id: String,
    /// Goal title.
    pub title: String,
    /// Goal description.
    pub description: String,
    /// Accepted tasks.
    pub tasks: Vec<Task>,
    /// Optional due date, sent as `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Remote Guardian Grove goals API.
pub trait GoalsApi: Send + Sync {
    /// Asks the server to generate candidate tasks for a goal.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn generate_tasks(&self, request: &GenerateTasksRequest) -> ApiFuture<'_>;

    /// Persists a goal with its accepted tasks.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    fn create_goal(&self, request: &CreateGoalRequest) -> ApiFuture<'_>;
}
