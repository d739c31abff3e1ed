//! Schema validation of API responses.
//!
//! The API is trusted for nothing beyond shape: each task is checked
//! individually and dropped if it is not structurally valid, and goal totals
//! are recomputed locally.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{Goal, RewardPair, Task, ValidDraft};

/// Why a response could not be turned into typed data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The generation response carried no `tasks` array.
    #[error("response has no task list{}", server_suffix(.server_message.as_deref()))]
    MissingTaskList {
        /// `message` field sent by the server, if any.
        server_message: Option<String>,
    },
    /// Every task in the response failed structural validation.
    #[error("response contained no well-formed tasks ({rejected} rejected)")]
    NoValidTasks {
        /// Number of entries dropped.
        rejected: usize,
    },
    /// The persistence response carried no `goal` object.
    #[error("response has no goal object{}", server_suffix(.server_message.as_deref()))]
    MissingGoal {
        /// `message` field sent by the server, if any.
        server_message: Option<String>,
    },
    /// The goal object has no usable identifier.
    #[error("goal object has no id")]
    MissingGoalId,
}

impl DecodeError {
    /// The server-provided message attached to the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::MissingTaskList { server_message } | Self::MissingGoal { server_message } => {
                server_message.as_deref()
            }
            Self::NoValidTasks { .. } | Self::MissingGoalId => None,
        }
    }
}

fn server_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

/// Decodes `{ "tasks": [...] }` into the structurally valid tasks.
///
/// # Errors
///
/// [`DecodeError::MissingTaskList`] if `tasks` is absent or not an array,
/// [`DecodeError::NoValidTasks`] if nothing survives filtering (including an
/// empty array).
pub fn decode_generated_tasks(response: &Value) -> Result<Vec<Task>, DecodeError> {
    let Some(entries) = response.get("tasks").and_then(Value::as_array) else {
        return Err(DecodeError::MissingTaskList { server_message: message_of(response) });
    };

    let tasks = filter_tasks(entries);
    if tasks.is_empty() {
        return Err(DecodeError::NoValidTasks { rejected: entries.len() });
    }
    Ok(tasks)
}

/// Decodes `{ "goal": {...} }` returned after persisting `draft` with `tasks`.
///
/// Fields the server leaves out fall back to what was submitted. The reward
/// total is always recomputed from the final task list.
///
/// # Errors
///
/// [`DecodeError::MissingGoal`] if there is no goal object,
/// [`DecodeError::MissingGoalId`] if it has no id.
pub fn decode_created_goal(
    response: &Value,
    draft: &ValidDraft,
    tasks: &[Task],
) -> Result<Goal, DecodeError> {
    let Some(goal) = response.get("goal").and_then(Value::as_object) else {
        return Err(DecodeError::MissingGoal { server_message: message_of(response) });
    };

    let id = id_of(goal).ok_or(DecodeError::MissingGoalId)?;

    let title = non_empty_str(goal.get("title")).unwrap_or(draft.title.as_str()).to_string();
    let description =
        non_empty_str(goal.get("description")).unwrap_or(draft.description.as_str()).to_string();
    let due_date =
        goal.get("dueDate").and_then(Value::as_str).and_then(parse_date).or(draft.due_date);

    let server_tasks =
        goal.get("tasks").and_then(Value::as_array).map(Vec::as_slice).map(filter_tasks);
    let tasks = match server_tasks {
        Some(decoded) if !decoded.is_empty() => decoded,
        _ => tasks.to_vec(),
    };

    Ok(Goal::new(id, title, description, due_date, tasks))
}

fn filter_tasks(entries: &[Value]) -> Vec<Task> {
    let tasks: Vec<Task> = entries.iter().filter_map(parse_task).collect();
    let dropped = entries.len() - tasks.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = tasks.len(), "dropped malformed tasks from response");
    }
    tasks
}

fn parse_task(value: &Value) -> Option<Task> {
    let object = value.as_object()?;
    let title = non_empty_str(object.get("title"))?;
    let description = non_empty_str(object.get("description"))?;

    let rewards = object.get("rewards")?.as_object()?;
    let stars = reward_amount(rewards.get("stars")?)?;
    let coins = reward_amount(rewards.get("coins")?)?;

    Some(Task {
        id: id_of(object),
        title: title.to_string(),
        description: description.to_string(),
        rewards: RewardPair::new(stars, coins),
    })
}

/// A non-negative whole number, whether encoded as `5` or `5.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn reward_amount(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn id_of(object: &Map<String, Value>) -> Option<String> {
    ["id", "_id"]
        .iter()
        .find_map(|key| non_empty_str(object.get(*key)))
        .map(ToString::to_string)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn message_of(response: &Value) -> Option<String> {
    non_empty_str(response.get("message")).map(ToString::to_string)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
