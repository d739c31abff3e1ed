//! Goal and task data model.
//!
//! Tasks only ever enter the client through [`decode`]; nothing constructs
//! them from user input. A goal's reward total is always recomputed from its
//! tasks.

pub mod decode;
pub mod validate;

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use decode::{decode_created_goal, decode_generated_tasks, DecodeError};
pub use validate::{DraftError, GoalDraft, ValidDraft, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

/// Stars and coins earned by completing a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPair {
    /// Stars awarded.
    pub stars: u64,
    /// Coins awarded.
    pub coins: u64,
}

impl RewardPair {
    /// Creates a reward pair.
    #[must_use]
    pub const fn new(stars: u64, coins: u64) -> Self {
        Self { stars, coins }
    }

    /// Elementwise sum of the rewards of `tasks`.
    #[must_use]
    pub fn total(tasks: &[Task]) -> Self {
        tasks.iter().map(|task| task.rewards).sum()
    }
}

impl Add for RewardPair {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            stars: self.stars.saturating_add(rhs.stars),
            coins: self.coins.saturating_add(rhs.coins),
        }
    }
}

impl AddAssign for RewardPair {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for RewardPair {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// A single generated task belonging to a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier, absent until the server provides one.
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short task title.
    pub title: String,
    /// What the child has to do.
    pub description: String,
    /// Reward for completing the task.
    pub rewards: RewardPair,
}

/// A persisted goal as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Server-assigned identifier.
    pub id: String,
    /// Goal title.
    pub title: String,
    /// Goal description.
    pub description: String,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Ordered tasks making up the goal.
    pub tasks: Vec<Task>,
    /// Aggregate reward, always the sum over `tasks`.
    pub rewards: RewardPair,
}

impl Goal {
    /// Builds a goal whose reward total is derived from `tasks`.
    #[must_use]
    pub fn new(
        id: String,
        title: String,
        description: String,
        due_date: Option<NaiveDate>,
        tasks: Vec<Task>,
    ) -> Self {
        let rewards = RewardPair::total(&tasks);
        Self { id, title, description, due_date, tasks, rewards }
    }
}

#[cfg(test)]
pub(crate) fn task(title: &str, stars: u64, coins: u64) -> Task {
    Task {
        id: None,
        title: title.into(),
        description: format!("{title} description"),
        rewards: RewardPair::new(stars, coins),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_elementwise_sum() {
        let tasks = vec![task("a", 5, 10), task("b", 5, 10), task("c", 10, 20)];
        assert_eq!(RewardPair::total(&tasks), RewardPair::new(20, 40));
    }

    #[test]
    fn total_of_no_tasks_is_zero() {
        assert_eq!(RewardPair::total(&[]), RewardPair::default());
    }

    #[test]
    fn goal_new_recomputes_rewards() {
        let goal = Goal::new(
            "g1".into(),
            "Learn guitar".into(),
            "Practice".into(),
            None,
            vec![task("a", 1, 2), task("b", 3, 4)],
        );
        assert_eq!(goal.rewards, RewardPair::new(4, 6));
    }

    #[test]
    fn task_accepts_underscore_id() {
        let task: Task = serde_json::from_str(
            r#"{"_id":"t1","title":"Tune","description":"Tune strings","rewards":{"stars":1,"coins":2}}"#,
        )
        .unwrap();
        assert_eq!(task.id.as_deref(), Some("t1"));
    }

    #[test]
    fn goal_serializes_camel_case_due_date() {
        let goal = Goal::new(
            "g1".into(),
            "t".into(),
            "d".into(),
            NaiveDate::from_ymd_opt(2026, 11, 1),
            vec![task("a", 1, 1)],
        );
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["dueDate"], "2026-11-01");
        assert!(json["tasks"][0].get("id").is_none());
    }
}
