//! Local validation of the user's goal draft.

use chrono::NaiveDate;
use thiserror::Error;

/// Maximum goal title length, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum goal description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Reasons a draft cannot be sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Title or description is blank.
    #[error("Please fill in both the goal title and description.")]
    MissingFields,
    /// Title exceeds [`TITLE_MAX_CHARS`].
    #[error("Goal title must be at most {TITLE_MAX_CHARS} characters (got {0}).")]
    TitleTooLong(usize),
    /// Description exceeds [`DESCRIPTION_MAX_CHARS`].
    #[error("Goal description must be at most {DESCRIPTION_MAX_CHARS} characters (got {0}).")]
    DescriptionTooLong(usize),
    /// Due date lies before today.
    #[error("Due date {due} is in the past; pick {today} or later.")]
    DueDateInPast {
        /// The rejected due date.
        due: NaiveDate,
        /// The date it was compared against.
        today: NaiveDate,
    },
    /// Saving was attempted without any generated tasks.
    #[error("Generate tasks before saving the goal.")]
    NoTasks,
}

/// What the user typed into the goal dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalDraft {
    /// Goal title as typed.
    pub title: String,
    /// Goal description as typed.
    pub description: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

/// A draft that passed [`GoalDraft::validate`]; text fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: String,
    /// Due date, today or later.
    pub due_date: Option<NaiveDate>,
}

impl GoalDraft {
    /// Creates a draft from raw input.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self { title: title.into(), description: description.into(), due_date }
    }

    /// Checks the draft against the dialog's input rules.
    ///
    /// A due date equal to `today` is accepted.
    ///
    /// # Errors
    ///
    /// Returns the first [`DraftError`] found, checking blank fields first.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidDraft, DraftError> {
        let title = self.title.trim();
        let description = self.description.trim();

        if title.is_empty() || description.is_empty() {
            return Err(DraftError::MissingFields);
        }

        let title_len = title.chars().count();
        if title_len > TITLE_MAX_CHARS {
            return Err(DraftError::TitleTooLong(title_len));
        }

        let description_len = description.chars().count();
        if description_len > DESCRIPTION_MAX_CHARS {
            return Err(DraftError::DescriptionTooLong(description_len));
        }

        if let Some(due) = self.due_date {
            if due < today {
                return Err(DraftError::DueDateInPast { due, today });
            }
        }

        Ok(ValidDraft {
            title: title.to_string(),
            description: description.to_string(),
            due_date: self.due_date,
        })
    }
}
