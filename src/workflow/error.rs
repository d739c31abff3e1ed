//! Error taxonomy for the goal workflow.
//!
//! `Display` is the text shown to the user, both inline and as a toast.

use std::fmt;

use thiserror::Error;

use crate::goal::{DecodeError, DraftError};

/// The remote operation an error relates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Task generation.
    GenerateTasks,
    /// Goal persistence.
    SaveGoal,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenerateTasks => f.write_str("generate tasks"),
            Self::SaveGoal => f.write_str("create goal"),
        }
    }
}

/// Everything that can go wrong while driving a [`super::GoalWorkflow`].
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Local input is missing or invalid; no request was sent.
    #[error("{0}")]
    Validation(#[from] DraftError),
    /// No acting user; no request was sent.
    #[error("User not found. Please log in again.")]
    Auth,
    /// The request failed or timed out.
    #[error("Failed to {operation}. Please try again.")]
    Transport {
        /// Which call failed.
        operation: Operation,
        /// Underlying failure, for logs.
        detail: String,
    },
    /// The response did not have the expected shape.
    #[error("{}", format_message(.operation, .source))]
    Format {
        /// Which call returned the bad payload.
        operation: Operation,
        /// What was wrong with it.
        #[source]
        source: DecodeError,
    },
    /// Another request is still outstanding; this one was not sent.
    #[error("Please wait: a request to {0} is already in progress.")]
    Busy(Operation),
    /// The workflow was closed before the response arrived; the response was dropped.
    #[error("The goal dialog was closed before the request to {0} finished.")]
    Discarded(Operation),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn format_message(operation: &Operation, source: &DecodeError) -> String {
    match operation {
        Operation::GenerateTasks => "Invalid task format received. Please try again.".to_string(),
        Operation::SaveGoal => match source.server_message() {
            Some(message) => format!("Failed to create goal: {message}"),
            None => "Failed to create goal: the server did not return a goal.".to_string(),
        },
    }
}
