//! Toast port for transient user-facing notices.

use serde::{Deserialize, Serialize};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// An operation finished.
    Success,
    /// An operation failed; the same text is shown inline.
    Error,
}

/// A short-lived notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Text shown to the user.
    pub message: String,
}

impl Toast {
    /// A success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Success, message: message.into() }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: ToastLevel::Error, message: message.into() }
    }
}

/// Displays toasts.
pub trait ToastSink: Send + Sync {
    /// Shows `toast` to the user. Must not block.
    fn show(&self, toast: &Toast);
}
