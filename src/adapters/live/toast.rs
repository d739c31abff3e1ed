//! Toasts rendered as lines on stderr.

use crate::ports::toast::{Toast, ToastLevel, ToastSink};

/// Prints toasts to stderr so they never mix with command output.
pub struct TerminalToasts;

impl ToastSink for TerminalToasts {
    fn show(&self, toast: &Toast) {
        let marker = match toast.level {
            ToastLevel::Success => "ok",
            ToastLevel::Error => "error",
        };
        eprintln!("[{marker}] {}", toast.message);
    }
}
