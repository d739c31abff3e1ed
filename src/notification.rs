//! Push notification payloads.
//!
//! The messaging service delivers `{ notification?: { title?, body?, icon? },
//! data?: any }`. Anything missing or blank falls back to product defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title shown when the payload has none.
pub const DEFAULT_TITLE: &str = "Guardian Grove";
/// Body shown when the payload has none.
pub const DEFAULT_BODY: &str = "You have a new notification.";
/// Icon shown when the payload has none.
pub const DEFAULT_ICON: &str = "/logo192.png";

/// Display fields of a push message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFields {
    /// Headline.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text.
    #[serde(default)]
    pub body: Option<String>,
    /// Icon URL.
    #[serde(default)]
    pub icon: Option<String>,
}

/// A push message as delivered by the messaging service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Display fields, if the sender provided any.
    #[serde(default)]
    pub notification: Option<NotificationFields>,
    /// Arbitrary application data, passed through untouched.
    #[serde(default)]
    pub data: Option<Value>,
}

impl PushPayload {
    /// Parses a JSON payload. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error string if `raw` is not a JSON object of the expected shape.
    pub fn parse(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Invalid push payload: {e}"))
    }
}

/// What the notification presenter shows for a payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushToast {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Icon URL.
    pub icon: String,
    /// Application data carried along for click handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PushToast {
    /// Builds the toast for `payload`, filling gaps with the product defaults.
    #[must_use]
    pub fn from_payload(payload: &PushPayload) -> Self {
        let fields = payload.notification.clone().unwrap_or_default();
        Self {
            title: or_default(fields.title, DEFAULT_TITLE),
            body: or_default(fields.body, DEFAULT_BODY),
            icon: or_default(fields.icon, DEFAULT_ICON),
            data: payload.data.clone(),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_string())
}
