//! Recording adapter for the `Clock` port.

use chrono::{DateTime, Utc};
use serde_json::json;

use super::record_interaction;
use crate::cassette::session::SharedRecorder;
use crate::ports::Clock;

/// Records every time reading while delegating to an inner clock.
pub struct RecordingClock {
    inner: Box<dyn Clock>,
    recorder: SharedRecorder,
}

impl RecordingClock {
    /// Creates a recording clock wrapping `inner`.
    pub fn new(inner: Box<dyn Clock>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl Clock for RecordingClock {
    fn now(&self) -> DateTime<Utc> {
        let now = self.inner.now();
        record_interaction(&self.recorder, "clock", "now", &json!({}), &now);
        now
    }
}
