//! Recording adapter for the `GoalsApi` port.

use super::record_result;
use crate::cassette::session::SharedRecorder;
use crate::ports::{ApiFuture, CreateGoalRequest, GenerateTasksRequest, GoalsApi};

/// Records API calls and their outcomes while delegating to an inner client.
pub struct RecordingGoalsApi {
    inner: Box<dyn GoalsApi>,
    recorder: SharedRecorder,
}

impl RecordingGoalsApi {
    /// Creates a recording client wrapping `inner`.
    pub fn new(inner: Box<dyn GoalsApi>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl GoalsApi for RecordingGoalsApi {
    fn generate_tasks(&self, request: &GenerateTasksRequest) -> ApiFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate_tasks(&request).await;
            record_result(&self.recorder, "api", "generate_tasks", &request, &result);
            result
        })
    }

    fn create_goal(&self, request: &CreateGoalRequest) -> ApiFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.create_goal(&request).await;
            record_result(&self.recorder, "api", "create_goal", &request, &result);
            result
        })
    }
}
