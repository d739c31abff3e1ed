//! Record-replay round-trip integration test.
//!
//! Drives a full goal creation through recording adapters, then replays the
//! written session and checks the workflow produces the same goal without
//! touching the fake API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use guardian_grove::adapters::recording::{RecordingClock, RecordingGoalsApi};
use guardian_grove::cassette::config::CassetteConfig;
use guardian_grove::cassette::session::RecordingSession;
use guardian_grove::context::ServiceContext;
use guardian_grove::goal::{Goal, GoalDraft, RewardPair};
use guardian_grove::ports::{
    ApiFuture, Clock, CreateGoalRequest, GenerateTasksRequest, GoalsApi, Toast, ToastSink,
};
use guardian_grove::workflow::{GoalWorkflow, WorkflowOptions};

struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap()
    }
}

struct QuietToasts;

impl ToastSink for QuietToasts {
    fn show(&self, _toast: &Toast) {}
}

/// Stands in for the Guardian Grove API; counts how often it is reached.
struct FakeGrove {
    calls: Arc<AtomicUsize>,
}

impl GoalsApi for FakeGrove {
    fn generate_tasks(&self, request: &GenerateTasksRequest) -> ApiFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let title = request.title.clone();
        Box::pin(async move {
            Ok(json!({"tasks": [
                {"title": format!("{title}: warm up"), "description": "Scales",
                 "rewards": {"stars": 5, "coins": 10}},
                {"title": format!("{title}: practice"), "description": "Chords",
                 "rewards": {"stars": 10, "coins": 20}}
            ]}))
        })
    }

    fn create_goal(&self, request: &CreateGoalRequest) -> ApiFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = json!({"goal": {
            "_id": "goal-77",
            "title": request.title,
            "description": request.description,
            "dueDate": request.due_date,
            "tasks": request.tasks,
        }});
        Box::pin(async move { Ok(body) })
    }
}

async fn create_goal(ctx: &ServiceContext) -> Goal {
    let (workflow, completion) = GoalWorkflow::with_context(ctx, WorkflowOptions::default());
    let draft = GoalDraft::new(
        "Learn guitar",
        "Practice 30 min daily",
        chrono::NaiveDate::from_ymd_opt(2026, 10, 19),
    );

    assert_eq!(workflow.generate_tasks(&draft, Some("parent-1")).await.unwrap(), 2);
    let saved = workflow.save_goal(&draft, Some("parent-1")).await.unwrap();
    drop(workflow);

    let delivered = completion.wait().await.expect("goal should be delivered");
    assert_eq!(delivered, saved);
    saved
}

#[tokio::test]
async fn record_then_replay_produces_identical_goal() {
    let root = std::env::temp_dir().join("grove_record_replay_test");
    let _ = std::fs::remove_dir_all(&root);

    // --- Phase 1: Record against the fake API ---
    let calls = Arc::new(AtomicUsize::new(0));
    let session = RecordingSession::new(&root).unwrap();
    let ctx = ServiceContext::new(
        Box::new(RecordingGoalsApi::new(
            Box::new(FakeGrove { calls: Arc::clone(&calls) }),
            Arc::clone(&session.api),
        )),
        Box::new(RecordingClock::new(Box::new(FixedClock), Arc::clone(&session.clock))),
        Box::new(QuietToasts),
    );
    let recorded = create_goal(&ctx).await;
    drop(ctx);
    let dir = session.finish().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(recorded.id, "goal-77");
    assert_eq!(recorded.rewards, RewardPair::new(15, 30));

    // --- Phase 2: Replay the session twice; the fake API is never reached ---
    for _ in 0..2 {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::from_session_dir(&dir)).unwrap();
        assert_eq!(create_goal(&ctx).await, recorded);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn replayed_api_error_surfaces_as_workflow_error() {
    use guardian_grove::cassette::recorder::CassetteRecorder;
    use guardian_grove::workflow::{Phase, WorkflowError};

    let dir = std::env::temp_dir().join("grove_record_replay_error_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("offline.cassette.yaml");

    let mut recorder = CassetteRecorder::new(&path, "offline");
    recorder.record(
        "api",
        "generate_tasks",
        json!({}),
        json!({"Err": "Guardian Grove API request to http://localhost:5000/api failed"}),
    );
    recorder.finish().unwrap();

    let ctx = ServiceContext::replaying(&path).unwrap();
    let (workflow, _done) = GoalWorkflow::with_context(&ctx, WorkflowOptions::default());
    let draft = GoalDraft::new("Read more", "One chapter a day", None);

    let err = workflow.generate_tasks(&draft, Some("parent-1")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Transport { .. }));
    assert_eq!(
        workflow.phase(),
        Phase::Failed("Failed to generate tasks. Please try again.".into())
    );

    let _ = std::fs::remove_dir_all(&dir);
}
