//! Goal creation workflow.
//!
//! Drives the two remote calls behind the "new goal" dialog: generate
//! candidate tasks from a goal description, then persist the goal with the
//! accepted tasks. The workflow is a small linear state machine:
//!
//! ```text
//! Idle ──generate──▶ GeneratingTasks ──ok──▶ TasksReady ──save──▶ Saving ──ok──▶ Idle
//!                           │                    ▲  │                │
//!                           └──err──▶ Failed ────┘  └──generate      └──err──▶ TasksReady
//! ```
//!
//! All operations take `&self`. State lives behind a mutex that is never held
//! across an `.await`, so [`GoalWorkflow::close`] can run while a request is
//! outstanding. Every request captures the session epoch when it starts; a
//! response that comes back after the epoch moved on is dropped. A request
//! whose future is dropped before it settles releases the workflow and puts
//! back the phase it started from.

pub mod error;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::goal::{
    decode_created_goal, decode_generated_tasks, DraftError, Goal, GoalDraft, RewardPair, Task,
    ValidDraft,
};
use crate::ports::{
    ApiFuture, Clock, CreateGoalRequest, GenerateTasksRequest, GoalsApi, Toast, ToastSink,
};

pub use error::{Operation, WorkflowError};

/// Default upper bound on a single remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for a [`GoalWorkflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Upper bound on each remote call; expiry counts as a transport error.
    pub request_timeout: Duration,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self { request_timeout: DEFAULT_REQUEST_TIMEOUT }
    }
}

/// Where the workflow currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Waiting for the generation call.
    GeneratingTasks,
    /// Tasks are available for review.
    TasksReady,
    /// Waiting for the persistence call.
    Saving,
    /// Task generation failed with the given user-facing reason.
    Failed(String),
}

/// Snapshot of what the dialog shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    /// Title as last submitted.
    pub title: String,
    /// Description as last submitted.
    pub description: String,
    /// Due date as last submitted.
    pub due_date: Option<NaiveDate>,
    /// Tasks from the last successful generation.
    pub tasks: Vec<Task>,
    /// Current phase.
    pub phase: Phase,
    /// Message shown inline after the last failure.
    pub error_message: Option<String>,
}

impl WorkflowState {
    /// Aggregate reward of the current tasks.
    #[must_use]
    pub fn rewards(&self) -> RewardPair {
        RewardPair::total(&self.tasks)
    }

    fn record_draft(&mut self, draft: &GoalDraft) {
        self.title.clone_from(&draft.title);
        self.description.clone_from(&draft.description);
        self.due_date = draft.due_date;
    }
}

/// Receives the goal created by a [`GoalWorkflow`], at most once.
#[derive(Debug)]
pub struct GoalCompletion {
    receiver: oneshot::Receiver<Goal>,
}

impl GoalCompletion {
    /// Waits for the created goal.
    ///
    /// Resolves to `None` if the workflow is dropped without saving a goal.
    pub async fn wait(self) -> Option<Goal> {
        self.receiver.await.ok()
    }

    /// Returns the created goal if it has already been delivered.
    pub fn try_take(&mut self) -> Option<Goal> {
        self.receiver.try_recv().ok()
    }
}

struct Session {
    state: WorkflowState,
    epoch: u64,
    in_flight: Option<Operation>,
    completion: Option<oneshot::Sender<Goal>>,
}

impl Session {
    fn reset(&mut self) {
        self.state = WorkflowState::default();
        self.epoch += 1;
        self.in_flight = None;
    }
}

/// What a request needs once validation passed.
struct Prepared<'s> {
    epoch: u64,
    draft: ValidDraft,
    user_id: String,
    tasks: Vec<Task>,
    _in_flight: InFlight<'s>,
}

/// Marks a request as outstanding until it settles or its future is dropped.
///
/// A request that settles clears `in_flight` itself; if the future is dropped
/// first, this restores the phase the request started from.
struct InFlight<'s> {
    session: &'s Mutex<Session>,
    epoch: u64,
    operation: Operation,
    resume: Phase,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.epoch != self.epoch || session.in_flight != Some(self.operation) {
            return;
        }
        debug!(operation = %self.operation, "request abandoned before it settled");
        session.in_flight = None;
        session.state.phase = std::mem::take(&mut self.resume);
    }
}

/// The goal creation state machine.
pub struct GoalWorkflow<'a> {
    id: Uuid,
    api: &'a dyn GoalsApi,
    clock: &'a dyn Clock,
    toasts: &'a dyn ToastSink,
    options: WorkflowOptions,
    session: Mutex<Session>,
}

impl<'a> GoalWorkflow<'a> {
    /// Creates an idle workflow and the handle that will receive its goal.
    #[must_use]
    pub fn new(
        api: &'a dyn GoalsApi,
        clock: &'a dyn Clock,
        toasts: &'a dyn ToastSink,
        options: WorkflowOptions,
    ) -> (Self, GoalCompletion) {
        let (sender, receiver) = oneshot::channel();
        let workflow = Self {
            id: Uuid::new_v4(),
            api,
            clock,
            toasts,
            options,
            session: Mutex::new(Session {
                state: WorkflowState::default(),
                epoch: 0,
                in_flight: None,
                completion: Some(sender),
            }),
        };
        (workflow, GoalCompletion { receiver })
    }

    /// Creates a workflow wired to the ports of `ctx`.
    #[must_use]
    pub fn with_context(
        ctx: &'a ServiceContext,
        options: WorkflowOptions,
    ) -> (Self, GoalCompletion) {
        Self::new(&*ctx.api, &*ctx.clock, &*ctx.toasts, options)
    }

    /// Identifier used to correlate this workflow's log records.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> WorkflowState {
        self.lock().state.clone()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock().state.phase.clone()
    }

    /// Generates tasks for `draft` on behalf of `requester`.
    ///
    /// On success the previous tasks are replaced wholesale and the number of
    /// accepted tasks is returned.
    ///
    /// # Errors
    ///
    /// Validation, auth, transport and format failures move the workflow to
    /// [`Phase::Failed`] without touching the task list. [`WorkflowError::Busy`]
    /// and [`WorkflowError::Discarded`] leave state alone.
    pub async fn generate_tasks(
        &self,
        draft: &GoalDraft,
        requester: Option<&str>,
    ) -> Result<usize, WorkflowError> {
        let operation = Operation::GenerateTasks;
        let prepared = self.begin(operation, draft, requester)?;

        let request = GenerateTasksRequest {
            user_id: prepared.user_id,
            title: prepared.draft.title,
            description: prepared.draft.description,
            due_date: prepared.draft.due_date,
        };
        let outcome = self.call(operation, self.api.generate_tasks(&request)).await.and_then(
            |response| {
                decode_generated_tasks(&response)
                    .map_err(|source| WorkflowError::Format { operation, source })
            },
        );

        let mut session = self.lock();
        self.ensure_current(&session, prepared.epoch, operation)?;
        session.in_flight = None;

        match outcome {
            Ok(tasks) => {
                let count = tasks.len();
                session.state.tasks = tasks;
                session.state.phase = Phase::TasksReady;
                session.state.error_message = None;
                drop(session);

                info!(workflow = %self.id, count, "generated tasks");
                let noun = if count == 1 { "task" } else { "tasks" };
                self.toasts.show(&Toast::success(format!("Generated {count} {noun}.")));
                Ok(count)
            }
            Err(err) => {
                let message = err.to_string();
                session.state.phase = Phase::Failed(message.clone());
                session.state.error_message = Some(message);
                drop(session);

                self.report(&err);
                Err(err)
            }
        }
    }

    /// Persists the goal with the tasks from the last successful generation.
    ///
    /// On success the goal is delivered to the [`GoalCompletion`] handle,
    /// the workflow resets to [`Phase::Idle`], and the goal is returned.
    ///
    /// # Errors
    ///
    /// Local failures (no tasks, invalid draft, no requester) send nothing
    /// and keep the phase. Remote failures return to [`Phase::TasksReady`]
    /// with the tasks kept for a manual retry.
    pub async fn save_goal(
        &self,
        draft: &GoalDraft,
        requester: Option<&str>,
    ) -> Result<Goal, WorkflowError> {
        let operation = Operation::SaveGoal;
        let prepared = self.begin(operation, draft, requester)?;

        let request = CreateGoalRequest {
            user_id: prepared.user_id,
            title: prepared.draft.title.clone(),
            description: prepared.draft.description.clone(),
            tasks: prepared.tasks,
            due_date: prepared.draft.due_date,
        };
        let outcome = self.call(operation, self.api.create_goal(&request)).await.and_then(
            |response| {
                decode_created_goal(&response, &prepared.draft, &request.tasks)
                    .map_err(|source| WorkflowError::Format { operation, source })
            },
        );

        let mut session = self.lock();
        self.ensure_current(&session, prepared.epoch, operation)?;
        session.in_flight = None;

        match outcome {
            Ok(goal) => {
                let completion = session.completion.take();
                session.reset();
                drop(session);

                info!(
                    workflow = %self.id,
                    goal = %goal.id,
                    tasks = goal.tasks.len(),
                    "created goal"
                );
                if let Some(sender) = completion {
                    if sender.send(goal.clone()).is_err() {
                        debug!(workflow = %self.id, "completion receiver already dropped");
                    }
                }
                self.toasts.show(&Toast::success(format!("Goal \"{}\" created.", goal.title)));
                Ok(goal)
            }
            Err(err) => {
                session.state.phase = Phase::TasksReady;
                session.state.error_message = Some(err.to_string());
                drop(session);

                self.report(&err);
                Err(err)
            }
        }
    }

    /// Closes the dialog, discarding everything in progress.
    ///
    /// Outstanding requests are not cancelled; their responses are dropped
    /// when they arrive.
    pub fn close(&self) {
        let mut session = self.lock();
        if let Some(operation) = session.in_flight {
            debug!(workflow = %self.id, %operation, "closing with a request outstanding");
        }
        session.reset();
    }

    /// Validates input and marks `operation` as in flight.
    fn begin(
        &self,
        operation: Operation,
        draft: &GoalDraft,
        requester: Option<&str>,
    ) -> Result<Prepared<'_>, WorkflowError> {
        let mut session = self.lock();
        if let Some(current) = session.in_flight {
            debug!(workflow = %self.id, %operation, %current, "rejected overlapping request");
            return Err(WorkflowError::Busy(current));
        }

        session.state.record_draft(draft);
        let tasks = match operation {
            Operation::GenerateTasks => Vec::new(),
            Operation::SaveGoal => session.state.tasks.clone(),
        };

        let checked = self.check_input(operation, draft, requester, &tasks);
        let (valid, user_id) = match checked {
            Ok(ok) => ok,
            Err(err) => {
                let message = err.to_string();
                if operation == Operation::GenerateTasks {
                    session.state.phase = Phase::Failed(message.clone());
                }
                session.state.error_message = Some(message);
                drop(session);

                self.report(&err);
                return Err(err);
            }
        };

        let resume = std::mem::replace(
            &mut session.state.phase,
            match operation {
                Operation::GenerateTasks => Phase::GeneratingTasks,
                Operation::SaveGoal => Phase::Saving,
            },
        );
        session.state.error_message = None;
        session.in_flight = Some(operation);
        let epoch = session.epoch;
        debug!(workflow = %self.id, %operation, epoch, "request started");

        Ok(Prepared {
            epoch,
            draft: valid,
            user_id,
            tasks,
            _in_flight: InFlight { session: &self.session, epoch, operation, resume },
        })
    }

    fn check_input(
        &self,
        operation: Operation,
        draft: &GoalDraft,
        requester: Option<&str>,
        tasks: &[Task],
    ) -> Result<(ValidDraft, String), WorkflowError> {
        if operation == Operation::SaveGoal && tasks.is_empty() {
            return Err(DraftError::NoTasks.into());
        }
        let valid = draft.validate(self.clock.today())?;
        let user_id = requester
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(WorkflowError::Auth)?
            .to_string();
        Ok((valid, user_id))
    }

    async fn call(
        &self,
        operation: Operation,
        request: ApiFuture<'_>,
    ) -> Result<Value, WorkflowError> {
        let timeout = self.options.request_timeout;
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(WorkflowError::Transport { operation, detail: err.to_string() }),
            Err(_) => Err(WorkflowError::Transport {
                operation,
                detail: format!("no response within {}s", timeout.as_secs_f32()),
            }),
        }
    }

    fn ensure_current(
        &self,
        session: &Session,
        epoch: u64,
        operation: Operation,
    ) -> Result<(), WorkflowError> {
        if session.epoch == epoch {
            return Ok(());
        }
        debug!(
            workflow = %self.id,
            %operation,
            epoch,
            current = session.epoch,
            "dropped stale response"
        );
        Err(WorkflowError::Discarded(operation))
    }

    fn report(&self, err: &WorkflowError) {
        match err {
            WorkflowError::Transport { operation, detail } => {
                warn!(workflow = %self.id, %operation, %detail, "request failed");
            }
            WorkflowError::Format { operation, source } => {
                warn!(workflow = %self.id, %operation, %source, "unexpected response shape");
            }
            _ => debug!(workflow = %self.id, error = %err, "input rejected"),
        }
        self.toasts.show(&Toast::error(err.to_string()));
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
