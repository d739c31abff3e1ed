//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the goal workflow and the world
//! around it (time, the remote API, the toast area of the UI).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod goals_api;
pub mod toast;

pub use clock::Clock;
pub use goals_api::{ApiFuture, CreateGoalRequest, GenerateTasksRequest, GoalsApi};
pub use toast::{Toast, ToastLevel, ToastSink};
