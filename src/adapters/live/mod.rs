//! Live adapters for real external interactions.

pub mod clock;
pub mod goals_api;
pub mod toast;

pub use clock::LiveClock;
pub use goals_api::LiveGoalsApi;
pub use toast::TerminalToasts;
