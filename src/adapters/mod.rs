//! Adapters implementing the port traits.
//!
//! `live` talks to the real world, `recording` wraps live adapters and writes
//! cassettes, `replaying` serves cassettes back.

pub mod live;
pub mod recording;
pub mod replaying;
