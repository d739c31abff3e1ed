//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client version stamped into cassettes recorded by this build.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (`"api"` or `"clock"`).
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Version of the client that recorded it.
    #[serde(default)]
    pub client_version: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Creates an empty cassette stamped with the current client version.
    pub fn new(name: impl Into<String>, recorded_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            recorded_at,
            client_version: CLIENT_VERSION.to_string(),
            interactions: Vec::new(),
        }
    }
}
