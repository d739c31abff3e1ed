//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// A replay request the cassette cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// Nothing was ever recorded for this port/method pair.
    #[error(
        "cassette has no interactions for {port}::{method}; recorded pairs: [{}]",
        .available.join(", ")
    )]
    NotRecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Port/method pairs present in the cassette.
        available: Vec<String>,
    },
    /// Every recorded interaction for the pair was already served.
    #[error("cassette exhausted: all {count} interactions for {port}::{method} were consumed")]
    Exhausted {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// How many had been recorded.
        count: usize,
    },
}

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Serves interactions from a loaded cassette in order, per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    cursors: HashMap<PortMethodKey, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let cursors = queues.keys().map(|k| (k.clone(), 0)).collect();
        Self { queues, cursors }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// [`ReplayError::NotRecorded`] if the pair never appears in the cassette,
    /// [`ReplayError::Exhausted`] once every recorded interaction was served.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<&Interaction, ReplayError> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            return Err(ReplayError::NotRecorded {
                port: port.to_string(),
                method: method.to_string(),
                available,
            });
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(ReplayError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
                count: queue.len(),
            });
        };
        *cursor += 1;
        Ok(interaction)
    }
}
