//! Replaying adapter for the `Clock` port.

use std::sync::PoisonError;

use chrono::{DateTime, Utc};

use crate::cassette::config::SharedReplayer;
use crate::ports::clock::Clock;

/// Replays recorded clock readings, or a fixed instant.
pub struct ReplayingClock {
    source: Source,
}

enum Source {
    Cassette(SharedReplayer),
    Fixed(DateTime<Utc>),
}

impl ReplayingClock {
    /// Serves readings recorded in the cassette, in order.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { source: Source::Cassette(replayer) }
    }

    /// Always returns `at`. Used when a cassette has no clock readings.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self { source: Source::Fixed(at) }
    }
}

impl Clock for ReplayingClock {
    /// # Panics
    ///
    /// Panics if the cassette has no (more) clock readings or a reading is not
    /// a timestamp; the port has no error channel.
    fn now(&self) -> DateTime<Utc> {
        match &self.source {
            Source::Fixed(at) => *at,
            Source::Cassette(replayer) => {
                let output = {
                    let mut replayer = replayer.lock().unwrap_or_else(PoisonError::into_inner);
                    match replayer.next_interaction("clock", "now") {
                        Ok(interaction) => interaction.output.clone(),
                        Err(e) => panic!("clock::now: {e}"),
                    }
                };
                serde_json::from_value(output).unwrap_or_else(|e| {
                    panic!("clock::now: recorded value is not a timestamp: {e}")
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::cassette::replayer::CassetteReplayer;

    fn replayer(readings: &[&str]) -> SharedReplayer {
        let mut cassette = Cassette::new("clock", Utc::now());
        cassette.interactions = readings
            .iter()
            .zip(0..)
            .map(|(ts, seq)| Interaction {
                seq,
                port: "clock".into(),
                method: "now".into(),
                input: json!({}),
                output: json!(ts),
            })
            .collect();
        Arc::new(Mutex::new(CassetteReplayer::new(&cassette)))
    }

    #[test]
    fn serves_recorded_times_in_order() {
        let clock =
            ReplayingClock::new(replayer(&["2026-10-19T09:00:00Z", "2026-10-19T09:01:00Z"]));
        let t1 = clock.now();
        let t2 = clock.now();
        assert_eq!(t1.to_rfc3339(), "2026-10-19T09:00:00+00:00");
        assert!(t2 > t1);
    }

    #[test]
    fn fixed_clock_pins_today() {
        let clock = ReplayingClock::fixed(Utc.with_ymd_and_hms(2026, 10, 19, 23, 59, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    #[should_panic(expected = "cassette exhausted")]
    fn exhausted_cassette_panics() {
        let clock = ReplayingClock::new(replayer(&["2026-10-19T09:00:00Z"]));
        let _ = clock.now();
        let _ = clock.now();
    }
}
