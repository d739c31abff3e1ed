//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{LiveClock, LiveGoalsApi, TerminalToasts};
use crate::adapters::recording::{RecordingClock, RecordingGoalsApi};
use crate::adapters::replaying::{ReplayingClock, ReplayingGoalsApi};
use crate::cassette::config::CassetteConfig;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::ports::{Clock, GoalsApi, ToastSink};

/// Bundles the ports the goal workflow talks through.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying); toasts always go to the terminal unless injected.
pub struct ServiceContext {
    /// Remote goals API.
    pub api: Box<dyn GoalsApi>,
    /// Clock used for due-date validation.
    pub clock: Box<dyn Clock>,
    /// Where toasts are shown.
    pub toasts: Box<dyn ToastSink>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        api: Box<dyn GoalsApi>,
        clock: Box<dyn Clock>,
        toasts: Box<dyn ToastSink>,
    ) -> Self {
        Self { api, clock, toasts }
    }

    /// Creates a live context talking to the configured API.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self::new(
            Box::new(LiveGoalsApi::from_config(config)),
            Box::new(LiveClock),
            Box::new(TerminalToasts),
        )
    }

    /// Creates a live context whose API and clock interactions are recorded
    /// into `session`.
    ///
    /// The context must be dropped before [`RecordingSession::finish`].
    #[must_use]
    pub fn recording(config: &Config, session: &RecordingSession) -> Self {
        use std::sync::Arc;

        Self::new(
            Box::new(RecordingGoalsApi::new(
                Box::new(LiveGoalsApi::from_config(config)),
                Arc::clone(&session.api),
            )),
            Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            Box::new(TerminalToasts),
        )
    }

    /// Creates a replaying context from a single cassette holding every port.
    ///
    /// If the cassette has no clock readings, the clock is pinned to the
    /// cassette's recording time so due-date checks stay deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        use std::sync::{Arc, Mutex};

        let cassette = CassetteConfig::read_cassette(path)?;
        let has_clock = cassette.interactions.iter().any(|i| i.port == "clock");

        // Each port gets its own replayer so per-port cursors are independent.
        let api = ReplayingGoalsApi::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))));
        let clock = if has_clock {
            ReplayingClock::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
        } else {
            ReplayingClock::fixed(cassette.recorded_at)
        };

        Ok(Self::new(Box::new(api), Box::new(clock), Box::new(TerminalToasts)))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Without an API cassette every API call fails; without a clock cassette
    /// the system clock is used.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        let api: Box<dyn GoalsApi> = match replayers.api {
            Some(r) => Box::new(ReplayingGoalsApi::new(r)),
            None => Box::new(ReplayingGoalsApi::unconfigured()),
        };
        let clock: Box<dyn Clock> = match replayers.clock {
            Some(r) => Box::new(ReplayingClock::new(r)),
            None => Box::new(LiveClock),
        };

        Ok(Self::new(api, clock, Box::new(TerminalToasts)))
    }
}
