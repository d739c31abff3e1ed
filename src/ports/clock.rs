//! Clock port for obtaining the current time.

use chrono::{DateTime, NaiveDate, Utc};

/// Provides the current time.
///
/// Due-date validation compares against [`Clock::today`], so tests and
/// cassette playback can pin "today" to a fixed date.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
