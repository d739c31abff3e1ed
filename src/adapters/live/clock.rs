//! Live clock using the system clock.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Live clock that returns the real current time.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_current_time() {
        let clock = LiveClock;
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(now >= before);
        assert!(now <= after);
    }

    #[test]
    fn today_matches_now() {
        let clock = LiveClock;
        let today = clock.today();
        let date = Utc::now().date_naive();
        // Allow for a midnight rollover between the two reads.
        assert!(today == date || today.succ_opt() == Some(date));
    }
}
