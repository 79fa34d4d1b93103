use chrono::{DateTime, Duration, TimeZone, Utc};

/// Controllable time for task timestamps.
///
/// The runner passes `now()` to every mutation so `createdAt`/`updatedAt`
/// values are predictable.
#[derive(Clone, Debug)]
pub struct MockClock {
    current: DateTime<Utc>,
}

impl MockClock {
    /// Create a clock starting at a fixed instant
    pub fn new() -> Self {
        Self::starting_at(Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap())
    }

    /// Create a clock starting at `start`
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { current: start }
    }

    /// Get current time
    pub fn now(&self) -> DateTime<Utc> {
        self.current
    }

    /// Advance time by hours
    pub fn advance_hours(&mut self, hours: i64) {
        self.current += Duration::hours(hours);
    }

    /// Advance time by days
    pub fn advance_days(&mut self, days: i64) {
        self.current += Duration::days(days);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}
