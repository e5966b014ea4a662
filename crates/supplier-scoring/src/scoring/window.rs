use chrono::{DateTime, Months, Utc};

/// Reference instant and lookback that bound every dimension calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWindow {
    now: DateTime<Utc>,
    lookback_months: u32,
}

impl ScoringWindow {
    pub fn new(now: DateTime<Utc>, lookback_months: u32) -> Self {
        Self {
            now,
            lookback_months,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn lookback_months(&self) -> u32 {
        self.lookback_months
    }

    /// Start of the window (inclusive).
    pub fn since(&self) -> DateTime<Utc> {
        self.now
            .checked_sub_months(Months::new(self.lookback_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Both bounds are inclusive; facts dated after `now` are outside.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since() <= at && at <= self.now
    }
}

/// Source of "now" for calculations and synthesized snapshots.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn six_month_window_clamps_to_month_end() {
        let now = Utc.with_ymd_and_hms(2025, 8, 31, 12, 0, 0).unwrap();
        let window = ScoringWindow::new(now, 6);
        assert_eq!(
            window.since(),
            Utc.with_ymd_and_hms(2025, 2, 28, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn window_start_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let window = ScoringWindow::new(now, 6);
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn window_ends_at_reference_instant() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let window = ScoringWindow::new(now, 6);
        assert!(window.contains(now));
        assert!(!window.contains(now + chrono::Duration::seconds(1)));
        assert!(!window.contains(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()));
    }
}
