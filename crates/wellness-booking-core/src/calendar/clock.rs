//! Source of "now" for availability checks and timestamps.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// Current time provider.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day as the client sees it.
    fn today(&self) -> NaiveDate;
}

/// Wall clock; "today" is the local calendar day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one day (for tests and previews).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.today
            .and_hms_opt(12, 0, 0)
            .map(|noon| Utc.from_utc_datetime(&noon))
            .unwrap_or_else(Utc::now)
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let day = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }
}
