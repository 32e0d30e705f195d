//! Calendar and time-slot derivation.
//!
//! Availability is a pure function of the practitioner's declared weekdays and
//! the current day. There are no per-date exceptions and no cross-user
//! booking state, so every declared slot is offered on every available day.

mod clock;

pub use clock::*;

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Practitioner, TimeSlot};

/// A displayed calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Create a cursor; `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Following month; December wraps to January of the next year.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Preceding month; January wraps to December of the previous year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First day of the month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Iterate every day of the month.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = *self;
        std::iter::successors(self.first_day(), |d| d.succ_opt())
            .take_while(move |d| month.contains(*d))
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_day() {
            Some(first) => write!(f, "{}", first.format("%B %Y")),
            None => write!(f, "{}-{:02}", self.year, self.month),
        }
    }
}

/// One cell of the availability grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Day of month (1-31)
    pub day: u32,
    pub is_available: bool,
}

/// Whether `practitioner` can be booked on `date`, given today's date.
pub fn is_date_available(practitioner: &Practitioner, date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && practitioner.is_available_on(date.weekday())
}

/// Lazy availability grid for every day in `month`.
pub fn available_dates_for_month<'a>(
    practitioner: &'a Practitioner,
    month: MonthCursor,
    today: NaiveDate,
) -> impl Iterator<Item = CalendarDay> + 'a {
    month.days().map(move |date| CalendarDay {
        date,
        day: date.day(),
        is_available: is_date_available(practitioner, date, today),
    })
}

/// Declared slots, unfiltered and in original order.
pub fn time_slots_for(practitioner: &Practitioner) -> &[TimeSlot] {
    &practitioner.time_slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mon_wed_fri() -> Practitioner {
        let mut p = Practitioner::new("p".into(), "P".into());
        p.available_weekdays = vec![Weekday::Mon, Weekday::Wed, Weekday::Fri];
        p.time_slots = vec![TimeSlot::new(9, 0).unwrap(), TimeSlot::new(8, 0).unwrap()];
        p
    }

    #[test]
    fn test_month_wraparound() {
        let december = MonthCursor::new(2029, 12).unwrap();
        assert_eq!(december.next(), MonthCursor::new(2030, 1).unwrap());

        let january = MonthCursor::new(2030, 1).unwrap();
        assert_eq!(january.previous(), december);
        assert_eq!(january.next().previous(), january);
    }

    #[test]
    fn test_invalid_month() {
        assert!(MonthCursor::new(2030, 0).is_none());
        assert!(MonthCursor::new(2030, 13).is_none());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(MonthCursor::new(2028, 2).unwrap().days().count(), 29);
        assert_eq!(MonthCursor::new(2030, 2).unwrap().days().count(), 28);
        assert_eq!(MonthCursor::new(2030, 12).unwrap().days().count(), 31);
        assert_eq!(MonthCursor::new(2030, 4).unwrap().days().count(), 30);
    }

    #[test]
    fn test_availability_grid() {
        // January 2030 starts on a Tuesday.
        let today = date(2030, 1, 9);
        let month = MonthCursor::new(2030, 1).unwrap();
        let p = mon_wed_fri();

        let grid: Vec<CalendarDay> = available_dates_for_month(&p, month, today).collect();
        assert_eq!(grid.len(), 31);
        assert_eq!(grid[0].day, 1);

        // Monday Jan 7 is before today
        assert!(!grid[6].is_available);
        // Wednesday Jan 9 is today
        assert!(grid[8].is_available);
        // Thursday Jan 10 is not a working day
        assert!(!grid[9].is_available);
        // Friday Jan 11
        assert!(grid[10].is_available);
    }

    #[test]
    fn test_past_month_fully_unavailable() {
        let today = date(2030, 1, 9);
        let p = mon_wed_fri();
        let month = MonthCursor::containing(today).previous();
        assert!(available_dates_for_month(&p, month, today).all(|d| !d.is_available));
    }

    #[test]
    fn test_time_slots_unmodified() {
        let p = mon_wed_fri();
        assert_eq!(time_slots_for(&p), p.time_slots.as_slice());
        assert_eq!(time_slots_for(&p)[0].to_string(), "9:00 AM");
    }

    #[test]
    fn test_month_display() {
        assert_eq!(MonthCursor::new(2030, 1).unwrap().to_string(), "January 2030");
    }
}
