//! Practitioner reference data and time slots.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time slot parse failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid time slot '{0}', expected a time like '9:00 AM'")]
pub struct TimeSlotParseError(pub String);

/// A bookable time of day, written `9:00 AM` / `2:30 PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Create a slot from a 24-hour clock time.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-I:%M %p"))
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        NaiveTime::parse_from_str(&normalized, "%I:%M %p")
            .map(Self)
            .map_err(|_| TimeSlotParseError(s.to_string()))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// A practitioner who can be booked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    /// Stable identifier (e.g., "sarah-patel")
    pub id: String,
    /// Display name
    pub name: String,
    /// Qualifications (e.g., "BAMS, MD (Ayurveda)")
    #[serde(default)]
    pub credentials: String,
    /// Experience blurb (e.g., "15+ years")
    #[serde(default)]
    pub experience: String,
    /// Average review rating out of 5
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    /// Weekdays this practitioner sees clients
    #[serde(rename = "availableDays")]
    pub available_weekdays: Vec<Weekday>,
    /// Declared slots, in display order, offered on every available day
    pub time_slots: Vec<TimeSlot>,
}

impl Practitioner {
    /// Create a practitioner with required fields.
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            credentials: String::new(),
            experience: String::new(),
            rating: 0.0,
            reviews: 0,
            specializations: Vec::new(),
            languages: Vec::new(),
            available_weekdays: Vec::new(),
            time_slots: Vec::new(),
        }
    }

    /// Check if this practitioner works on a given weekday.
    pub fn is_available_on(&self, weekday: Weekday) -> bool {
        self.available_weekdays.contains(&weekday)
    }

    /// Check if a slot is one this practitioner declares.
    pub fn offers_slot(&self, slot: &TimeSlot) -> bool {
        self.time_slots.contains(slot)
    }

    /// Working days in week order, e.g. "Mon, Wed, Fri".
    pub fn availability_label(&self) -> String {
        let mut days = self.available_weekdays.clone();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        days.iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
