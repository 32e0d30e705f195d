//! Confirmed booking records.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::consultation::{ConsultationType, Money};
use super::practitioner::{Practitioner, TimeSlot};
use super::selection::{BookingSelection, ConsultationFormat, ContactForm};

/// Prefix of every booking id.
pub const BOOKING_ID_PREFIX: &str = "WB";

/// Random suffix length. 32^10 combinations per millisecond.
const SUFFIX_LEN: usize = 10;

/// Unambiguous uppercase alphabet (no I, L, O, U).
const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Generate a booking id: `WB-<base36 millis>-<random suffix>`.
pub fn generate_booking_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u64;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!("{}-{}-{}", BOOKING_ID_PREFIX, to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// A complete selection, frozen at confirmation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    pub consultation_type: ConsultationType,
    pub practitioner: Practitioner,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub format: ConsultationFormat,
    pub contact: ContactForm,
}

impl BookingSnapshot {
    /// Freeze a selection. Returns None while any schedule field is unset.
    pub fn from_selection(selection: &BookingSelection) -> Option<Self> {
        Some(Self {
            consultation_type: selection.consultation_type.clone()?,
            practitioner: selection.practitioner.clone()?,
            date: selection.date?,
            time: selection.time?,
            format: selection.format,
            contact: selection.contact_form.clone(),
        })
    }
}

/// A confirmed booking (immutable once created).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    /// Unique booking id
    pub booking_id: String,
    /// Wizard session that produced this booking
    pub session_id: String,
    /// What was booked
    pub selection: BookingSnapshot,
    /// Amount due
    pub total_cost: Money,
    /// Confirmation timestamp (RFC 3339)
    pub created_at: String,
}

impl BookingRecord {
    /// Create a record with a fresh booking id.
    pub fn new(session_id: String, selection: BookingSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            booking_id: generate_booking_id(now),
            session_id,
            total_cost: selection.consultation_type.standard_price,
            selection,
            created_at: now.to_rfc3339(),
        }
    }

    /// Serialize to canonical JSON for digests.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_selection() -> BookingSelection {
        let mut practitioner = Practitioner::new("sarah-patel".into(), "Dr. Sarah Patel".into());
        practitioner.time_slots = vec![TimeSlot::new(9, 0).unwrap()];

        BookingSelection {
            consultation_type: Some(ConsultationType::new(
                "comprehensive".into(),
                "Comprehensive Health Assessment".into(),
                Money::from_dollars(250),
            )),
            practitioner: Some(practitioner),
            date: NaiveDate::from_ymd_opt(2030, 1, 7),
            time: TimeSlot::new(9, 0),
            ..Default::default()
        }
    }

    #[test]
    fn test_booking_id_format() {
        let id = generate_booking_id(Utc::now());
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], BOOKING_ID_PREFIX);
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_booking_ids_unique_within_same_millisecond() {
        let now = Utc::now();
        let ids: HashSet<String> = (0..10_000).map(|_| generate_booking_id(now)).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_snapshot_requires_complete_schedule() {
        let selection = make_selection();
        assert!(BookingSnapshot::from_selection(&selection).is_some());

        let mut partial = selection.clone();
        partial.time = None;
        assert!(BookingSnapshot::from_selection(&partial).is_none());
    }

    #[test]
    fn test_record_total_and_canonical_json() {
        let snapshot = BookingSnapshot::from_selection(&make_selection()).unwrap();
        let record = BookingRecord::new("session-1".into(), snapshot, Utc::now());

        assert_eq!(record.total_cost, Money::from_dollars(250));
        assert_eq!(record.selection.format, ConsultationFormat::InPerson);

        let json1 = record.to_canonical_json().unwrap();
        let json2 = record.to_canonical_json().unwrap();
        assert_eq!(json1, json2);
        assert!(json1.contains("\"9:00 AM\""));
    }
}
