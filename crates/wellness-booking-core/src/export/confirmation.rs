//! Booking confirmation documents.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{BookingRecord, ConsultationFormat};
use crate::wizard::{format_long_date, BookingSummary};

/// Current confirmation document format.
pub const FORMAT_VERSION: &str = "1.0";

/// Hash algorithm used for record digests.
pub const HASH_ALGORITHM: &str = "sha256";

/// Line width of the print layout.
const PRINT_WIDTH: usize = 64;

/// Hash data using SHA-256, hex-encoded.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Confirmation export metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationMetadata {
    /// Export format version
    pub format_version: String,
    /// Export timestamp
    pub exported_at: String,
    /// Hash algorithm used
    pub hash_algorithm: String,
    /// Digest of the record's canonical JSON
    pub record_digest: String,
}

/// A confirmed booking ready for display, download or print.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationDocument {
    /// Export metadata
    pub metadata: ConfirmationMetadata,
    /// The booking
    pub record: BookingRecord,
}

impl ConfirmationDocument {
    /// Create a document from a confirmed record.
    pub fn from_record(record: &BookingRecord) -> Result<Self, serde_json::Error> {
        let canonical = record.to_canonical_json()?;
        Ok(Self {
            metadata: ConfirmationMetadata {
                format_version: FORMAT_VERSION.to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                hash_algorithm: HASH_ALGORITHM.to_string(),
                record_digest: hash_data(canonical.as_bytes()),
            },
            record: record.clone(),
        })
    }

    /// Check the digest still matches the record.
    pub fn verify(&self) -> bool {
        self.record
            .to_canonical_json()
            .map(|json| hash_data(json.as_bytes()) == self.metadata.record_digest)
            .unwrap_or(false)
    }

    /// On-screen summary of the booked selection.
    pub fn summary(&self) -> BookingSummary {
        let s = &self.record.selection;
        BookingSummary {
            consultation: Some(s.consultation_type.name.clone()),
            duration: Some(s.consultation_type.duration_range.clone()),
            practitioner: Some(s.practitioner.name.clone()),
            date: Some(format_long_date(s.date)),
            time: Some(s.time.to_string()),
            format: s.format.display_name().to_string(),
            total_cost: self.record.total_cost,
        }
    }

    /// Suggested download file name for an extension ("txt", "json").
    pub fn file_name(&self, extension: &str) -> String {
        format!("booking-{}.{}", self.record.booking_id, extension)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export as a plain-text document.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("BOOKING CONFIRMATION\n");
        out.push_str("====================\n\n");
        self.write_body(&mut out);
        out.push_str(&format!(
            "\nRecord digest ({}): {}\n",
            self.metadata.hash_algorithm, self.metadata.record_digest
        ));
        out
    }

    /// Export as a fixed-width print layout.
    pub fn to_print(&self) -> String {
        let rule = "=".repeat(PRINT_WIDTH);
        let mut out = String::new();

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&center("Appointment Confirmation"));
        out.push_str(&center(&self.record.booking_id));
        out.push_str(&rule);
        out.push_str("\n\n");

        self.write_body(&mut out);

        out.push('\n');
        out.push_str(&"-".repeat(PRINT_WIDTH));
        out.push('\n');
        let contact = &self.record.selection.contact;
        let note = match self.record.selection.format {
            ConsultationFormat::InPerson => {
                "Please arrive 10 minutes before your appointment.".to_string()
            }
            ConsultationFormat::Telemedicine => {
                format!("A video link will be sent to {}.", contact.email.trim())
            }
        };
        out.push_str(&note);
        out.push('\n');
        let digest: String = self.metadata.record_digest.chars().take(16).collect();
        out.push_str(&format!("Digest: {}\n", digest));
        out
    }

    fn write_body(&self, out: &mut String) {
        let record = &self.record;
        let s = &record.selection;

        let mut practitioner = s.practitioner.name.clone();
        if !s.practitioner.credentials.is_empty() {
            practitioner.push_str(&format!(", {}", s.practitioner.credentials));
        }
        let mut consultation = s.consultation_type.name.clone();
        if !s.consultation_type.duration_range.is_empty() {
            consultation.push_str(&format!(" ({})", s.consultation_type.duration_range));
        }

        let mut rows = vec![
            ("Booking ID", record.booking_id.clone()),
            ("Confirmed", record.created_at.clone()),
            ("Consultation", consultation),
            ("Practitioner", practitioner),
            ("Date", format_long_date(s.date)),
            ("Time", s.time.to_string()),
            ("Format", s.format.display_name().to_string()),
            ("Total", record.total_cost.to_string()),
            ("Client", s.contact.full_name()),
            ("Email", s.contact.email.trim().to_string()),
            ("Phone", s.contact.phone.trim().to_string()),
        ];
        for (label, value) in [
            ("Health concerns", &s.contact.health_concerns),
            ("Medications", &s.contact.medications),
            ("Special needs", &s.contact.special_needs),
        ] {
            if !value.trim().is_empty() {
                rows.push((label, value.trim().to_string()));
            }
        }

        for (label, value) in rows {
            out.push_str(&format!("{:<16} {}\n", format!("{}:", label), value));
        }
    }
}

fn center(text: &str) -> String {
    let pad = PRINT_WIDTH.saturating_sub(text.chars().count()) / 2;
    format!("{}{}\n", " ".repeat(pad), text)
}
