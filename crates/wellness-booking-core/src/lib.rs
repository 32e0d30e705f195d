//! Wellness Booking Core Library
//!
//! Appointment booking wizard for an Ayurvedic wellness clinic.
//!
//! # Architecture
//!
//! ```text
//!   Catalog (consultation types, practitioners)      Clock (today)
//!            │                                          │
//!            └──────────────────┬───────────────────────┘
//!                               ▼
//!   ┌───────────────────────────────────────────────────────────┐
//!   │ BookingWizard                                             │
//!   │  1 consultation → 2 practitioner → 3 date/time → 4 review │
//!   └───────────────────────────┬───────────────────────────────┘
//!                               │ confirm (optionally deferred)
//!                               ▼
//!                         BookingRecord
//!                               │
//!               ┌───────────────┼───────────────┐
//!               ▼               ▼               ▼
//!            Summary       Text / JSON        Print
//! ```
//!
//! # Core Principle
//!
//! **Operations are all-or-nothing.** A rejected selection, gate or
//! confirmation leaves the wizard exactly as it was.
//!
//! # Modules
//!
//! - [`models`]: Domain types (ConsultationType, Practitioner, BookingRecord, etc.)
//! - [`catalog`]: Injected read-only reference data
//! - [`calendar`]: Availability grid, month navigation, time slots
//! - [`wizard`]: Step state machine, validation, deferred confirmation
//! - [`export`]: Confirmation documents
//! - [`config`]: Environment configuration

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod export;
pub mod models;
pub mod wizard;

// Re-export commonly used types
pub use calendar::{CalendarDay, Clock, FixedClock, MonthCursor, SystemClock};
pub use catalog::{Catalog, CatalogError, StaticCatalog};
pub use config::BookingConfig;
pub use export::ConfirmationDocument;
pub use models::{
    BookingRecord, BookingSelection, ConsultationFormat, ConsultationType, ContactForm, Money,
    Practitioner, TimeSlot, WizardStep,
};
pub use wizard::{BookingSummary, BookingWizard, ConfirmationTicket, WizardError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum BookingError {
    #[error("{0}")]
    LookupError(String),

    #[error("{0}")]
    AvailabilityError(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    StepGateError(String),

    #[error("{0}")]
    Cancelled(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<WizardError> for BookingError {
    fn from(e: WizardError) -> Self {
        let message = e.to_string();
        match e {
            WizardError::Lookup(_) => BookingError::LookupError(message),
            WizardError::Availability(_) => BookingError::AvailabilityError(message),
            WizardError::Validation(_) => BookingError::ValidationError(message),
            WizardError::StepGate(_) => BookingError::StepGateError(message),
            WizardError::Cancelled => BookingError::Cancelled(message),
        }
    }
}

impl From<CatalogError> for BookingError {
    fn from(e: CatalogError) -> Self {
        BookingError::CatalogError(e.to_string())
    }
}

impl From<config::ConfigError> for BookingError {
    fn from(e: config::ConfigError) -> Self {
        BookingError::CatalogError(e.to_string())
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(e: serde_json::Error) -> Self {
        BookingError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for BookingError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        BookingError::SessionError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a booking session over the built-in catalog.
#[uniffi::export]
pub fn open_session() -> Arc<BookingSession> {
    Arc::new(BookingSession::new(
        BookingWizard::default(),
        config::DEFAULT_CONFIRMATION_DELAY,
    ))
}

/// Open a booking session over a catalog JSON document.
#[uniffi::export]
pub fn open_session_with_catalog_json(json: String) -> Result<Arc<BookingSession>, BookingError> {
    let catalog = StaticCatalog::from_json(&json)?;
    let wizard = BookingWizard::new(Arc::new(catalog), Arc::new(SystemClock));
    Ok(Arc::new(BookingSession::new(
        wizard,
        config::DEFAULT_CONFIRMATION_DELAY,
    )))
}

/// Open a booking session configured from the environment.
#[uniffi::export]
pub fn open_session_from_env() -> Result<Arc<BookingSession>, BookingError> {
    let config = BookingConfig::from_env();
    let wizard = config.build_wizard()?;
    Ok(Arc::new(BookingSession::new(wizard, config.confirmation_delay)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe wizard wrapper for FFI.
#[derive(uniffi::Object)]
pub struct BookingSession {
    wizard: Mutex<BookingWizard>,
    confirmation_delay: Duration,
}

impl BookingSession {
    pub fn new(wizard: BookingWizard, confirmation_delay: Duration) -> Self {
        Self {
            wizard: Mutex::new(wizard),
            confirmation_delay,
        }
    }

    fn last_document(&self) -> Result<ConfirmationDocument, BookingError> {
        let wizard = self.wizard.lock()?;
        let record = wizard.last_record().ok_or_else(|| {
            BookingError::StepGateError("No confirmed booking to export".to_string())
        })?;
        Ok(ConfirmationDocument::from_record(record)?)
    }
}

#[uniffi::export]
impl BookingSession {
    // =========================================================================
    // Read Access
    // =========================================================================

    /// Current step, summary and slot list for rendering.
    pub fn state(&self) -> Result<FfiWizardState, BookingError> {
        let wizard = self.wizard.lock()?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    /// All consultation types in display order.
    pub fn consultation_types(&self) -> Result<Vec<FfiConsultationType>, BookingError> {
        let wizard = self.wizard.lock()?;
        Ok(wizard
            .catalog()
            .consultation_types()
            .iter()
            .map(FfiConsultationType::from)
            .collect())
    }

    /// All practitioners in display order.
    pub fn practitioners(&self) -> Result<Vec<FfiPractitioner>, BookingError> {
        let wizard = self.wizard.lock()?;
        Ok(wizard
            .catalog()
            .practitioners()
            .iter()
            .map(FfiPractitioner::from)
            .collect())
    }

    /// Simulated confirmation latency the UI should show a spinner for.
    pub fn confirmation_delay_ms(&self) -> u64 {
        self.confirmation_delay.as_millis() as u64
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select_consultation_type(&self, id: String) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.select_consultation_type(&id)?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    pub fn select_practitioner(&self, id: String) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.select_practitioner(&id)?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    /// Select a date given as `YYYY-MM-DD`.
    pub fn select_date(&self, date: String) -> Result<FfiWizardState, BookingError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidInput(format!("Invalid date '{}'", date)))?;
        let mut wizard = self.wizard.lock()?;
        wizard.select_date(date)?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    /// Select a time given as `9:00 AM`.
    pub fn select_time(&self, time: String) -> Result<FfiWizardState, BookingError> {
        let slot: TimeSlot = time
            .parse()
            .map_err(|e: models::TimeSlotParseError| BookingError::InvalidInput(e.to_string()))?;
        let mut wizard = self.wizard.lock()?;
        wizard.select_time(slot)?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    pub fn set_format(&self, format: FfiConsultationFormat) -> Result<(), BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.set_format(format.into())?;
        Ok(())
    }

    pub fn set_contact_form(&self, form: FfiContactForm) -> Result<(), BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.set_contact_form(form.into())?;
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn advance_step(&self) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.advance_step()?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    pub fn retreat_step(&self) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.retreat_step()?;
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    pub fn next_month(&self) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.next_month();
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    pub fn previous_month(&self) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.previous_month();
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Confirm right away, without the simulated latency.
    pub fn confirm_booking(&self) -> Result<FfiBookingRecord, BookingError> {
        let mut wizard = self.wizard.lock()?;
        let record = wizard.confirm_booking()?;
        Ok(FfiBookingRecord::from(&record))
    }

    /// Validate the booking and issue a ticket. The shell shows its spinner
    /// for `delay_ms`, then redeems the ticket with `finish_confirmation`.
    pub fn begin_confirmation(&self) -> Result<FfiConfirmationTicket, BookingError> {
        let wizard = self.wizard.lock()?;
        let pending = wizard.begin_confirmation(self.confirmation_delay)?;
        Ok(FfiConfirmationTicket {
            epoch: pending.epoch(),
            delay_ms: self.confirmation_delay_ms(),
        })
    }

    /// Redeem a ticket. Fails with `Cancelled` if the wizard was reset, left
    /// the review step, or had its selection edited since the ticket was issued.
    pub fn finish_confirmation(
        &self,
        ticket: FfiConfirmationTicket,
    ) -> Result<FfiBookingRecord, BookingError> {
        let mut wizard = self.wizard.lock()?;
        let record = wizard.finish_confirmation(ConfirmationTicket {
            epoch: ticket.epoch,
        })?;
        Ok(FfiBookingRecord::from(&record))
    }

    pub fn reset(&self) -> Result<FfiWizardState, BookingError> {
        let mut wizard = self.wizard.lock()?;
        wizard.reset();
        Ok(FfiWizardState::from_wizard(&wizard))
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export the last confirmation as plain text.
    pub fn export_confirmation_text(&self) -> Result<String, BookingError> {
        Ok(self.last_document()?.to_text())
    }

    /// Export the last confirmation as JSON.
    pub fn export_confirmation_json(&self) -> Result<String, BookingError> {
        Ok(self.last_document()?.to_json()?)
    }

    /// Export the last confirmation in print layout.
    pub fn export_confirmation_print(&self) -> Result<String, BookingError> {
        Ok(self.last_document()?.to_print())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe consultation format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiConsultationFormat {
    InPerson,
    Telemedicine,
}

impl From<FfiConsultationFormat> for ConsultationFormat {
    fn from(format: FfiConsultationFormat) -> Self {
        match format {
            FfiConsultationFormat::InPerson => ConsultationFormat::InPerson,
            FfiConsultationFormat::Telemedicine => ConsultationFormat::Telemedicine,
        }
    }
}

impl From<ConsultationFormat> for FfiConsultationFormat {
    fn from(format: ConsultationFormat) -> Self {
        match format {
            ConsultationFormat::InPerson => FfiConsultationFormat::InPerson,
            ConsultationFormat::Telemedicine => FfiConsultationFormat::Telemedicine,
        }
    }
}

/// FFI-safe consultation type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConsultationType {
    pub id: String,
    pub name: String,
    pub duration: String,
    pub price_range: String,
    pub standard_price_cents: u64,
    pub short_description: String,
    pub icon: String,
}

impl From<&ConsultationType> for FfiConsultationType {
    fn from(c: &ConsultationType) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            duration: c.duration_range.clone(),
            price_range: c.price_range.clone(),
            standard_price_cents: c.standard_price.cents(),
            short_description: c.short_description.clone(),
            icon: c.icon.clone(),
        }
    }
}

/// FFI-safe practitioner.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPractitioner {
    pub id: String,
    pub name: String,
    pub credentials: String,
    pub experience: String,
    pub rating: f64,
    pub reviews: u32,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub available_days: String,
    pub time_slots: Vec<String>,
}

impl From<&Practitioner> for FfiPractitioner {
    fn from(p: &Practitioner) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            credentials: p.credentials.clone(),
            experience: p.experience.clone(),
            rating: p.rating,
            reviews: p.reviews,
            specializations: p.specializations.clone(),
            languages: p.languages.clone(),
            available_days: p.availability_label(),
            time_slots: p.time_slots.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// FFI-safe contact form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub health_concerns: String,
    pub medications: String,
    pub special_needs: String,
}

impl From<FfiContactForm> for ContactForm {
    fn from(f: FfiContactForm) -> Self {
        ContactForm {
            first_name: f.first_name,
            last_name: f.last_name,
            email: f.email,
            phone: f.phone,
            health_concerns: f.health_concerns,
            medications: f.medications,
            special_needs: f.special_needs,
        }
    }
}

/// FFI-safe calendar cell.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalendarDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub day: u32,
    pub is_available: bool,
}

impl From<&CalendarDay> for FfiCalendarDay {
    fn from(d: &CalendarDay) -> Self {
        Self {
            date: d.date.format("%Y-%m-%d").to_string(),
            day: d.day,
            is_available: d.is_available,
        }
    }
}

/// FFI-safe wizard state for rendering.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWizardState {
    /// 1-4, or 5 once completed
    pub step: u8,
    pub step_title: String,
    pub can_advance: bool,
    pub consultation_id: Option<String>,
    pub practitioner_id: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub time: Option<String>,
    pub format: FfiConsultationFormat,
    pub summary_lines: Vec<String>,
    pub total_cost_cents: u64,
    pub calendar_title: String,
    pub calendar_days: Vec<FfiCalendarDay>,
    pub time_slots: Vec<String>,
}

impl FfiWizardState {
    fn from_wizard(wizard: &BookingWizard) -> Self {
        let selection = wizard.selection();
        let summary = wizard.summary();
        Self {
            step: wizard.step().number(),
            step_title: wizard.step().title().to_string(),
            can_advance: wizard.can_advance(),
            consultation_id: selection.consultation_type.as_ref().map(|c| c.id.clone()),
            practitioner_id: selection.practitioner.as_ref().map(|p| p.id.clone()),
            date: selection.date.map(|d| d.format("%Y-%m-%d").to_string()),
            time: selection.time.map(|t| t.to_string()),
            format: selection.format.into(),
            summary_lines: summary
                .lines()
                .into_iter()
                .map(|(label, value)| format!("{}: {}", label, value))
                .collect(),
            total_cost_cents: summary.total_cost.cents(),
            calendar_title: wizard.calendar_month().to_string(),
            calendar_days: wizard.calendar_days().iter().map(FfiCalendarDay::from).collect(),
            time_slots: wizard
                .available_time_slots()
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// FFI-safe booking record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBookingRecord {
    pub booking_id: String,
    pub session_id: String,
    pub consultation_id: String,
    pub consultation_name: String,
    pub practitioner_id: String,
    pub practitioner_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
    pub format: FfiConsultationFormat,
    pub total_cost_cents: u64,
    pub created_at: String,
}

impl From<&BookingRecord> for FfiBookingRecord {
    fn from(r: &BookingRecord) -> Self {
        let s = &r.selection;
        Self {
            booking_id: r.booking_id.clone(),
            session_id: r.session_id.clone(),
            consultation_id: s.consultation_type.id.clone(),
            consultation_name: s.consultation_type.name.clone(),
            practitioner_id: s.practitioner.id.clone(),
            practitioner_name: s.practitioner.name.clone(),
            date: s.date.format("%Y-%m-%d").to_string(),
            time: s.time.to_string(),
            format: s.format.into(),
            total_cost_cents: r.total_cost.cents(),
            created_at: r.created_at.clone(),
        }
    }
}

/// FFI-safe handle for a confirmation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct FfiConfirmationTicket {
    pub epoch: u64,
    pub delay_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> BookingSession {
        let today = NaiveDate::from_ymd_opt(2030, 1, 9).unwrap();
        let wizard = BookingWizard::new(
            Arc::new(StaticCatalog::builtin()),
            Arc::new(FixedClock::new(today)),
        );
        BookingSession::new(wizard, Duration::from_millis(0))
    }

    fn contact() -> FfiContactForm {
        FfiContactForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-1234".into(),
            health_concerns: String::new(),
            medications: String::new(),
            special_needs: String::new(),
        }
    }

    #[test]
    fn test_session_full_flow() {
        let session = session();
        assert_eq!(session.consultation_types().unwrap().len(), 5);

        let state = session.select_consultation_type("comprehensive".into()).unwrap();
        assert_eq!(state.step, 2);

        let state = session.select_practitioner("sarah-patel".into()).unwrap();
        assert_eq!(state.step, 3);
        assert_eq!(state.calendar_title, "January 2030");
        assert_eq!(state.calendar_days.len(), 31);

        let state = session.select_date("2030-01-14".into()).unwrap();
        assert_eq!(state.time_slots[0], "9:00 AM");

        session.select_time("9:00 AM".into()).unwrap();
        let state = session.advance_step().unwrap();
        assert_eq!(state.step, 4);

        session.set_contact_form(contact()).unwrap();
        let record = session.confirm_booking().unwrap();
        assert_eq!(record.total_cost_cents, 25_000);
        assert_eq!(record.format, FfiConsultationFormat::InPerson);
        assert_eq!(record.date, "2030-01-14");

        let text = session.export_confirmation_text().unwrap();
        assert!(text.contains(&record.booking_id));
        assert!(session.export_confirmation_json().unwrap().contains("sarah-patel"));
    }

    fn session_at_review() -> BookingSession {
        let session = session();
        session.select_consultation_type("comprehensive".into()).unwrap();
        session.select_practitioner("sarah-patel".into()).unwrap();
        session.select_date("2030-01-14".into()).unwrap();
        session.select_time("9:00 AM".into()).unwrap();
        session.advance_step().unwrap();
        session.set_contact_form(contact()).unwrap();
        session
    }

    #[test]
    fn test_session_deferred_confirmation() {
        let session = session_at_review();
        let ticket = session.begin_confirmation().unwrap();
        assert_eq!(ticket.delay_ms, 0);

        let record = session.finish_confirmation(ticket).unwrap();
        assert_eq!(record.total_cost_cents, 25_000);
        assert_eq!(session.state().unwrap().step, 5);
    }

    #[test]
    fn test_session_ticket_cancelled_by_round_trip() {
        let session = session_at_review();
        let ticket = session.begin_confirmation().unwrap();

        session.retreat_step().unwrap();
        session.advance_step().unwrap();
        assert!(matches!(
            session.finish_confirmation(ticket),
            Err(BookingError::Cancelled(_))
        ));
        assert_eq!(session.state().unwrap().step, 4);
        assert!(session.export_confirmation_text().is_err());

        let ticket = session.begin_confirmation().unwrap();
        assert!(session.finish_confirmation(ticket).is_ok());
    }

    #[test]
    fn test_session_ticket_cancelled_by_review_edit() {
        let session = session_at_review();
        let ticket = session.begin_confirmation().unwrap();

        session.set_format(FfiConsultationFormat::Telemedicine).unwrap();
        assert!(matches!(
            session.finish_confirmation(ticket),
            Err(BookingError::Cancelled(_))
        ));
    }

    #[test]
    fn test_session_begin_confirmation_validates() {
        let session = session_at_review();
        session
            .set_contact_form(FfiContactForm {
                email: "not-an-email".into(),
                ..contact()
            })
            .unwrap();
        assert!(matches!(
            session.begin_confirmation(),
            Err(BookingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_error_mapping() {
        let session = session();
        assert!(matches!(
            session.select_consultation_type("nope".into()),
            Err(BookingError::LookupError(_))
        ));
        assert!(matches!(
            session.advance_step(),
            Err(BookingError::StepGateError(_))
        ));
        assert!(matches!(
            session.select_date("14/01/2030".into()),
            Err(BookingError::InvalidInput(_))
        ));
        assert!(matches!(
            session.select_time("whenever".into()),
            Err(BookingError::InvalidInput(_))
        ));
        assert!(matches!(
            session.export_confirmation_text(),
            Err(BookingError::StepGateError(_))
        ));
    }

    #[test]
    fn test_open_with_catalog_json() {
        let json = serde_json::to_string(&StaticCatalog::builtin().to_document()).unwrap();
        let session = open_session_with_catalog_json(json).unwrap();
        assert_eq!(session.practitioners().unwrap().len(), 3);

        assert!(matches!(
            open_session_with_catalog_json("not json".into()),
            Err(BookingError::CatalogError(_))
        ));
    }
}
