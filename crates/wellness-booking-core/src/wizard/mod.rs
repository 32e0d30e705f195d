//! Booking wizard state machine.
//!
//! Steps: SelectConsultation(1) → SelectPractitioner(2) → SelectDateTime(3)
//! → ConfirmDetails(4) → Completed
//!
//! Every operation either applies fully or returns an error and leaves the
//! wizard untouched.

mod deferred;
mod summary;
mod validation;

pub use deferred::{ConfirmationTicket, PendingConfirmation};
pub use summary::*;
pub use validation::*;

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calendar::{
    available_dates_for_month, time_slots_for, CalendarDay, Clock, MonthCursor, SystemClock,
};
use crate::catalog::{Catalog, CatalogError, StaticCatalog};
use crate::models::{
    BookingRecord, BookingSelection, BookingSnapshot, ConsultationFormat, ContactForm,
    ConsultationType, Practitioner, TimeSlot, WizardStep,
};

use deferred::Lifecycle;

/// Date/time choices that break the practitioner's availability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Select a practitioner before choosing a date or time")]
    NoPractitioner,

    #[error("Select a date before choosing a time")]
    NoDate,

    #[error("{date} is in the past")]
    DateInPast { date: NaiveDate },

    #[error("{practitioner} is not available on {weekday}s")]
    DayUnavailable {
        date: NaiveDate,
        weekday: Weekday,
        practitioner: String,
    },

    #[error("{time} is not offered by {practitioner}")]
    TimeUnavailable { time: TimeSlot, practitioner: String },
}

/// Attempts to move past a step whose requirement is unmet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepGateError {
    #[error("Select a consultation type to continue")]
    ConsultationRequired,

    #[error("Select a practitioner to continue")]
    PractitionerRequired,

    #[error("Select a date and time to continue")]
    DateTimeRequired,

    #[error("Bookings can only be confirmed from the review step (currently at {0})")]
    NotAtReview(WizardStep),

    #[error("This booking is already confirmed; start a new booking")]
    AlreadyCompleted,
}

/// Wizard errors.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Lookup(#[from] CatalogError),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    StepGate(#[from] StepGateError),

    #[error("Confirmation cancelled: the booking was reset or changed")]
    Cancelled,
}

pub type WizardResult<T> = Result<T, WizardError>;

/// Booking wizard for one client session.
pub struct BookingWizard {
    session_id: String,
    catalog: Arc<dyn Catalog>,
    clock: Arc<dyn Clock>,
    step: WizardStep,
    selection: BookingSelection,
    calendar_month: MonthCursor,
    time_slots: Vec<TimeSlot>,
    last_record: Option<BookingRecord>,
    lifecycle: Lifecycle,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new(Arc::new(StaticCatalog::builtin()), Arc::new(SystemClock))
    }
}

impl BookingWizard {
    /// Create a wizard over an injected catalog and clock.
    pub fn new(catalog: Arc<dyn Catalog>, clock: Arc<dyn Clock>) -> Self {
        let calendar_month = MonthCursor::containing(clock.today());
        let session_id = uuid::Uuid::new_v4().to_string();
        debug!("Booking session {} started", session_id);

        Self {
            session_id,
            catalog,
            clock,
            step: WizardStep::default(),
            selection: BookingSelection::default(),
            calendar_month,
            time_slots: Vec::new(),
            last_record: None,
            lifecycle: Lifecycle::new(),
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn selection(&self) -> &BookingSelection {
        &self.selection
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Running summary of the current selection.
    pub fn summary(&self) -> BookingSummary {
        BookingSummary::from_selection(&self.selection)
    }

    /// Month shown in the date picker.
    pub fn calendar_month(&self) -> MonthCursor {
        self.calendar_month
    }

    /// Availability grid for the displayed month. Empty until a practitioner
    /// is chosen.
    pub fn calendar_days(&self) -> Vec<CalendarDay> {
        match &self.selection.practitioner {
            Some(practitioner) => available_dates_for_month(
                practitioner,
                self.calendar_month,
                self.clock.today(),
            )
            .collect(),
            None => Vec::new(),
        }
    }

    /// Slots offered for the chosen date. Empty until a date is chosen.
    pub fn available_time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// Record produced by the last confirmation, until the next reset.
    pub fn last_record(&self) -> Option<&BookingRecord> {
        self.last_record.as_ref()
    }

    /// Whether the current step's requirement is met.
    pub fn can_advance(&self) -> bool {
        self.check_gate().is_ok()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Choose a consultation type. Advances from step 1 to step 2.
    pub fn select_consultation_type(&mut self, id: &str) -> WizardResult<&ConsultationType> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("select_consultation_type", e));
        }
        let consultation = match self.catalog.consultation_type(id) {
            Ok(c) => c.clone(),
            Err(e) => return Err(self.reject("select_consultation_type", e)),
        };

        debug!(
            "Session {}: consultation type '{}' selected",
            self.session_id, consultation.id
        );
        if self.step == WizardStep::SelectConsultation {
            self.step = WizardStep::SelectPractitioner;
        }
        self.supersede_review();

        Ok(&*self.selection.consultation_type.insert(consultation))
    }

    /// Choose a practitioner. Advances from step 2 to step 3. Switching to a
    /// different practitioner clears the chosen date and time.
    pub fn select_practitioner(&mut self, id: &str) -> WizardResult<&Practitioner> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("select_practitioner", e));
        }
        let practitioner = match self.catalog.practitioner(id) {
            Ok(p) => p.clone(),
            Err(e) => return Err(self.reject("select_practitioner", e)),
        };

        let changed = self
            .selection
            .practitioner
            .as_ref()
            .map_or(true, |current| current.id != practitioner.id);
        if changed {
            if self.selection.date.is_some() {
                debug!(
                    "Session {}: practitioner changed, clearing date and time",
                    self.session_id
                );
            }
            self.selection.clear_schedule();
            self.time_slots.clear();
        }

        debug!(
            "Session {}: practitioner '{}' selected, calendar for {}",
            self.session_id, practitioner.id, self.calendar_month
        );
        if self.step == WizardStep::SelectPractitioner {
            self.step = WizardStep::SelectDateTime;
        }
        self.supersede_review();

        Ok(&*self.selection.practitioner.insert(practitioner))
    }

    /// Choose a date. The date must not be in the past and must fall on one
    /// of the practitioner's working days. Clears any chosen time.
    pub fn select_date(&mut self, date: NaiveDate) -> WizardResult<()> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("select_date", e));
        }
        if let Err(e) = self.check_date(date) {
            return Err(self.reject("select_date", e));
        }

        let slots = self
            .selection
            .practitioner
            .as_ref()
            .map(|p| time_slots_for(p).to_vec())
            .unwrap_or_default();

        self.selection.date = Some(date);
        self.selection.time = None;
        self.time_slots = slots;
        self.calendar_month = MonthCursor::containing(date);
        self.supersede_review();

        debug!(
            "Session {}: date {} selected, {} slots offered",
            self.session_id,
            date,
            self.time_slots.len()
        );
        Ok(())
    }

    /// Choose a time from the practitioner's declared slots.
    pub fn select_time(&mut self, time: TimeSlot) -> WizardResult<()> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("select_time", e));
        }
        if let Err(e) = self.check_time(time) {
            return Err(self.reject("select_time", e));
        }

        self.selection.time = Some(time);
        self.supersede_review();
        debug!("Session {}: time {} selected", self.session_id, time);
        Ok(())
    }

    /// Choose in-person or telemedicine.
    pub fn set_format(&mut self, format: ConsultationFormat) -> WizardResult<()> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("set_format", e));
        }
        self.selection.format = format;
        self.supersede_review();
        Ok(())
    }

    /// Replace the contact details.
    pub fn set_contact_form(&mut self, form: ContactForm) -> WizardResult<()> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("set_contact_form", e));
        }
        self.selection.contact_form = form;
        self.supersede_review();
        Ok(())
    }

    // =========================================================================
    // Calendar navigation
    // =========================================================================

    pub fn next_month(&mut self) -> MonthCursor {
        self.calendar_month = self.calendar_month.next();
        self.calendar_month
    }

    pub fn previous_month(&mut self) -> MonthCursor {
        self.calendar_month = self.calendar_month.previous();
        self.calendar_month
    }

    // =========================================================================
    // Step navigation
    // =========================================================================

    /// Move forward one step if the current step's requirement is met.
    /// Stays on the review step when already there.
    pub fn advance_step(&mut self) -> WizardResult<WizardStep> {
        if let Err(e) = self.check_gate() {
            return Err(self.reject("advance_step", e));
        }
        self.step = self.step.next();
        debug!("Session {}: advanced to {}", self.session_id, self.step);
        Ok(self.step)
    }

    /// Move back one step, stopping at step 1. Leaving the review step
    /// cancels any pending confirmation.
    pub fn retreat_step(&mut self) -> WizardResult<WizardStep> {
        if let Err(e) = self.ensure_open() {
            return Err(self.reject("retreat_step", e));
        }
        if self.step == WizardStep::ConfirmDetails {
            self.lifecycle.advance();
        }
        self.step = self.step.previous();
        debug!("Session {}: went back to {}", self.session_id, self.step);
        Ok(self.step)
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Confirm the booking from the review step.
    pub fn confirm_booking(&mut self) -> WizardResult<BookingRecord> {
        let snapshot = match self.prepare_confirmation() {
            Ok(snapshot) => snapshot,
            Err(e) => return Err(self.reject("confirm_booking", e)),
        };

        let record = BookingRecord::new(self.session_id.clone(), snapshot, self.clock.now());
        self.step = WizardStep::Completed;
        self.last_record = Some(record.clone());

        info!(
            "Session {}: booking {} confirmed ({} with {} on {} at {}, {})",
            self.session_id,
            record.booking_id,
            record.selection.consultation_type.id,
            record.selection.practitioner.id,
            record.selection.date,
            record.selection.time,
            record.total_cost
        );
        Ok(record)
    }

    /// Validate now and start a confirmation that completes after `latency`.
    /// Pass the settled ticket to [`BookingWizard::finish_confirmation`].
    pub fn begin_confirmation(&self, latency: Duration) -> WizardResult<PendingConfirmation> {
        if let Err(e) = self.prepare_confirmation() {
            return Err(self.reject("begin_confirmation", e));
        }
        debug!(
            "Session {}: confirmation pending for {:?}",
            self.session_id, latency
        );
        Ok(PendingConfirmation::new(&self.lifecycle, latency))
    }

    /// Apply a settled confirmation. Tickets issued before a reset or a
    /// step back are refused.
    pub fn finish_confirmation(&mut self, ticket: ConfirmationTicket) -> WizardResult<BookingRecord> {
        if ticket.epoch != self.lifecycle.current() {
            warn!(
                "Session {}: discarding stale confirmation (epoch {} < {})",
                self.session_id,
                ticket.epoch,
                self.lifecycle.current()
            );
            return Err(WizardError::Cancelled);
        }
        self.confirm_booking()
    }

    /// Clear the selection and return to step 1. Cancels pending
    /// confirmations.
    pub fn reset(&mut self) {
        self.lifecycle.advance();
        self.step = WizardStep::default();
        self.selection = BookingSelection::default();
        self.time_slots.clear();
        self.calendar_month = MonthCursor::containing(self.clock.today());
        self.last_record = None;
        debug!("Session {}: wizard reset", self.session_id);
    }

    // =========================================================================
    // Checks
    // =========================================================================

    /// A pending confirmation was validated against the selection as it was
    /// when it began; any edit on the review step cancels it.
    fn supersede_review(&self) {
        if self.step == WizardStep::ConfirmDetails {
            self.lifecycle.advance();
        }
    }

    fn ensure_open(&self) -> Result<(), StepGateError> {
        if self.step == WizardStep::Completed {
            return Err(StepGateError::AlreadyCompleted);
        }
        Ok(())
    }

    fn check_gate(&self) -> Result<(), StepGateError> {
        let selection = &self.selection;
        match self.step {
            WizardStep::SelectConsultation if selection.consultation_type.is_none() => {
                Err(StepGateError::ConsultationRequired)
            }
            WizardStep::SelectPractitioner if selection.practitioner.is_none() => {
                Err(StepGateError::PractitionerRequired)
            }
            WizardStep::SelectDateTime if selection.date.is_none() || selection.time.is_none() => {
                Err(StepGateError::DateTimeRequired)
            }
            WizardStep::Completed => Err(StepGateError::AlreadyCompleted),
            _ => Ok(()),
        }
    }

    fn check_date(&self, date: NaiveDate) -> Result<(), AvailabilityError> {
        let practitioner = self
            .selection
            .practitioner
            .as_ref()
            .ok_or(AvailabilityError::NoPractitioner)?;

        if date < self.clock.today() {
            return Err(AvailabilityError::DateInPast { date });
        }
        if !practitioner.is_available_on(date.weekday()) {
            return Err(AvailabilityError::DayUnavailable {
                date,
                weekday: date.weekday(),
                practitioner: practitioner.name.clone(),
            });
        }
        Ok(())
    }

    fn check_time(&self, time: TimeSlot) -> Result<(), AvailabilityError> {
        let practitioner = self
            .selection
            .practitioner
            .as_ref()
            .ok_or(AvailabilityError::NoPractitioner)?;

        if self.selection.date.is_none() {
            return Err(AvailabilityError::NoDate);
        }
        if !practitioner.offers_slot(&time) {
            return Err(AvailabilityError::TimeUnavailable {
                time,
                practitioner: practitioner.name.clone(),
            });
        }
        Ok(())
    }

    /// Everything `confirm_booking` checks, without changing state.
    fn prepare_confirmation(&self) -> WizardResult<BookingSnapshot> {
        self.ensure_open()?;
        if self.step != WizardStep::ConfirmDetails {
            return Err(StepGateError::NotAtReview(self.step).into());
        }

        let selection = &self.selection;
        if selection.consultation_type.is_none() {
            return Err(StepGateError::ConsultationRequired.into());
        }
        if selection.practitioner.is_none() {
            return Err(StepGateError::PractitionerRequired.into());
        }
        let (Some(date), Some(time)) = (selection.date, selection.time) else {
            return Err(StepGateError::DateTimeRequired.into());
        };

        validate_contact_form(&selection.contact_form)?;

        // The session may have crossed midnight since the date was picked.
        self.check_date(date)?;
        self.check_time(time)?;

        BookingSnapshot::from_selection(selection)
            .ok_or_else(|| StepGateError::DateTimeRequired.into())
    }

    fn reject<E: Into<WizardError>>(&self, operation: &str, error: E) -> WizardError {
        let error = error.into();
        warn!(
            "Session {}: {} rejected at {}: {}",
            self.session_id, operation, self.step, error
        );
        error
    }
}
