//! Mutable wizard session state.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::consultation::{ConsultationType, Money};
use super::practitioner::{Practitioner, TimeSlot};

/// How the consultation is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsultationFormat {
    #[default]
    InPerson,
    Telemedicine,
}

impl ConsultationFormat {
    /// Wire label ("in-person" / "telemedicine").
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationFormat::InPerson => "in-person",
            ConsultationFormat::Telemedicine => "telemedicine",
        }
    }

    /// Label shown in the booking summary.
    pub fn display_name(&self) -> &'static str {
        match self {
            ConsultationFormat::InPerson => "In-Person",
            ConsultationFormat::Telemedicine => "Telemedicine",
        }
    }
}

impl fmt::Display for ConsultationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required contact fields, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl ContactField {
    pub const REQUIRED: [ContactField; 4] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::FirstName => "firstName",
            ContactField::LastName => "lastName",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details entered on the review step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Free-text, optional
    pub health_concerns: String,
    /// Free-text, optional
    pub medications: String,
    /// Free-text, optional
    pub special_needs: String,
}

impl ContactForm {
    /// Value of a required field.
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Wizard position. Steps 1-4 are user-facing; `Completed` follows a confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    #[default]
    SelectConsultation,
    SelectPractitioner,
    SelectDateTime,
    ConfirmDetails,
    Completed,
}

impl WizardStep {
    /// 1-based step number; `Completed` reports 5.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::SelectConsultation => 1,
            WizardStep::SelectPractitioner => 2,
            WizardStep::SelectDateTime => 3,
            WizardStep::ConfirmDetails => 4,
            WizardStep::Completed => 5,
        }
    }

    /// Step for a 1-based number within the user-facing range.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(WizardStep::SelectConsultation),
            2 => Some(WizardStep::SelectPractitioner),
            3 => Some(WizardStep::SelectDateTime),
            4 => Some(WizardStep::ConfirmDetails),
            _ => None,
        }
    }

    /// Next user-facing step, clamped at the review step.
    pub fn next(&self) -> Self {
        match self {
            WizardStep::SelectConsultation => WizardStep::SelectPractitioner,
            WizardStep::SelectPractitioner => WizardStep::SelectDateTime,
            _ => WizardStep::ConfirmDetails,
        }
    }

    /// Previous user-facing step, clamped at the first step.
    pub fn previous(&self) -> Self {
        match self {
            WizardStep::ConfirmDetails | WizardStep::Completed => WizardStep::SelectDateTime,
            WizardStep::SelectDateTime => WizardStep::SelectPractitioner,
            _ => WizardStep::SelectConsultation,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::SelectConsultation => "Choose Consultation",
            WizardStep::SelectPractitioner => "Choose Practitioner",
            WizardStep::SelectDateTime => "Choose Date & Time",
            WizardStep::ConfirmDetails => "Confirm Details",
            WizardStep::Completed => "Booking Confirmed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

/// Everything chosen so far in one wizard session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSelection {
    pub consultation_type: Option<ConsultationType>,
    pub practitioner: Option<Practitioner>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub format: ConsultationFormat,
    pub contact_form: ContactForm,
}

impl BookingSelection {
    /// Total cost of the current selection.
    pub fn total_cost(&self) -> Money {
        self.consultation_type
            .as_ref()
            .map(|c| c.standard_price)
            .unwrap_or(Money::ZERO)
    }

    /// Whether consultation, practitioner, date and time are all chosen.
    pub fn is_schedule_complete(&self) -> bool {
        self.consultation_type.is_some()
            && self.practitioner.is_some()
            && self.date.is_some()
            && self.time.is_some()
    }

    /// Drop the date and time (availability is practitioner-specific).
    pub fn clear_schedule(&mut self) {
        self.date = None;
        self.time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clamping() {
        assert_eq!(WizardStep::ConfirmDetails.next(), WizardStep::ConfirmDetails);
        assert_eq!(WizardStep::SelectConsultation.previous(), WizardStep::SelectConsultation);
        assert_eq!(WizardStep::SelectPractitioner.next(), WizardStep::SelectDateTime);
        assert_eq!(WizardStep::from_number(3), Some(WizardStep::SelectDateTime));
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(5), None);
    }

    #[test]
    fn test_format_defaults_to_in_person() {
        let selection = BookingSelection::default();
        assert_eq!(selection.format, ConsultationFormat::InPerson);
        assert_eq!(
            serde_json::to_string(&ConsultationFormat::Telemedicine).unwrap(),
            "\"telemedicine\""
        );
    }

    #[test]
    fn test_total_cost_follows_consultation() {
        let mut selection = BookingSelection::default();
        assert_eq!(selection.total_cost(), Money::ZERO);

        selection.consultation_type = Some(ConsultationType::new(
            "comprehensive".into(),
            "Comprehensive".into(),
            Money::from_dollars(250),
        ));
        assert_eq!(selection.total_cost(), Money::from_dollars(250));
    }

    #[test]
    fn test_contact_field_order_and_names() {
        let names: Vec<&str> = ContactField::REQUIRED.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["firstName", "lastName", "email", "phone"]);

        let form = ContactForm {
            first_name: " Jane ".into(),
            last_name: "Doe".into(),
            ..Default::default()
        };
        assert_eq!(form.full_name(), "Jane Doe");
        assert_eq!(form.field(ContactField::LastName), "Doe");
    }
}
