//! Running booking summary shown beside the wizard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BookingSelection, Money};

/// Placeholder for fields not chosen yet.
pub const NOT_SELECTED: &str = "Not selected";

/// Long date form used in summaries and confirmations.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Read-only projection of a [`BookingSelection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub consultation: Option<String>,
    pub duration: Option<String>,
    pub practitioner: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub format: String,
    pub total_cost: Money,
}

impl BookingSummary {
    pub fn from_selection(selection: &BookingSelection) -> Self {
        Self {
            consultation: selection.consultation_type.as_ref().map(|c| c.name.clone()),
            duration: selection
                .consultation_type
                .as_ref()
                .map(|c| c.duration_range.clone()),
            practitioner: selection.practitioner.as_ref().map(|p| p.name.clone()),
            date: selection.date.map(format_long_date),
            time: selection.time.map(|t| t.to_string()),
            format: selection.format.display_name().to_string(),
            total_cost: selection.total_cost(),
        }
    }

    /// Label/value rows with placeholders for unset fields.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let or_placeholder = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_SELECTED.into());
        vec![
            ("Consultation", or_placeholder(&self.consultation)),
            ("Practitioner", or_placeholder(&self.practitioner)),
            ("Date", or_placeholder(&self.date)),
            ("Time", or_placeholder(&self.time)),
            ("Format", self.format.clone()),
            ("Total", self.total_cost.to_string()),
        ]
    }
}
