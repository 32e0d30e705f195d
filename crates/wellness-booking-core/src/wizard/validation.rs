//! Contact form validation.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{ContactField, ContactForm};

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Maximum address length accepted (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

/// Contact form validation failure. Names the first offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: ContactField },

    #[error("{field} is not a valid email address")]
    InvalidEmail { field: ContactField },
}

impl ValidationError {
    /// The field the user must fix.
    pub fn field(&self) -> ContactField {
        match self {
            ValidationError::Missing { field } | ValidationError::InvalidEmail { field } => *field,
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Syntactic email check.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.len() <= MAX_EMAIL_LEN && email_regex().is_some_and(|re| re.is_match(email))
}

/// Validate required fields in order (firstName, lastName, email, phone),
/// then the email format.
pub fn validate_contact_form(form: &ContactForm) -> Result<(), ValidationError> {
    if let Some(field) = ContactField::REQUIRED
        .into_iter()
        .find(|field| form.field(*field).trim().is_empty())
    {
        return Err(ValidationError::Missing { field });
    }

    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail {
            field: ContactField::Email,
        });
    }

    Ok(())
}
