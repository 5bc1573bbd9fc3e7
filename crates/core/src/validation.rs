//! Invitation form validation
//!
//! These are the rules the manager's form enforces before it calls
//! [`InvitationRepository::create`](crate::repository::InvitationRepository::create).
//! The repository itself only guards entity invariants.

use std::fmt;

use crate::models::InvitationDetails;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Check every field and report all failures at once
pub fn validate_details(details: &InvitationDetails) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut check = |ok: bool, field: &'static str, message: &'static str| {
        if !ok {
            errors.push(FieldError { field, message });
        }
    };

    check(
        min_chars(&details.visitor_full_name, 2),
        "visitorFullName",
        "Visitor full name must be at least 2 characters",
    );
    check(
        min_chars(&details.visitor_title, 2),
        "visitorTitle",
        "Visitor title must be at least 2 characters",
    );
    check(
        min_chars(&details.reason_for_visit, 5),
        "reasonForVisit",
        "Reason for visit must be at least 5 characters",
    );
    check(
        details.floor_number >= 1,
        "floorNumber",
        "Floor number must be at least 1",
    );
    check(
        min_chars(&details.office_number, 1),
        "officeNumber",
        "Office number is required",
    );
    check(
        min_chars(&details.inviting_directorate, 2),
        "invitingDirectorate",
        "Directorate name must be at least 2 characters",
    );

    if let Some(email) = details.visitor_email.as_deref() {
        check(is_valid_email(email), "visitorEmail", "Email address is invalid");
    }
    if let Some(phone) = details.visitor_phone.as_deref() {
        check(is_valid_phone(phone), "visitorPhone", "Phone number is invalid");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`. The domain
/// needs a `.` with something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .match_indices('.')
        .any(|(i, _)| i > 0 && i + 1 < domain.len())
}

/// Saudi mobile number: optional `+966` or `0`, then `5` and eight digits.
/// Whitespace is ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let rest = compact
        .strip_prefix("+966")
        .or_else(|| compact.strip_prefix('0'))
        .unwrap_or(&compact);

    rest.len() == 9 && rest.starts_with('5') && rest.chars().all(|c| c.is_ascii_digit())
}
