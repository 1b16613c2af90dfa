//! Person validation
//!
//! These rules are the single authority for what a storable contact looks
//! like. Entity construction, full replacement and partial patches all go
//! through them.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during person validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersonValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Name must be at least {0} characters long")]
    NameTooShort(usize),

    #[error("Number is required")]
    EmptyNumber,

    #[error("Please enter a valid 10-digit US phone number (e.g. (212) 555-1234)")]
    InvalidNumber,

    #[error("Invalid person ID")]
    InvalidId,
}

pub const MIN_NAME_LENGTH: usize = 3;

// Optional +1 / -1 country code, area code with or without parentheses,
// groups separated by '-', '.', whitespace or nothing. Area code and exchange
// may not start with 0 or 1.
static NANP_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\+1\s?|-1\s?)?(?:\([2-9][0-9]{2}\)|[2-9][0-9]{2})(?:[-.\s]?[2-9][0-9]{2})(?:[-.\s]?[0-9]{4})$",
    )
    .expect("phone number pattern is valid")
});

/// True when the trimmed name has at least [`MIN_NAME_LENGTH`] characters
pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_NAME_LENGTH
}

/// True when the number is a North American (NANP) phone number
pub fn is_valid_phone_number(number: &str) -> bool {
    NANP_PHONE_RE.is_match(number)
}

/// Validate a person name
pub fn validate_person_name(name: &str) -> Result<(), PersonValidationError> {
    if name.trim().is_empty() {
        return Err(PersonValidationError::EmptyName);
    }

    if !is_valid_name(name) {
        return Err(PersonValidationError::NameTooShort(MIN_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_person_number(number: &str) -> Result<(), PersonValidationError> {
    if number.trim().is_empty() {
        return Err(PersonValidationError::EmptyNumber);
    }

    if !is_valid_phone_number(number) {
        return Err(PersonValidationError::InvalidNumber);
    }

    Ok(())
}
