//! Field-level validation for entities in progress.
//!
//! # Responsibility
//! - Report one human-readable message per failing field.
//! - Decide whether an entity is savable before any store mutation.
//!
//! # Invariants
//! - `field_error` returns an empty string for valid or unchecked fields.
//! - Checks are purely local: no store access, no cross-entity rules.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PESEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{11}$").expect("valid pesel regex"));

const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// First failing field of an entity that is not savable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name as listed in `FieldValidator::FIELDS`.
    pub field: &'static str,
    /// Message shown next to the field.
    pub message: String,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid field `{}`: {}", self.field, self.message)
    }
}

impl Error for ValidationError {}

/// Per-field validation contract shared by all editable entities.
pub trait FieldValidator {
    /// Fields checked before a save, in form order.
    const FIELDS: &'static [&'static str];

    /// Returns an empty string when `field` is valid, or the message to show.
    fn field_error(&self, field: &str) -> String;

    /// Returns whether every checked field passes.
    fn is_savable(&self) -> bool {
        Self::FIELDS
            .iter()
            .all(|field| self.field_error(field).is_empty())
    }

    /// Returns the first failing field, if any.
    fn validate(&self) -> Result<(), ValidationError> {
        for &field in Self::FIELDS {
            let message = self.field_error(field);
            if !message.is_empty() {
                return Err(ValidationError { field, message });
            }
        }
        Ok(())
    }

    /// Collects every failing field with its message.
    fn field_errors(&self) -> Vec<ValidationError> {
        Self::FIELDS
            .iter()
            .filter_map(|&field| {
                let message = self.field_error(field);
                (!message.is_empty()).then_some(ValidationError { field, message })
            })
            .collect()
    }
}

/// Returns `message` when `value` is blank after trim.
pub(crate) fn required(value: &str, message: &str) -> String {
    if value.trim().is_empty() {
        message.to_string()
    } else {
        String::new()
    }
}

/// Checks a PESEL number: 11 digits with a valid weighted checksum.
pub fn is_valid_pesel(value: &str) -> bool {
    if !PESEL_RE.is_match(value) {
        return false;
    }

    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits
        .iter()
        .zip(PESEL_WEIGHTS.iter())
        .map(|(digit, weight)| digit * weight)
        .sum();
    let control = (10 - sum % 10) % 10;
    digits.get(10) == Some(&control)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_pesel, required};

    #[test]
    fn pesel_accepts_valid_checksum() {
        assert!(is_valid_pesel("87052212355"));
        assert!(is_valid_pesel("90010112349"));
    }

    #[test]
    fn pesel_rejects_bad_checksum_and_shape() {
        assert!(!is_valid_pesel("87052212356"));
        assert!(!is_valid_pesel("8705221235"));
        assert!(!is_valid_pesel("PESEL1"));
        assert!(!is_valid_pesel("8705221235a"));
        assert!(!is_valid_pesel("870522123555"));
    }

    #[test]
    fn required_treats_whitespace_as_empty() {
        assert_eq!(required("  ", "Name is Required"), "Name is Required");
        assert!(required("Anna", "Name is Required").is_empty());
    }
}
