//! Garde validation utilities.

use crate::domain::DomainError;
use ::garde::{Report, Validate};

/// Number of digits in an implanted chip identifier
pub const CHIP_ID_LENGTH: usize = 15;

/// Convert garde validation report to DomainError
pub fn validate_struct<T>(value: &T) -> Result<(), DomainError>
where
    T: Validate,
    T::Context: Default,
{
    value
        .validate()
        .map_err(|report| DomainError::ValidationError(format_validation_errors(&report)))
}

/// Garde custom rule: exactly fifteen ASCII digits
#[allow(clippy::ptr_arg)]
pub fn chip_id_rule(value: &String, _context: &()) -> ::garde::Result {
    if is_chip_id(value) {
        Ok(())
    } else {
        Err(::garde::Error::new("chip id must be exactly 15 digits"))
    }
}

pub fn is_chip_id(value: &str) -> bool {
    value.len() == CHIP_ID_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
}

/// Format validation errors from garde Report into a human-readable string
fn format_validation_errors(report: &Report) -> String {
    report
        .iter()
        .map(|(path, error)| {
            if path.to_string().is_empty() {
                error.message().to_string()
            } else {
                format!("{}: {}", path, error.message())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
