//! Request-field validation.
//!
//! Applied at the API boundary before any service call runs. Lengths are
//! counted in characters, on the trimmed value, matching the database
//! CHECK constraints (the services trim before persisting).

use thiserror::Error;

/// Maximum length of a list or task name.
pub const NAME_MAX: usize = 80;

/// Maximum length of a list or task description.
pub const DESCRIPTION_MAX: usize = 250;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be blank")]
    NameBlank,

    #[error("name must be at most {NAME_MAX} characters")]
    NameTooLong,

    #[error("description must be at most {DESCRIPTION_MAX} characters")]
    DescriptionTooLong,
}

/// Check a required name: non-blank after trimming, within length.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameBlank);
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Check an optional description length.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}
