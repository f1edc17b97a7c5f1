//! Domain name normalization and validation

use thiserror::Error;

/// Errors that can occur during domain name validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainNameValidationError {
    #[error("domain name cannot be empty")]
    Empty,

    #[error("domain name exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("domain name must have at least two labels")]
    SingleLabel,

    #[error("domain name contains an empty label")]
    EmptyLabel,

    #[error("label '{0}' exceeds maximum length of {1} characters")]
    LabelTooLong(String, usize),

    #[error("label '{0}' must start and end with a letter or number")]
    LabelHyphenEdge(String),

    #[error("domain name contains invalid character: '{0}'. Only letters, digits, hyphens and dots are allowed")]
    InvalidCharacter(char),

    #[error("top-level label '{0}' cannot be all-numeric")]
    NumericTld(String),
}

const MAX_DOMAIN_NAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Normalize a domain name: trim whitespace, drop a single trailing dot,
/// lowercase ASCII.
pub fn normalize_domain_name(name: &str) -> String {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    trimmed.to_ascii_lowercase()
}

/// Validate an already-normalized domain name
///
/// Rules:
/// - 1 to 253 characters, at least two dot-separated labels
/// - Labels are 1 to 63 characters of `a-z`, `0-9` and `-`
/// - Labels neither start nor end with a hyphen
/// - The top-level label is not all-numeric
pub fn validate_domain_name(name: &str) -> Result<(), DomainNameValidationError> {
    if name.is_empty() {
        return Err(DomainNameValidationError::Empty);
    }

    if name.len() > MAX_DOMAIN_NAME_LENGTH {
        return Err(DomainNameValidationError::TooLong(MAX_DOMAIN_NAME_LENGTH));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
    {
        return Err(DomainNameValidationError::InvalidCharacter(c));
    }

    let labels: Vec<&str> = name.split('.').collect();

    if labels.len() < 2 {
        return Err(DomainNameValidationError::SingleLabel);
    }

    for label in &labels {
        if label.is_empty() {
            return Err(DomainNameValidationError::EmptyLabel);
        }

        if label.len() > MAX_LABEL_LENGTH {
            return Err(DomainNameValidationError::LabelTooLong(
                label.to_string(),
                MAX_LABEL_LENGTH,
            ));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainNameValidationError::LabelHyphenEdge(label.to_string()));
        }
    }

    let tld = labels[labels.len() - 1];

    if tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainNameValidationError::NumericTld(tld.to_string()));
    }

    Ok(())
}
