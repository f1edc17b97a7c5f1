use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {message}")]
    InvalidName { message: String },

    #[error("Already exists: {message}")]
    AlreadyExists { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Deliberately carries no detail: unknown domain, wrong secret and
    /// malformed credentials must be indistinguishable.
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Unavailable: {message}")]
    Unavailable { message: String },

    #[error("Cancelled: {message}")]
    Cancelled { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Only transient store or randomness failures may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
