//! Session errors.
//!
//! Public operations return `Report<SessionError>`; inspect the category with
//! `report.current_context()`.

use authsession_identity::{ErrorCode, IdentityError};
use std::fmt;

/// Errors from session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Silent acquisition failed with a category the session does not recover from.
    SilentAcquisition { code: ErrorCode, message: String },
    /// An identity client call failed. The client's error is carried unchanged,
    /// including failures of the single retry after an escalation.
    Client(IdentityError),
    /// A token operation was called without any scopes.
    MissingScopes,
}

impl SessionError {
    /// Wraps a silent-acquisition failure as fatal.
    #[must_use]
    pub fn silent_acquisition(error: IdentityError) -> Self {
        Self::SilentAcquisition {
            code: error.code,
            message: error.message,
        }
    }

    /// Returns the identity client error code behind this error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Self::SilentAcquisition { code, .. } => Some(code),
            Self::Client(error) => Some(error.code()),
            Self::MissingScopes => None,
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SilentAcquisition { code, message } => {
                write!(f, "could not acquire token silently ({code}): {message}")
            }
            Self::Client(error) => write!(f, "identity client error: {error}"),
            Self::MissingScopes => write!(f, "token request has no scopes"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<IdentityError> for SessionError {
    fn from(error: IdentityError) -> Self {
        Self::Client(error)
    }
}
