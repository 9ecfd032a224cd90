//! Identity client errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure category reported by the identity client.
///
/// Only the first three categories are recoverable by the session layer.
/// Everything else is carried verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// No signed-in user; recoverable by logging in.
    UserLogin,
    /// The user has not consented to the requested scopes.
    ConsentRequired,
    /// The hidden renewal of a cached token failed.
    TokenRenewal,
    /// Any other provider or client error code.
    Other(String),
}

impl ErrorCode {
    /// Returns the wire error code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::UserLogin => "user_login_error",
            Self::ConsentRequired => "consent_required",
            Self::TokenRenewal => "token_renewal_error",
            Self::Other(code) => code,
        }
    }

    /// Classifies a raw error code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "user_login_error" => Self::UserLogin,
            "consent_required" => Self::ConsentRequired,
            "token_renewal_error" => Self::TokenRenewal,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

/// An error returned by an identity client operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityError {
    /// Failure category.
    pub code: ErrorCode,
    /// Human-readable description from the provider.
    pub message: String,
}

impl IdentityError {
    /// Creates an error from a raw code and message.
    #[must_use]
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_code(code),
            message: message.into(),
        }
    }

    /// No signed-in user.
    #[must_use]
    pub fn user_login(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::UserLogin,
            message: message.into(),
        }
    }

    /// Consent missing for the requested scopes.
    #[must_use]
    pub fn consent_required(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ConsentRequired,
            message: message.into(),
        }
    }

    /// Hidden token renewal failed.
    #[must_use]
    pub fn token_renewal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::TokenRenewal,
            message: message.into(),
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Returns the failure category with known codes classified.
    ///
    /// `Other("consent_required")` and `ConsentRequired` are the same
    /// category; branch on this rather than on the raw `code` field.
    #[must_use]
    pub fn category(&self) -> ErrorCode {
        ErrorCode::from_code(self.code.as_str())
    }

    /// Returns true if the failure is `consent_required`.
    #[must_use]
    pub fn is_consent_required(&self) -> bool {
        self.category() == ErrorCode::ConsentRequired
    }
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for IdentityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_classified() {
        assert_eq!(ErrorCode::from_code("user_login_error"), ErrorCode::UserLogin);
        assert_eq!(
            ErrorCode::from_code("consent_required"),
            ErrorCode::ConsentRequired
        );
        assert_eq!(
            ErrorCode::from_code("token_renewal_error"),
            ErrorCode::TokenRenewal
        );
    }

    #[test]
    fn unknown_codes_are_kept_verbatim() {
        let code = ErrorCode::from_code("endpoints_resolution_error");
        assert_eq!(code, ErrorCode::Other("endpoints_resolution_error".to_string()));
        assert_eq!(code.as_str(), "endpoints_resolution_error");
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = IdentityError::consent_required("AADSTS65001: consent missing");
        let text = err.to_string();
        assert!(text.starts_with("consent_required"));
        assert!(text.contains("AADSTS65001"));
        assert!(err.is_consent_required());
    }

    #[test]
    fn category_classifies_known_codes_held_in_other() {
        let err = IdentityError {
            code: ErrorCode::Other("consent_required".to_string()),
            message: "built by hand".to_string(),
        };
        assert_eq!(err.category(), ErrorCode::ConsentRequired);
        assert!(err.is_consent_required());

        let unknown = IdentityError::new("popup_window_error", "blocked");
        assert_eq!(
            unknown.category(),
            ErrorCode::Other("popup_window_error".to_string())
        );
    }

    #[test]
    fn code_serializes_as_wire_string() {
        let err = IdentityError::new("popup_window_error", "popup blocked");
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["code"], "popup_window_error");

        let parsed: IdentityError = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed.code, ErrorCode::Other("popup_window_error".to_string()));
    }
}
