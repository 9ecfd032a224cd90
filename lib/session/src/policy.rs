//! Explicit handling choices for ambiguous failure categories.
//!
//! Both enums are part of [`SessionConfig`](crate::SessionConfig) so the
//! behavior is a configured, visible decision instead of an implicit
//! fallthrough.

use authsession_identity::{ErrorCode, IdentityError};
use serde::{Deserialize, Serialize};

/// What `acquire_token` does when silent acquisition fails with
/// `token_renewal_error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalPolicy {
    /// Treat the failure as transient and retry the silent call once.
    #[default]
    RetrySilent,
    /// Log in interactively, then retry the silent call once.
    LoginThenRetry,
    /// Surface the failure as fatal.
    Fail,
}

/// How `is_logged_in` maps silent-acquisition failures to a boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginProbePolicy {
    /// Any failure means "not logged in". Never errors.
    #[default]
    AnyFailureIsLoggedOut,
    /// Only `user_login_error` means "not logged in".
    ///
    /// `consent_required` and `token_renewal_error` mean a session exists but
    /// needs attention, so they report "logged in". Other categories are
    /// returned as errors.
    OnlyMissingUserIsLoggedOut,
}

/// Result of applying a [`LoginProbePolicy`] to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeVerdict {
    LoggedIn,
    LoggedOut,
    Propagate,
}

impl LoginProbePolicy {
    pub(crate) fn classify(self, error: &IdentityError) -> ProbeVerdict {
        match self {
            Self::AnyFailureIsLoggedOut => ProbeVerdict::LoggedOut,
            Self::OnlyMissingUserIsLoggedOut => match error.category() {
                ErrorCode::UserLogin => ProbeVerdict::LoggedOut,
                ErrorCode::ConsentRequired | ErrorCode::TokenRenewal => ProbeVerdict::LoggedIn,
                ErrorCode::Other(_) => ProbeVerdict::Propagate,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_failure_policy_never_propagates() {
        let policy = LoginProbePolicy::AnyFailureIsLoggedOut;
        for error in [
            IdentityError::user_login("no user"),
            IdentityError::consent_required("consent"),
            IdentityError::token_renewal("iframe timeout"),
            IdentityError::new("endpoints_resolution_error", "offline"),
        ] {
            assert_eq!(policy.classify(&error), ProbeVerdict::LoggedOut);
        }
    }

    #[test]
    fn missing_user_policy_distinguishes_categories() {
        let policy = LoginProbePolicy::OnlyMissingUserIsLoggedOut;
        assert_eq!(
            policy.classify(&IdentityError::user_login("no user")),
            ProbeVerdict::LoggedOut
        );
        assert_eq!(
            policy.classify(&IdentityError::consent_required("consent")),
            ProbeVerdict::LoggedIn
        );
        assert_eq!(
            policy.classify(&IdentityError::token_renewal("iframe timeout")),
            ProbeVerdict::LoggedIn
        );
        assert_eq!(
            policy.classify(&IdentityError::new("endpoints_resolution_error", "offline")),
            ProbeVerdict::Propagate
        );
    }

    #[test]
    fn missing_user_policy_classifies_known_codes_held_in_other() {
        let error = IdentityError {
            code: ErrorCode::Other("user_login_error".to_string()),
            message: "no user".to_string(),
        };
        assert_eq!(
            LoginProbePolicy::OnlyMissingUserIsLoggedOut.classify(&error),
            ProbeVerdict::LoggedOut
        );
    }

    #[test]
    fn defaults() {
        assert_eq!(RenewalPolicy::default(), RenewalPolicy::RetrySilent);
        assert_eq!(
            LoginProbePolicy::default(),
            LoginProbePolicy::AnyFailureIsLoggedOut
        );
    }

    #[test]
    fn policies_deserialize_from_snake_case() {
        let renewal: RenewalPolicy = serde_json::from_str("\"login_then_retry\"").expect("parse");
        assert_eq!(renewal, RenewalPolicy::LoginThenRetry);

        let probe: LoginProbePolicy =
            serde_json::from_str("\"only_missing_user_is_logged_out\"").expect("parse");
        assert_eq!(probe, LoginProbePolicy::OnlyMissingUserIsLoggedOut);
    }
}
