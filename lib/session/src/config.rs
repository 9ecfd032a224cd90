//! Session configuration.
//!
//! Supplied once at startup and never mutated. Loaded via the `config`
//! crate from `AUTHSESSION_`-prefixed environment variables, or built in
//! code with the `with_*` methods.

use crate::policy::{LoginProbePolicy, RenewalPolicy};
use authsession_core::TokenRequest;
use serde::{Deserialize, Serialize};

/// How interactive steps are shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMode {
    /// Full-page navigation; the result arrives through the redirect callback.
    #[default]
    Redirect,
    /// A pop-up window; the result is returned to the caller.
    Popup,
}

/// Settings handed to the identity client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// The OAuth2 client (application) id.
    client_id: String,
    /// Authority used when a request does not name one.
    /// Default: "https://login.microsoftonline.com/common"
    #[serde(default = "default_authority")]
    authority: String,
    /// Where the provider sends the browser after login.
    #[serde(default)]
    redirect_uri: Option<String>,
    /// Where the provider sends the browser after logout.
    #[serde(default)]
    post_logout_redirect_uri: Option<String>,
}

fn default_authority() -> String {
    "https://login.microsoftonline.com/common".to_string()
}

impl IdentityConfig {
    /// Creates an identity configuration with the default authority.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authority: default_authority(),
            redirect_uri: None,
            post_logout_redirect_uri: None,
        }
    }

    /// Sets the default authority.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Sets the login redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Sets the post-logout redirect URI.
    #[must_use]
    pub fn with_post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uri = Some(uri.into());
        self
    }

    /// Returns the OAuth2 client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the default authority.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns the login redirect URI, if configured.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Returns the post-logout redirect URI, if configured.
    #[must_use]
    pub fn post_logout_redirect_uri(&self) -> Option<&str> {
        self.post_logout_redirect_uri.as_deref()
    }
}

/// Complete session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Identity client settings.
    identity: IdentityConfig,
    /// Pop-up or redirect for interactive steps.
    #[serde(default)]
    login_mode: LoginMode,
    /// Request merged under every `login` call.
    #[serde(default)]
    default_login: TokenRequest,
    /// Scopes checked by `is_logged_in` when the caller gives none,
    /// as a comma-separated string.
    /// Default: "User.Read"
    #[serde(default = "default_probe_scopes")]
    probe_scopes: String,
    /// Handling of `token_renewal_error` during `acquire_token`.
    #[serde(default)]
    renewal_policy: RenewalPolicy,
    /// Failure-to-boolean mapping for `is_logged_in`.
    #[serde(default)]
    login_probe: LoginProbePolicy,
}

const DEFAULT_PROBE_SCOPE: &str = "User.Read";

fn default_probe_scopes() -> String {
    DEFAULT_PROBE_SCOPE.to_string()
}

impl SessionConfig {
    /// Creates a session configuration with defaults for everything but the
    /// identity settings.
    #[must_use]
    pub fn new(identity: IdentityConfig) -> Self {
        Self {
            identity,
            login_mode: LoginMode::default(),
            default_login: TokenRequest::default(),
            probe_scopes: default_probe_scopes(),
            renewal_policy: RenewalPolicy::default(),
            login_probe: LoginProbePolicy::default(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Keys are prefixed with `AUTHSESSION_` and nested with `__`, e.g.
    /// `AUTHSESSION_IDENTITY__CLIENT_ID` or `AUTHSESSION_LOGIN_MODE=popup`.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Sets the login mode.
    #[must_use]
    pub fn with_login_mode(mut self, mode: LoginMode) -> Self {
        self.login_mode = mode;
        self
    }

    /// Sets the request merged under every login.
    #[must_use]
    pub fn with_default_login(mut self, request: TokenRequest) -> Self {
        self.default_login = request;
        self
    }

    /// Sets the scopes checked by `is_logged_in` when none are given.
    #[must_use]
    pub fn with_probe_scopes(mut self, scopes: Vec<String>) -> Self {
        self.probe_scopes = scopes.join(",");
        self
    }

    /// Sets the `token_renewal_error` policy.
    #[must_use]
    pub fn with_renewal_policy(mut self, policy: RenewalPolicy) -> Self {
        self.renewal_policy = policy;
        self
    }

    /// Sets the `is_logged_in` failure mapping.
    #[must_use]
    pub fn with_login_probe(mut self, policy: LoginProbePolicy) -> Self {
        self.login_probe = policy;
        self
    }

    /// Returns the identity client settings.
    #[must_use]
    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }

    /// Returns the login mode.
    #[must_use]
    pub fn login_mode(&self) -> LoginMode {
        self.login_mode
    }

    /// Returns the request merged under every login.
    #[must_use]
    pub fn default_login(&self) -> &TokenRequest {
        &self.default_login
    }

    /// Returns the default probe scopes, parsed from the comma-separated string.
    ///
    /// Never empty: a blank setting falls back to `User.Read`.
    #[must_use]
    pub fn probe_scopes(&self) -> Vec<&str> {
        let scopes: Vec<&str> = self
            .probe_scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if scopes.is_empty() {
            vec![DEFAULT_PROBE_SCOPE]
        } else {
            scopes
        }
    }

    /// Returns the `token_renewal_error` policy.
    #[must_use]
    pub fn renewal_policy(&self) -> RenewalPolicy {
        self.renewal_policy
    }

    /// Returns the `is_logged_in` failure mapping.
    #[must_use]
    pub fn login_probe(&self) -> LoginProbePolicy {
        self.login_probe
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("AUTHSESSION")
        .prefix_separator("_")
        .separator("__")
}
