//! Token and login request parameters.
//!
//! A [`TokenRequest`] is built per call and handed to the identity client
//! unchanged apart from merging with configured defaults. Nothing here is
//! persisted.

use crate::id::CorrelationId;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How the identity provider should treat an interactive request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// Force the user to enter credentials.
    Login,
    /// Show the account picker.
    SelectAccount,
    /// Show the consent dialog for the requested scopes.
    Consent,
    /// Never show UI; fail if interaction would be required.
    None,
}

impl Prompt {
    /// Returns the wire value sent to the provider.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SelectAccount => "select_account",
            Self::Consent => "consent",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a login or token acquisition.
///
/// Every field except `scopes` is optional. When a request is merged over a
/// default request, each field the caller set wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Scopes the token must carry.
    ///
    /// Accepts either a list or a comma-separated string when deserialized,
    /// so the same shape works from JSON and from environment variables.
    #[serde(default, deserialize_with = "deserialize_scopes")]
    pub scopes: Vec<String>,
    /// Additional scopes to consent to up front without putting them in the token.
    #[serde(default, deserialize_with = "deserialize_scopes")]
    pub extra_scopes_to_consent: Vec<String>,
    /// Interactive prompt behavior.
    #[serde(default)]
    pub prompt: Option<Prompt>,
    /// Authority (tenant endpoint) to request the token from.
    #[serde(default)]
    pub authority: Option<String>,
    /// Username hint for the sign-in page.
    #[serde(default)]
    pub login_hint: Option<String>,
    /// Home account id of a cached account to use.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Opaque value echoed back in the response.
    #[serde(default)]
    pub state: Option<String>,
    /// Correlation id forwarded to the provider.
    #[serde(default)]
    pub correlation_id: Option<CorrelationId>,
    /// Skip the token cache and always go to the provider.
    #[serde(default)]
    pub force_refresh: bool,
    /// Redirect URI override for this request.
    #[serde(default)]
    pub redirect_uri: Option<String>,
    /// Extra query parameters appended to the authorize request.
    #[serde(default)]
    pub extra_query_parameters: BTreeMap<String, String>,
}

impl TokenRequest {
    /// Creates a request for the given scopes.
    #[must_use]
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::default();
        for scope in scopes {
            request = request.with_scope(scope);
        }
        request
    }

    /// Adds a scope, ignoring duplicates.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        if !self.scopes.contains(&scope) {
            self.scopes.push(scope);
        }
        self
    }

    /// Adds a scope to consent to without requesting it in the token.
    #[must_use]
    pub fn with_extra_scope_to_consent(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        if !self.extra_scopes_to_consent.contains(&scope) {
            self.extra_scopes_to_consent.push(scope);
        }
        self
    }

    /// Sets the prompt behavior.
    #[must_use]
    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Sets the authority.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Sets the login hint.
    #[must_use]
    pub fn with_login_hint(mut self, hint: impl Into<String>) -> Self {
        self.login_hint = Some(hint.into());
        self
    }

    /// Sets the cached account to use.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Sets the state echoed back in the response.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, id: CorrelationId) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Bypasses cached tokens on silent acquisition.
    #[must_use]
    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    /// Sets the redirect URI override.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Adds an extra query parameter.
    #[must_use]
    pub fn with_extra_query_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra_query_parameters.insert(key.into(), value.into());
        self
    }

    /// Returns the authority, filling in `default` when none was set.
    #[must_use]
    pub fn with_default_authority(mut self, default: &str) -> Self {
        if self.authority.is_none() {
            self.authority = Some(default.to_string());
        }
        self
    }

    /// Returns the correlation id, generating and storing one if missing.
    pub fn ensure_correlation_id(&mut self) -> CorrelationId {
        *self.correlation_id.get_or_insert_with(CorrelationId::new)
    }

    /// Layers this request over `defaults`.
    ///
    /// Fields set on `self` win. A non-empty scope list replaces the default
    /// list entirely. Extra query parameters are unioned, with keys from
    /// `self` overriding those from `defaults`.
    #[must_use]
    pub fn merged_over(self, defaults: &TokenRequest) -> TokenRequest {
        let mut extra_query_parameters = defaults.extra_query_parameters.clone();
        extra_query_parameters.extend(self.extra_query_parameters);

        TokenRequest {
            scopes: if self.scopes.is_empty() {
                defaults.scopes.clone()
            } else {
                self.scopes
            },
            extra_scopes_to_consent: if self.extra_scopes_to_consent.is_empty() {
                defaults.extra_scopes_to_consent.clone()
            } else {
                self.extra_scopes_to_consent
            },
            prompt: self.prompt.or(defaults.prompt),
            authority: self.authority.or_else(|| defaults.authority.clone()),
            login_hint: self.login_hint.or_else(|| defaults.login_hint.clone()),
            account_id: self.account_id.or_else(|| defaults.account_id.clone()),
            state: self.state.or_else(|| defaults.state.clone()),
            correlation_id: self.correlation_id.or(defaults.correlation_id),
            force_refresh: self.force_refresh || defaults.force_refresh,
            redirect_uri: self.redirect_uri.or_else(|| defaults.redirect_uri.clone()),
            extra_query_parameters,
        }
    }

    /// Returns the scopes joined with spaces, as sent on the wire.
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScopeList {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_scopes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let scopes = match ScopeList::deserialize(deserializer)? {
        ScopeList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        ScopeList::List(list) => list,
    };
    Ok(scopes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_deduplicates_scopes() {
        let request = TokenRequest::new(["User.Read", "openid", "User.Read"]);
        assert_eq!(request.scopes, vec!["User.Read", "openid"]);
    }

    #[test]
    fn merge_prefers_caller_fields() {
        let defaults = TokenRequest::new(["openid", "profile"])
            .with_prompt(Prompt::SelectAccount)
            .with_login_hint("default@example.com")
            .with_extra_query_parameter("domain_hint", "organizations")
            .with_extra_query_parameter("ui_locales", "en");

        let merged = TokenRequest::new(["Mail.Read"])
            .with_login_hint("alice@example.com")
            .with_extra_query_parameter("ui_locales", "de")
            .merged_over(&defaults);

        assert_eq!(merged.scopes, vec!["Mail.Read"]);
        assert_eq!(merged.prompt, Some(Prompt::SelectAccount));
        assert!(!merged.force_refresh);
        assert_eq!(merged.login_hint.as_deref(), Some("alice@example.com"));
        assert_eq!(
            merged.extra_query_parameters.get("domain_hint").map(String::as_str),
            Some("organizations")
        );
        assert_eq!(
            merged.extra_query_parameters.get("ui_locales").map(String::as_str),
            Some("de")
        );
    }

    #[test]
    fn merge_keeps_default_scopes_when_caller_has_none() {
        let defaults = TokenRequest::new(["openid", "profile"]);
        let merged = TokenRequest::default().merged_over(&defaults);
        assert_eq!(merged.scopes, vec!["openid", "profile"]);
    }

    #[test]
    fn default_authority_only_fills_gaps() {
        let filled =
            TokenRequest::new(["openid"]).with_default_authority("https://login.example/common");
        assert_eq!(
            filled.authority.as_deref(),
            Some("https://login.example/common")
        );

        let kept = TokenRequest::new(["openid"])
            .with_authority("https://login.example/tenant")
            .with_default_authority("https://login.example/common");
        assert_eq!(
            kept.authority.as_deref(),
            Some("https://login.example/tenant")
        );
    }

    #[test]
    fn ensure_correlation_id_is_stable() {
        let mut request = TokenRequest::new(["openid"]);
        let first = request.ensure_correlation_id();
        let second = request.ensure_correlation_id();
        assert_eq!(first, second);
        assert_eq!(request.correlation_id, Some(first));
    }

    #[test]
    fn scopes_deserialize_from_comma_separated_string() {
        let json = r#"{ "scopes": "openid, profile,User.Read", "prompt": "select_account" }"#;
        let request: TokenRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(request.scopes, vec!["openid", "profile", "User.Read"]);
        assert_eq!(request.prompt, Some(Prompt::SelectAccount));
    }

    #[test]
    fn scopes_deserialize_from_list() {
        let json = r#"{ "scopes": ["openid", "email"] }"#;
        let request: TokenRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(request.scopes, vec!["openid", "email"]);
        assert!(request.extra_scopes_to_consent.is_empty());
    }

    #[test]
    fn prompt_wire_values() {
        assert_eq!(Prompt::Consent.as_str(), "consent");
        assert_eq!(Prompt::SelectAccount.to_string(), "select_account");
        let json = serde_json::to_string(&Prompt::None).expect("serialize");
        assert_eq!(json, "\"none\"");
    }
}
