//! Results returned by the identity client.
//!
//! The session layer never inspects or rewrites these; they are handed back
//! to the caller exactly as the client produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable account identifier across tenants.
    pub home_account_id: String,
    /// Sign-in name (usually an email address).
    pub username: String,
    /// Display name, if the provider returned one.
    pub name: Option<String>,
    /// Tenant the account signed in to.
    pub tenant_id: Option<String>,
}

impl Account {
    /// Creates an account with the required fields.
    #[must_use]
    pub fn new(home_account_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            home_account_id: home_account_id.into(),
            username: username.into(),
            name: None,
            tenant_id: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the tenant id.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

/// Successful result of a login or token acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer access token.
    pub access_token: String,
    /// Raw ID token, when the request included `openid`.
    pub id_token: Option<String>,
    /// Token type, normally `Bearer`.
    pub token_type: String,
    /// Scopes actually granted.
    pub scopes: Vec<String>,
    /// When the access token expires.
    pub expires_on: Option<DateTime<Utc>>,
    /// The account the token was issued for.
    pub account: Option<Account>,
    /// State echoed back from the request.
    pub state: Option<String>,
}

impl AuthResponse {
    /// Creates a bearer response carrying only an access token.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            id_token: None,
            token_type: "Bearer".to_string(),
            scopes: Vec::new(),
            expires_on: None,
            account: None,
            state: None,
        }
    }

    /// Sets the granted scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the expiry.
    #[must_use]
    pub fn with_expires_on(mut self, expires_on: DateTime<Utc>) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    /// Sets the account.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// Returns true if the token carries an expiry that has already passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_on.is_some_and(|expires| expires <= Utc::now())
    }
}
