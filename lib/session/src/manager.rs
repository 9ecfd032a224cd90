//! The session manager: one owned identity client plus the fallback policy.

use crate::config::{LoginMode, SessionConfig};
use crate::error::SessionError;
use crate::policy::{ProbeVerdict, RenewalPolicy};
use authsession_core::{AuthResponse, Prompt, TokenRequest};
use authsession_identity::{ErrorCode, IdentityClient, RedirectCallback, RedirectResult};
use rootcause::prelude::Report;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of an operation that may need user interaction.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The operation finished with a result.
    Completed(AuthResponse),
    /// A redirect flow was started and the host is navigating away.
    ///
    /// No result will be produced by this call. It is delivered to the
    /// redirect callback once the round trip completes.
    Redirecting,
}

impl Interaction {
    /// Returns the result, or `None` if a redirect was started.
    #[must_use]
    pub fn into_response(self) -> Option<AuthResponse> {
        match self {
            Self::Completed(response) => Some(response),
            Self::Redirecting => None,
        }
    }

    /// Returns a reference to the result, if there is one.
    #[must_use]
    pub fn response(&self) -> Option<&AuthResponse> {
        match self {
            Self::Completed(response) => Some(response),
            Self::Redirecting => None,
        }
    }

    /// Returns true if a redirect was started.
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        matches!(self, Self::Redirecting)
    }
}

/// Explicit authentication session handle.
///
/// Owns the identity client for its whole lifetime. Cloning is cheap and all
/// clones share the same client and configuration. Calls are independent:
/// concurrent acquisitions are neither locked nor coalesced.
pub struct SessionManager<C: ?Sized> {
    client: Arc<C>,
    config: Arc<SessionConfig>,
}

// Manual Clone: avoid derive adding a `C: Clone` bound.
impl<C: ?Sized> Clone for SessionManager<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: IdentityClient> SessionManager<C> {
    /// Creates a session that takes ownership of `client`.
    ///
    /// Registers a redirect callback that logs the outcome of redirect flows.
    #[must_use]
    pub fn new(client: C, config: SessionConfig) -> Self {
        Self::from_shared(Arc::new(client), config)
    }
}

impl<C: IdentityClient + ?Sized> SessionManager<C> {
    /// Creates a session around an already shared client.
    ///
    /// Registers a redirect callback that logs the outcome of redirect flows.
    #[must_use]
    pub fn from_shared(client: Arc<C>, config: SessionConfig) -> Self {
        Self::with_redirect_handler(client, config, Arc::new(log_redirect_result))
    }

    /// Creates a session and registers `handler` for redirect results.
    ///
    /// The handler is registered exactly once, here.
    #[must_use]
    pub fn with_redirect_handler(
        client: Arc<C>,
        config: SessionConfig,
        handler: RedirectCallback,
    ) -> Self {
        client.handle_redirect_callback(handler);
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the identity client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Signs the user in.
    ///
    /// `request` is merged over the configured default login request, then
    /// sent through a pop-up or a redirect depending on the login mode.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Client`] if the identity client fails.
    #[instrument(
        skip(self, request),
        fields(mode = ?self.config.login_mode(), correlation_id = tracing::field::Empty)
    )]
    pub async fn login(
        &self,
        request: Option<TokenRequest>,
    ) -> Result<Interaction, Report<SessionError>> {
        let mut request = request
            .unwrap_or_default()
            .merged_over(self.config.default_login());
        record_correlation_id(&mut request);

        self.interactive_login(&request).await
    }

    /// Signs the user out. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Client`] if the identity client fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), Report<SessionError>> {
        self.client.logout().await.map_err(SessionError::Client)?;
        info!("logged out");
        Ok(())
    }

    /// Acquires a token, falling back to interaction when needed.
    ///
    /// Silent acquisition is tried first, with the configured authority
    /// filled in when `request` has none. On failure:
    /// - `user_login_error`: log in, then retry silently once
    /// - `consent_required`: interactive acquisition with `prompt=consent`
    /// - `token_renewal_error`: per the configured [`RenewalPolicy`]
    /// - anything else: fatal
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingScopes`] for a request without scopes,
    /// [`SessionError::SilentAcquisition`] for an unrecoverable category, and
    /// [`SessionError::Client`] when an escalation step or the retry fails.
    #[instrument(
        skip(self, request),
        fields(mode = ?self.config.login_mode(), correlation_id = tracing::field::Empty)
    )]
    pub async fn acquire_token(
        &self,
        request: TokenRequest,
    ) -> Result<Interaction, Report<SessionError>> {
        if request.scopes.is_empty() {
            return Err(SessionError::MissingScopes.into());
        }
        let mut request = request.with_default_authority(self.config.identity().authority());
        record_correlation_id(&mut request);

        debug!(scopes = %request.scope_string(), "attempting silent token acquisition");
        let failure = match self.client.acquire_token_silent(&request).await {
            Ok(response) => return Ok(Interaction::Completed(response)),
            Err(failure) => failure,
        };

        match failure.category() {
            ErrorCode::UserLogin => {
                warn!(code = %failure.code, "no signed-in user, escalating to login");
                self.login_then_retry(&request).await
            }
            ErrorCode::ConsentRequired => {
                warn!(code = %failure.code, "consent required, escalating to interactive acquisition");
                self.interactive_acquire(&request.with_prompt(Prompt::Consent))
                    .await
            }
            ErrorCode::TokenRenewal => match self.config.renewal_policy() {
                RenewalPolicy::RetrySilent => {
                    debug!(code = %failure.code, "token renewal failed, retrying silently");
                    self.retry_silent(&request).await
                }
                RenewalPolicy::LoginThenRetry => {
                    warn!(code = %failure.code, "token renewal failed, escalating to login");
                    self.login_then_retry(&request).await
                }
                RenewalPolicy::Fail => {
                    error!(code = %failure.code, error = %failure.message, "token renewal failed");
                    Err(SessionError::silent_acquisition(failure).into())
                }
            },
            ErrorCode::Other(_) => {
                error!(code = %failure.code, error = %failure.message, "could not acquire token silently");
                Err(SessionError::silent_acquisition(failure).into())
            }
        }
    }

    /// Returns whether a user is signed in.
    ///
    /// Probes with `scopes`, or with the configured probe scopes when `scopes`
    /// is `None` or empty. Failures are mapped by the configured
    /// [`LoginProbePolicy`](crate::LoginProbePolicy).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SilentAcquisition`] only when the policy says a
    /// failure category must not be read as a boolean.
    #[instrument(skip(self), fields(correlation_id = tracing::field::Empty))]
    pub async fn is_logged_in(
        &self,
        scopes: Option<Vec<String>>,
    ) -> Result<bool, Report<SessionError>> {
        let mut request = match scopes {
            Some(scopes) if !scopes.is_empty() => TokenRequest::new(scopes),
            _ => TokenRequest::new(self.config.probe_scopes()),
        }
        .with_default_authority(self.config.identity().authority());
        record_correlation_id(&mut request);

        let failure = match self.client.acquire_token_silent(&request).await {
            Ok(_) => return Ok(true),
            Err(failure) => failure,
        };

        match self.config.login_probe().classify(&failure) {
            ProbeVerdict::LoggedIn => {
                debug!(code = %failure.code, "session present but needs attention");
                Ok(true)
            }
            ProbeVerdict::LoggedOut => {
                debug!(code = %failure.code, "not logged in");
                Ok(false)
            }
            ProbeVerdict::Propagate => Err(SessionError::silent_acquisition(failure).into()),
        }
    }

    /// Returns whether the user has consented to `scopes`.
    ///
    /// The silent request carries the scopes and nothing else, so no
    /// authority or correlation id is attached.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingScopes`] for an empty scope list and
    /// [`SessionError::SilentAcquisition`] for any failure other than
    /// `consent_required`.
    #[instrument(skip(self))]
    pub async fn has_given_consent(
        &self,
        scopes: Vec<String>,
    ) -> Result<bool, Report<SessionError>> {
        if scopes.is_empty() {
            return Err(SessionError::MissingScopes.into());
        }

        match self
            .client
            .acquire_token_silent(&TokenRequest::new(scopes))
            .await
        {
            Ok(_) => Ok(true),
            Err(failure) if failure.is_consent_required() => Ok(false),
            Err(failure) => Err(SessionError::silent_acquisition(failure).into()),
        }
    }

    /// Asks the user to consent to `scopes` interactively.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingScopes`] for an empty scope list and
    /// [`SessionError::Client`] if the identity client fails.
    #[instrument(
        skip(self),
        fields(mode = ?self.config.login_mode(), correlation_id = tracing::field::Empty)
    )]
    pub async fn give_consent(
        &self,
        scopes: Vec<String>,
    ) -> Result<Interaction, Report<SessionError>> {
        if scopes.is_empty() {
            return Err(SessionError::MissingScopes.into());
        }

        let mut request = TokenRequest::new(scopes).with_prompt(Prompt::Consent);
        record_correlation_id(&mut request);
        self.interactive_acquire(&request).await
    }

    async fn interactive_login(
        &self,
        request: &TokenRequest,
    ) -> Result<Interaction, Report<SessionError>> {
        match self.config.login_mode() {
            LoginMode::Popup => {
                let response = self
                    .client
                    .login_popup(request)
                    .await
                    .map_err(SessionError::Client)?;
                Ok(Interaction::Completed(response))
            }
            LoginMode::Redirect => {
                self.client
                    .login_redirect(request)
                    .await
                    .map_err(SessionError::Client)?;
                info!("redirecting for login");
                Ok(Interaction::Redirecting)
            }
        }
    }

    async fn interactive_acquire(
        &self,
        request: &TokenRequest,
    ) -> Result<Interaction, Report<SessionError>> {
        match self.config.login_mode() {
            LoginMode::Popup => {
                let response = self
                    .client
                    .acquire_token_popup(request)
                    .await
                    .map_err(SessionError::Client)?;
                Ok(Interaction::Completed(response))
            }
            LoginMode::Redirect => {
                self.client
                    .acquire_token_redirect(request)
                    .await
                    .map_err(SessionError::Client)?;
                info!("redirecting for token acquisition");
                Ok(Interaction::Redirecting)
            }
        }
    }

    /// Logs in with `request` layered over the login defaults, then retries
    /// the silent call once. A started redirect ends the call instead.
    async fn login_then_retry(
        &self,
        request: &TokenRequest,
    ) -> Result<Interaction, Report<SessionError>> {
        let login_request = request.clone().merged_over(self.config.default_login());
        if self.interactive_login(&login_request).await?.is_redirecting() {
            return Ok(Interaction::Redirecting);
        }
        self.retry_silent(request).await
    }

    async fn retry_silent(
        &self,
        request: &TokenRequest,
    ) -> Result<Interaction, Report<SessionError>> {
        let response = self
            .client
            .acquire_token_silent(request)
            .await
            .map_err(SessionError::Client)?;
        Ok(Interaction::Completed(response))
    }
}

fn record_correlation_id(request: &mut TokenRequest) {
    let correlation_id = request.ensure_correlation_id();
    tracing::Span::current().record("correlation_id", tracing::field::display(correlation_id));
}

fn log_redirect_result(result: RedirectResult) {
    match result {
        Ok(response) => {
            let username = response.account.as_ref().map(|a| a.username.as_str());
            info!(account = ?username, "redirect flow completed");
        }
        Err(failure) => {
            error!(code = %failure.code, error = %failure.message, "redirect flow failed");
        }
    }
}
