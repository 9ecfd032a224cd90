//! Identity client capability interface.
//!
//! Implementations wrap a concrete identity library. The session manager
//! holds exactly one implementation for its whole lifetime and never mutates
//! it, so implementations must be safe to call concurrently through `&self`.

use crate::error::IdentityError;
use async_trait::async_trait;
use authsession_core::{AuthResponse, TokenRequest};
use std::sync::Arc;

/// Outcome delivered to the redirect callback after a redirect round trip.
pub type RedirectResult = Result<AuthResponse, IdentityError>;

/// Handler invoked by the identity client when the host returns from a
/// redirect-based login or acquisition.
pub type RedirectCallback = Arc<dyn Fn(RedirectResult) + Send + Sync>;

/// Capabilities the session layer needs from an external identity library.
///
/// The redirect variants start a full-page navigation. Once they return
/// `Ok(())` the host is leaving; the result arrives later through the
/// callback registered with [`handle_redirect_callback`].
///
/// [`handle_redirect_callback`]: IdentityClient::handle_redirect_callback
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Acquires a token from the cache or by hidden renewal, without UI.
    ///
    /// # Errors
    ///
    /// Returns an error categorized as `user_login_error`, `consent_required`,
    /// `token_renewal_error`, or any other provider code.
    async fn acquire_token_silent(
        &self,
        request: &TokenRequest,
    ) -> Result<AuthResponse, IdentityError>;

    /// Signs the user in through a pop-up window.
    ///
    /// # Errors
    ///
    /// Returns an error if the pop-up is blocked, closed, or the provider rejects the login.
    async fn login_popup(&self, request: &TokenRequest) -> Result<AuthResponse, IdentityError>;

    /// Starts a full-page redirect login.
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation could not be started.
    async fn login_redirect(&self, request: &TokenRequest) -> Result<(), IdentityError>;

    /// Acquires a token through a pop-up window.
    ///
    /// # Errors
    ///
    /// Returns an error if the pop-up is blocked, closed, or the provider rejects the request.
    async fn acquire_token_popup(
        &self,
        request: &TokenRequest,
    ) -> Result<AuthResponse, IdentityError>;

    /// Starts a full-page redirect token acquisition.
    ///
    /// # Errors
    ///
    /// Returns an error if the navigation could not be started.
    async fn acquire_token_redirect(&self, request: &TokenRequest) -> Result<(), IdentityError>;

    /// Signs the user out and clears the client's cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the client could not start the logout.
    async fn logout(&self) -> Result<(), IdentityError>;

    /// Registers the handler for redirect round-trip results.
    fn handle_redirect_callback(&self, callback: RedirectCallback);
}
