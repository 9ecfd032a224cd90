//! Authentication session handle for applications that delegate OAuth2 /
//! OpenID Connect to an external identity client.
//!
//! This crate provides:
//! - [`SessionManager`]: login, logout, token acquisition with interactive
//!   fallback, and login/consent probes
//! - [`SessionConfig`]: immutable startup configuration, loadable from the
//!   environment
//! - [`RenewalPolicy`] and [`LoginProbePolicy`]: the explicit choices for
//!   how ambiguous failure categories are handled
//!
//! # Fallback Policy
//!
//! `acquire_token` always tries the silent path first. Depending on the
//! failure category it then logs in and retries once, asks for consent
//! interactively, or fails:
//!
//! | category | action |
//! |---|---|
//! | `user_login_error` | login, then one silent retry |
//! | `consent_required` | interactive acquisition with `prompt=consent` |
//! | `token_renewal_error` | per [`RenewalPolicy`] |
//! | anything else | [`SessionError::SilentAcquisition`] |
//!
//! In redirect mode an interactive step navigates the host away, so the call
//! ends with [`Interaction::Redirecting`] and the result arrives through the
//! redirect callback registered at construction.
//!
//! # Example
//!
//! ```ignore
//! use authsession_session::{IdentityConfig, LoginMode, SessionConfig, SessionManager};
//! use authsession_core::TokenRequest;
//!
//! let config = SessionConfig::new(IdentityConfig::new("my-client-id"))
//!     .with_login_mode(LoginMode::Popup);
//! let session = SessionManager::new(my_identity_client, config);
//!
//! let token = session
//!     .acquire_token(TokenRequest::new(["User.Read"]))
//!     .await?
//!     .into_response();
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod policy;

pub use config::{IdentityConfig, LoginMode, SessionConfig};
pub use error::SessionError;
pub use manager::{Interaction, SessionManager};
pub use policy::{LoginProbePolicy, RenewalPolicy};
