//! The identity client contract consumed by the session manager.
//!
//! An identity client is the external library that actually speaks OAuth2 /
//! OpenID Connect: it owns the token cache, opens pop-ups, and navigates the
//! host for redirects. This crate only describes what the session layer needs
//! from it:
//! - [`IdentityClient`]: silent and interactive acquisition, login, logout,
//!   and redirect-callback registration
//! - [`IdentityError`] and [`ErrorCode`]: the failure taxonomy the fallback
//!   policy switches on

pub mod client;
pub mod error;

pub use client::{IdentityClient, RedirectCallback, RedirectResult};
pub use error::{ErrorCode, IdentityError};
