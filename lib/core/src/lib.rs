//! Core value types shared by the authsession crates.
//!
//! This crate provides the request and response records that flow between
//! the session manager and an external identity client, plus the
//! correlation ids attached to each call.

pub mod id;
pub mod request;
pub mod response;

pub use id::{CorrelationId, ParseIdError};
pub use request::{Prompt, TokenRequest};
pub use response::{Account, AuthResponse};
