//! # Session Module
//!
//! Owns the signed-in session of the keepItFit client: the bearer token, the
//! cached user profile and the start-up `is_loading` flag.
//!
//! ## Overview
//!
//! - [`TokenStore`] persists the token in the platform secure store.
//! - [`SessionManager`] restores the session at start-up, signs in with a
//!   token from `/auth/login` or `/auth/register`, signs out, and keeps the
//!   shared [`ApiClient`](core_api::ApiClient)'s `Authorization` header in
//!   step with the session.
//!
//! Every state transition is broadcast as a
//! [`CoreEvent::Auth`](core_runtime::events::CoreEvent::Auth) event.

pub mod error;
pub mod manager;
pub mod token_store;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::SessionManager;
pub use token_store::TokenStore;
pub use types::{AuthStatus, Session};
