//! Session state

use core_api::types::UserProfile;
use serde::Serialize;
use std::fmt;

/// Coarse session state for routing between the auth and app screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// Start-up restore has not finished
    Loading,
    SignedOut,
    SignedIn,
}

/// Snapshot of the session.
///
/// `user` is only ever set together with `token`, after a successful
/// profile fetch. The token is redacted from `Debug` output.
#[derive(Clone, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_loading: bool,
}

impl Session {
    /// State at process start, before the stored token has been looked at.
    pub fn loading() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true,
        }
    }

    pub(crate) fn signed_in(token: String, user: UserProfile, is_loading: bool) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
            is_loading,
        }
    }

    pub(crate) fn signed_out(is_loading: bool) -> Self {
        Self {
            token: None,
            user: None,
            is_loading,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn status(&self) -> AuthStatus {
        if self.is_loading {
            AuthStatus::Loading
        } else if self.is_signed_in() {
            AuthStatus::SignedIn
        } else {
            AuthStatus::SignedOut
        }
    }

    /// Backend id of the signed-in user
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().and_then(|user| user.id)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}
