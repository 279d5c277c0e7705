//! Session Management
//!
//! Client-side authentication state: who is signed in, with which token,
//! and whether that token has been validated yet.
//!
//! ## Architecture
//!
//! - **Session**: the state itself, a sum type so a user can never exist
//!   without a token
//! - **SessionStore**: the single writer; hydrates from the persisted
//!   token and handles login, signup and logout
//! - **TokenStore**: the durable slot holding the token between runs
//!
//! ## Lifecycle
//!
//! 1. `initialize()` reads the persisted token
//! 2. With a token the session is `Resolving` until `whoami` answers
//! 3. It settles to `Authenticated` or, on any failure, `Anonymous`
//! 4. `login`/`signup` move to `Authenticated`, `logout` to `Anonymous`

mod error;
mod persist;
mod store;

pub use error::{SessionError, SessionResult, TokenStoreError};
pub use persist::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use store::SessionStore;

use crate::api::dto::User;

/// Coarse session phase, as seen by the route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Resolving,
    Authenticated,
    Anonymous,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Resolving => "resolving",
            Phase::Authenticated => "authenticated",
            Phase::Anonymous => "anonymous",
        };
        f.write_str(s)
    }
}

/// Authentication state of the running client
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// A persisted token is being validated
    Resolving { token: String },
    /// Validated token and the user it belongs to
    Authenticated { token: String, user: User },
    /// No token
    #[default]
    Anonymous,
}

impl Session {
    pub fn phase(&self) -> Phase {
        match self {
            Session::Resolving { .. } => Phase::Resolving,
            Session::Authenticated { .. } => Phase::Authenticated,
            Session::Anonymous => Phase::Anonymous,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Resolving { token } | Session::Authenticated { token, .. } => Some(token),
            Session::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Whether validation is still in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Resolving { .. })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }
}
