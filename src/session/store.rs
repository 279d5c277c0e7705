//! Session Store
//!
//! Single source of truth for "who is logged in" and the only writer of the
//! persisted token. Consumers read through [`SessionStore::current`] or a
//! watch subscription; only the methods here change the state.
//!
//! Mutations are serialized by an async mutex guarding a generation
//! counter. The mutex is never held across a network call. Hydration tags
//! its `whoami` call with the generation it started under and drops the
//! answer if the generation moved on meanwhile (logout, login, or another
//! hydration), so a late response can never resurrect an old session.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use super::error::SessionResult;
use super::persist::TokenStore;
use super::Session;
use crate::api::dto::{AuthResponse, User};
use crate::api::{CredentialChannel, IdentityService};

/// Owns the process-wide session
pub struct SessionStore {
    identity: Arc<dyn IdentityService>,
    tokens: Arc<dyn TokenStore>,
    credentials: CredentialChannel,
    state: watch::Sender<Session>,
    generation: Mutex<u64>,
}

impl SessionStore {
    /// Create a store in the `Anonymous` phase; call
    /// [`initialize`](Self::initialize) before gating any navigation
    pub fn new(
        identity: Arc<dyn IdentityService>,
        tokens: Arc<dyn TokenStore>,
        credentials: CredentialChannel,
    ) -> Self {
        let (state, _) = watch::channel(Session::Anonymous);

        Self {
            identity,
            tokens,
            credentials,
            state,
            generation: Mutex::new(0),
        }
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// The credential channel this store keeps in sync
    pub fn credentials(&self) -> &CredentialChannel {
        &self.credentials
    }

    /// Wait until the session leaves `Resolving` and return it
    pub async fn resolved(&self) -> Session {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let session = match rx.wait_for(|s| !s.is_loading()).await {
            Ok(session) => session.clone(),
            Err(_) => self.current(),
        };
        session
    }

    /// Hydrate from the persisted token.
    ///
    /// Never fails: an unreadable, rejected or unverifiable token is treated
    /// exactly like no token.
    pub async fn initialize(&self) {
        let (token, generation) = {
            let mut generation = self.generation.lock().await;
            *generation += 1;

            let token = match self.tokens.load().await {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(error = %e, "Persisted session unreadable, starting anonymous");
                    self.reset(&mut generation).await;
                    return;
                }
            };

            match token {
                None => {
                    tracing::debug!("No persisted session");
                    self.credentials.detach();
                    self.publish(Session::Anonymous);
                    return;
                }
                Some(token) => {
                    self.credentials.attach(&token);
                    self.publish(Session::Resolving {
                        token: token.clone(),
                    });
                    (token, *generation)
                }
            }
        };

        let result = self.identity.whoami(&token).await;

        let mut current = self.generation.lock().await;
        if *current != generation {
            tracing::debug!(
                started = generation,
                current = *current,
                "Dropping stale session validation"
            );
            return;
        }

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.publish(Session::Authenticated { token, user });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session validation failed, signing out");
                self.reset(&mut current).await;
            }
        }
    }

    /// Sign in with email and password.
    ///
    /// On failure the identity service's error is returned unchanged and the
    /// session is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> SessionResult<User> {
        let auth = self.identity.login(email, password).await?;
        self.establish(auth).await
    }

    /// Create an account and sign in with it. Same contract as
    /// [`login`](Self::login).
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> SessionResult<User> {
        let auth = self.identity.signup(email, password, name).await?;
        self.establish(auth).await
    }

    /// Sign out. Idempotent; persistence failures are logged, not returned.
    pub async fn logout(&self) {
        let mut generation = self.generation.lock().await;
        self.reset(&mut generation).await;
        tracing::info!("Signed out");
    }

    async fn establish(&self, auth: AuthResponse) -> SessionResult<User> {
        let mut generation = self.generation.lock().await;

        // Nothing changes if the save fails
        self.tokens.save(&auth.token).await?;

        *generation += 1;
        self.credentials.attach(&auth.token);
        self.publish(Session::Authenticated {
            token: auth.token,
            user: auth.user.clone(),
        });

        tracing::info!(user_id = %auth.user.id, "Signed in");
        Ok(auth.user)
    }

    /// Move to `Anonymous`. Caller holds the generation lock.
    async fn reset(&self, generation: &mut u64) {
        *generation += 1;

        if let Err(e) = self.tokens.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }

        self.credentials.detach();
        self.publish(Session::Anonymous);
    }

    fn publish(&self, session: Session) {
        tracing::debug!(phase = %session.phase(), "Session transition");
        self.state.send_replace(session);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("phase", &self.state.borrow().phase())
            .finish()
    }
}
