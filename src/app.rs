//! Application Shell
//!
//! Wires the session store, route guard and API client together. Views are
//! reached through [`App::navigate`], which applies the guard and follows
//! redirects; page data is loaded through the methods below, which map
//! failures to the message shown to the user.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::api::dto::{
    ChatMessage, ChatReply, ChatSession, DashboardMetrics, Integration, Settings, SettingsUpdate,
    User,
};
use crate::api::{ApiClient, ApiError, CredentialChannel, HttpIdentityService};
use crate::config::Config;
use crate::guard::{decide_view, Decision, View};
use crate::session::{FileTokenStore, SessionError, SessionStore};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Errors surfaced by the shell
#[derive(Error, Debug)]
pub enum AppError {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// Login or signup failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A page failed to load or save its data
    #[error("{message}")]
    Page {
        message: &'static str,
        #[source]
        source: ApiError,
    },

    /// Client could not be constructed
    #[error("Client setup failed: {0}")]
    Setup(#[from] ApiError),
}

impl AppError {
    fn page(message: &'static str) -> impl FnOnce(ApiError) -> AppError {
        move |source| AppError::Page { message, source }
    }

    /// A page call was refused because the credential is no longer valid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Page { source, .. } if source.is_unauthorized())
    }
}

/// Result type for shell operations
pub type AppResult<T> = Result<T, AppError>;

/// Where a navigation ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// View that was asked for
    pub requested: View,
    /// View that the guard allowed to render
    pub view: View,
}

impl Route {
    pub fn redirected(&self) -> bool {
        self.requested != self.view
    }
}

/// An integration after a toggle, with the backend's acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct ToggledIntegration {
    #[serde(flatten)]
    pub integration: Integration,
    pub message: String,
}

/// The running client
pub struct App {
    session: Arc<SessionStore>,
    api: ApiClient,
}

impl App {
    /// Build the client from configuration: one credential channel shared by
    /// the session store and every page call
    pub fn new(config: &Config) -> AppResult<Self> {
        let credentials = CredentialChannel::new();
        let api = ApiClient::with_credentials(config.api.client_config(), credentials.clone())?;
        let identity = Arc::new(HttpIdentityService::new(api.clone()));
        let tokens = Arc::new(FileTokenStore::new(config.session.token_file.clone()));
        let session = Arc::new(SessionStore::new(identity, tokens, credentials));

        Ok(Self { session, api })
    }

    /// Assemble from existing parts. `api` and `session` should share a
    /// credential channel.
    pub fn from_parts(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { session, api }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Hydrate the session; call once at startup
    pub async fn start(&self) {
        self.session.initialize().await;
    }

    /// Apply the route guard, waiting out `Resolving` and following
    /// redirects until a view may render
    pub async fn navigate(&self, requested: View) -> Route {
        let mut target = requested;

        loop {
            let phase = self.session.current().phase();
            match decide_view(phase, target) {
                Decision::Render => {
                    return Route {
                        requested,
                        view: target,
                    }
                }
                Decision::RedirectTo(next) => {
                    tracing::debug!(from = %target, to = %next, %phase, "Redirecting");
                    target = next;
                }
                Decision::ShowLoading => {
                    tracing::debug!(view = %target, "Waiting for session to resolve");
                    self.session.resolved().await;
                }
            }
        }
    }

    /// Navigate by path. `None` for paths that name no view; those are
    /// not gated.
    pub async fn open(&self, path: &str) -> Option<Route> {
        match View::from_path(path) {
            Some(view) => Some(self.navigate(view).await),
            None => {
                tracing::debug!(path, "No view for path");
                None
            }
        }
    }

    /// Currently signed-in user
    pub fn user(&self) -> Option<User> {
        self.session.current().user().cloned()
    }

    // ============================================
    // Auth pages
    // ============================================

    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        Ok(self.session.login(email.trim(), password).await?)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        validate_signup(name, email, password)?;
        Ok(self
            .session
            .signup(email.trim(), password, name.trim())
            .await?)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    // ============================================
    // Protected pages
    // ============================================

    pub async fn dashboard(&self) -> AppResult<DashboardMetrics> {
        self.api
            .dashboard_metrics()
            .await
            .map_err(AppError::page("Failed to load metrics"))
    }

    /// Ask the analyst; `session_id` continues an earlier conversation
    pub async fn ask(&self, message: &str, session_id: Option<&str>) -> AppResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }

        self.api
            .send_chat_message(message, session_id)
            .await
            .map_err(AppError::page("Failed to send message"))
    }

    pub async fn chat_history(&self, session_id: &str) -> AppResult<Vec<ChatMessage>> {
        self.api
            .chat_history(session_id)
            .await
            .map_err(AppError::page("Failed to load conversation"))
    }

    pub async fn chat_sessions(&self) -> AppResult<Vec<ChatSession>> {
        self.api
            .chat_sessions()
            .await
            .map_err(AppError::page("Failed to load conversations"))
    }

    pub async fn integrations(&self) -> AppResult<Vec<Integration>> {
        self.api
            .integrations()
            .await
            .map_err(AppError::page("Failed to load integrations"))
    }

    /// Flip an integration; returns it with its new state
    pub async fn toggle_integration(&self, integration_id: &str) -> AppResult<ToggledIntegration> {
        let mut integration = self
            .integrations()
            .await?
            .into_iter()
            .find(|i| i.id == integration_id)
            .ok_or_else(|| {
                AppError::Validation(format!("Unknown integration: {}", integration_id))
            })?;

        let response = self
            .api
            .toggle_integration(&integration.id)
            .await
            .map_err(AppError::page("Failed to update integration"))?;

        integration.connected = !integration.connected;
        if response.connected != integration.connected {
            tracing::warn!(
                integration = %integration.id,
                reported = response.connected,
                "Backend reports a different connection state"
            );
        }
        tracing::info!(
            integration = %integration.id,
            connected = integration.connected,
            message = %response.message,
            "Integration updated"
        );

        Ok(ToggledIntegration {
            integration,
            message: response.message,
        })
    }

    pub async fn settings(&self) -> AppResult<Settings> {
        self.api
            .settings()
            .await
            .map_err(AppError::page("Failed to load settings"))
    }

    pub async fn update_settings(&self, update: &SettingsUpdate) -> AppResult<String> {
        if update.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        self.api
            .update_settings(update)
            .await
            .map(|r| r.message)
            .map_err(AppError::page("Failed to save settings"))
    }
}

/// Checks applied before a signup request is sent
pub fn validate_signup(name: &str, email: &str, password: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::AuthResponse;
    use crate::api::{ApiResult, ClientConfig, IdentityService};
    use crate::session::MemoryTokenStore;
    use async_trait::async_trait;

    struct FixedIdentity;

    #[async_trait]
    impl IdentityService for FixedIdentity {
        async fn whoami(&self, token: &str) -> ApiResult<User> {
            if token == "good" {
                Ok(user())
            } else {
                Err(ApiError::Status {
                    status: 401,
                    message: "Token expired".to_string(),
                })
            }
        }

        async fn login(&self, _email: &str, _password: &str) -> ApiResult<AuthResponse> {
            Ok(AuthResponse {
                token: "good".to_string(),
                user: user(),
            })
        }

        async fn signup(&self, _: &str, _: &str, _: &str) -> ApiResult<AuthResponse> {
            Err(ApiError::Unavailable)
        }
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn app_with(tokens: MemoryTokenStore) -> App {
        let credentials = CredentialChannel::new();
        let api = ApiClient::with_credentials(ClientConfig::default(), credentials.clone()).unwrap();
        let session = Arc::new(SessionStore::new(
            Arc::new(FixedIdentity),
            Arc::new(tokens),
            credentials,
        ));
        App::from_parts(api, session)
    }

    #[tokio::test]
    async fn test_protected_view_redirects_when_anonymous() {
        let app = app_with(MemoryTokenStore::new());
        app.start().await;

        let route = app.navigate(View::Dashboard).await;
        assert_eq!(route.view, View::Login);
        assert!(route.redirected());
    }

    #[tokio::test]
    async fn test_login_view_redirects_when_authenticated() {
        let app = app_with(MemoryTokenStore::with_token("good"));
        app.start().await;

        let route = app.navigate(View::Signup).await;
        assert_eq!(route.view, View::Dashboard);
        assert_eq!(app.user(), Some(user()));
    }

    #[tokio::test]
    async fn test_landing_renders_for_everyone() {
        let app = app_with(MemoryTokenStore::with_token("stale"));
        app.start().await;

        let route = app.navigate(View::Landing).await;
        assert_eq!(route.view, View::Landing);
        assert!(!route.redirected());
    }

    #[tokio::test]
    async fn test_navigation_follows_login() {
        let app = app_with(MemoryTokenStore::new());
        app.start().await;
        assert_eq!(app.navigate(View::Chat).await.view, View::Login);

        app.login("ada@example.com", "secret").await.unwrap();
        assert_eq!(app.navigate(View::Chat).await.view, View::Chat);
        assert_eq!(app.api().credentials().current().as_deref(), Some("good"));

        app.logout().await;
        assert_eq!(app.navigate(View::Chat).await.view, View::Login);
    }

    #[tokio::test]
    async fn test_short_password_rejected_before_request() {
        let app = app_with(MemoryTokenStore::new());
        let err = app.signup("Ada", "ada@example.com", "12345").await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn test_signup_error_is_surfaced() {
        let app = app_with(MemoryTokenStore::new());
        let err = app
            .signup("Ada", "ada@example.com", "123456")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Session(SessionError::Identity(ApiError::Unavailable))
        ));
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected() {
        let app = app_with(MemoryTokenStore::new());
        assert!(matches!(
            app.ask("   ", None).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            app.update_settings(&SettingsUpdate::default()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_open_by_path() {
        let app = app_with(MemoryTokenStore::new());
        app.start().await;

        let route = app.open("/settings?tab=profile").await.unwrap();
        assert_eq!(route.requested, View::Settings);
        assert_eq!(route.view, View::Login);

        assert_eq!(app.open("/").await.map(|r| r.view), Some(View::Landing));
        assert_eq!(app.open("/admin").await, None);
    }

    #[test]
    fn test_unauthorized_page_error() {
        let expired = AppError::page("Failed to load metrics")(ApiError::Status {
            status: 401,
            message: "Token expired".to_string(),
        });
        assert!(expired.is_unauthorized());
        assert_eq!(expired.to_string(), "Failed to load metrics");

        let down = AppError::page("Failed to load metrics")(ApiError::Unavailable);
        assert!(!down.is_unauthorized());
        assert!(!AppError::Validation("x".to_string()).is_unauthorized());
    }

    #[test]
    fn test_validate_signup() {
        assert!(validate_signup("Ada", "ada@example.com", "secret").is_ok());
        assert!(validate_signup(" ", "ada@example.com", "secret").is_err());
        assert!(validate_signup("Ada", "not-an-email", "secret").is_err());
    }
}
