//! Identity Service
//!
//! The three calls the session store depends on. Kept behind a trait so the
//! store can be driven by a scripted identity service in tests.

use async_trait::async_trait;

use super::client::ApiClient;
use super::dto::{AuthResponse, LoginRequest, SignupRequest, User};
use super::error::ApiResult;

/// Identity collaborator consumed by the session store
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolve a bearer token into the user it belongs to
    async fn whoami(&self, token: &str) -> ApiResult<User>;

    /// Exchange credentials for a token
    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse>;

    /// Create an account and sign it in
    async fn signup(&self, email: &str, password: &str, name: &str) -> ApiResult<AuthResponse>;
}

/// Identity service backed by the Datalyn REST API
///
/// - `GET /auth/me`
/// - `POST /auth/login`
/// - `POST /auth/signup`
#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    client: ApiClient,
}

impl HttpIdentityService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn whoami(&self, token: &str) -> ApiResult<User> {
        self.client.get_with_token("/auth/me", token).await
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        self.client
            .post("/auth/login", &LoginRequest { email, password })
            .await
    }

    async fn signup(&self, email: &str, password: &str, name: &str) -> ApiResult<AuthResponse> {
        self.client
            .post(
                "/auth/signup",
                &SignupRequest {
                    email,
                    password,
                    name,
                },
            )
            .await
    }
}
