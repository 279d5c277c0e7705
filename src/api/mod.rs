//! Datalyn API Client
//!
//! HTTP access to the Datalyn backend, built on reqwest.
//!
//! # Endpoints
//!
//! ## Identity
//! - `GET /api/auth/me` - Resolve the bearer token into a user
//! - `POST /api/auth/login` - Exchange credentials for a token
//! - `POST /api/auth/signup` - Create an account
//!
//! ## Dashboard
//! - `GET /api/dashboard/metrics` - Headline metrics and anomalies
//!
//! ## Chat (AI analyst)
//! - `POST /api/chat/message` - Ask a question
//! - `GET /api/chat/history/:session_id` - Conversation history
//! - `GET /api/chat/sessions` - Recent conversations
//!
//! ## Settings
//! - `GET /api/settings` - Account settings
//! - `PUT /api/settings` - Update settings
//!
//! ## Integrations
//! - `GET /api/integrations` - List data sources
//! - `POST /api/integrations/:id/toggle` - Toggle a data source
//!
//! # Example
//!
//! ```rust,no_run
//! use datalyn::api::{ApiClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::new("http://localhost:8001/api"))?;
//!     client.credentials().attach("token-from-login");
//!
//!     let metrics = client.dashboard_metrics().await?;
//!     println!("MRR: {}", metrics.mrr);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod dto;
pub mod endpoints;
pub mod error;
pub mod identity;

pub use client::{ApiClient, ClientConfig};
pub use credentials::CredentialChannel;
pub use error::{ApiError, ApiResult};
pub use identity::{HttpIdentityService, IdentityService};
