//! # Datalyn
//!
//! Client for the Datalyn AI business analyst: session handling, route
//! gating and typed access to the backend API.
//!
//! ## Modules
//!
//! - [`session`]: Session store with token persistence and hydration
//! - [`guard`]: Route guard deciding what each view may render
//! - [`api`]: HTTP client and DTOs for the backend
//! - [`app`]: Shell tying the three together
//! - [`render`]: Text rendering of views
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datalyn::{App, Config, View};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(&Config::load_default()?)?;
//!
//!     // Restore the previous session, if any
//!     app.start().await;
//!
//!     let route = app.navigate(View::Dashboard).await;
//!     if route.view == View::Dashboard {
//!         let metrics = app.dashboard().await?;
//!         print!("{}", datalyn::render::dashboard(&metrics));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod guard;
pub mod logging;
pub mod render;
pub mod session;

// Re-export top-level types for convenience
pub use api::{
    ApiClient, ApiError, ApiResult, ClientConfig, CredentialChannel, HttpIdentityService,
    IdentityService,
};

pub use app::{App, AppError, AppResult, Route, ToggledIntegration};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use guard::{decide, decide_view, Decision, View, ViewKind};

pub use session::{
    FileTokenStore, MemoryTokenStore, Phase, Session, SessionError, SessionResult, SessionStore,
    TokenStore, TokenStoreError,
};
