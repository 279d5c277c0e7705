//! Page Endpoints
//!
//! One file per backend resource, each adding calls to [`ApiClient`].
//! All of them authenticate through the client's credential channel.
//!
//! [`ApiClient`]: super::ApiClient

pub mod chat;
pub mod dashboard;
pub mod integrations;
pub mod settings;
