//! Outbound Credential Channel
//!
//! Shared handle carrying the current bearer token. Every request built by
//! [`ApiClient`](super::ApiClient) reads it, so pages authenticate without
//! knowing where the token came from.

use std::sync::{Arc, RwLock};

/// Process-wide bearer credential attached to outbound requests
#[derive(Clone, Default)]
pub struct CredentialChannel {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a token to all subsequent requests
    pub fn attach(&self, token: &str) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    /// Stop sending a credential
    pub fn detach(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Token currently attached, if any
    pub fn current(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_attached(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Add the `Authorization` header when a token is attached
    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.current() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl std::fmt::Debug for CredentialChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialChannel")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_detach() {
        let channel = CredentialChannel::new();
        assert!(!channel.is_attached());

        channel.attach("tok1");
        assert_eq!(channel.current().as_deref(), Some("tok1"));

        channel.detach();
        assert_eq!(channel.current(), None);
    }

    #[test]
    fn test_clones_share_token() {
        let channel = CredentialChannel::new();
        let page_view = channel.clone();

        channel.attach("tok2");
        assert_eq!(page_view.current().as_deref(), Some("tok2"));
    }

    #[test]
    fn test_debug_hides_token() {
        let channel = CredentialChannel::new();
        channel.attach("secret-token");
        let shown = format!("{:?}", channel);
        assert!(!shown.contains("secret-token"));
    }
}
