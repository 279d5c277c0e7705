//! Route Guard
//!
//! Decides, per navigation, whether the current session phase allows a view
//! to render. Pure and stateless: re-run it on every navigation and every
//! phase change.

use crate::session::Phase;

/// Navigable views of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Landing,
    Login,
    Signup,
    Dashboard,
    Chat,
    Integrations,
    Settings,
}

/// Access class of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Always rendered
    Public,
    /// Only for signed-out users (login, signup)
    PreAuth,
    /// Only for signed-in users
    Protected,
}

/// Outcome of a guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Render,
    RedirectTo(View),
    /// Session not resolved yet; show a neutral indicator
    ShowLoading,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Landing,
        View::Login,
        View::Signup,
        View::Dashboard,
        View::Chat,
        View::Integrations,
        View::Settings,
    ];

    pub fn kind(self) -> ViewKind {
        match self {
            View::Landing => ViewKind::Public,
            View::Login | View::Signup => ViewKind::PreAuth,
            View::Dashboard | View::Chat | View::Integrations | View::Settings => {
                ViewKind::Protected
            }
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            View::Landing => "/",
            View::Login => "/login",
            View::Signup => "/signup",
            View::Dashboard => "/dashboard",
            View::Chat => "/chat",
            View::Integrations => "/integrations",
            View::Settings => "/settings",
        }
    }

    /// Resolve a path; `None` for unknown paths
    pub fn from_path(path: &str) -> Option<View> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        View::ALL.into_iter().find(|v| v.path() == normalized)
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Landing => "Datalyn",
            View::Login => "Log in",
            View::Signup => "Sign up",
            View::Dashboard => "Dashboard",
            View::Chat => "AI Analyst",
            View::Integrations => "Integrations",
            View::Settings => "Settings",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Gate a navigation to a view of the given kind
pub fn decide(phase: Phase, kind: ViewKind) -> Decision {
    match (kind, phase) {
        (ViewKind::Public, _) => Decision::Render,
        (_, Phase::Resolving) => Decision::ShowLoading,
        (ViewKind::Protected, Phase::Authenticated) => Decision::Render,
        (ViewKind::Protected, Phase::Anonymous) => Decision::RedirectTo(View::Login),
        (ViewKind::PreAuth, Phase::Authenticated) => Decision::RedirectTo(View::Dashboard),
        (ViewKind::PreAuth, Phase::Anonymous) => Decision::Render,
    }
}

/// Gate a navigation to a specific view
pub fn decide_view(phase: Phase, view: View) -> Decision {
    decide(phase, view.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_while_anonymous_redirects_to_login() {
        assert_eq!(
            decide(Phase::Anonymous, ViewKind::Protected),
            Decision::RedirectTo(View::Login)
        );
    }

    #[test]
    fn test_pre_auth_while_authenticated_redirects_to_dashboard() {
        assert_eq!(
            decide_view(Phase::Authenticated, View::Login),
            Decision::RedirectTo(View::Dashboard)
        );
        assert_eq!(
            decide_view(Phase::Authenticated, View::Signup),
            Decision::RedirectTo(View::Dashboard)
        );
    }

    #[test]
    fn test_resolving_shows_loading_for_gated_views() {
        for view in View::ALL {
            let expected = if view.kind() == ViewKind::Public {
                Decision::Render
            } else {
                Decision::ShowLoading
            };
            assert_eq!(decide_view(Phase::Resolving, view), expected, "{view}");
        }
    }

    #[test]
    fn test_full_table() {
        use Decision::*;

        let cases = [
            (Phase::Authenticated, ViewKind::Public, Render),
            (Phase::Anonymous, ViewKind::Public, Render),
            (Phase::Authenticated, ViewKind::Protected, Render),
            (Phase::Anonymous, ViewKind::PreAuth, Render),
        ];
        for (phase, kind, expected) in cases {
            assert_eq!(decide(phase, kind), expected, "{phase} {kind:?}");
        }
    }

    #[test]
    fn test_view_kinds() {
        assert_eq!(View::Landing.kind(), ViewKind::Public);
        assert_eq!(View::Signup.kind(), ViewKind::PreAuth);
        assert_eq!(View::Integrations.kind(), ViewKind::Protected);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(View::from_path("/"), Some(View::Landing));
        assert_eq!(View::from_path(""), Some(View::Landing));
        assert_eq!(View::from_path("/chat/"), Some(View::Chat));
        assert_eq!(View::from_path("/settings?tab=profile"), Some(View::Settings));
        assert_eq!(View::from_path("/admin"), None);

        for view in View::ALL {
            assert_eq!(View::from_path(view.path()), Some(view));
        }
    }
}
