//! Route table and the session guard for protected routes.
//!
//! The guard only checks that a token is present. Expired tokens are
//! discovered when a later API call fails; nothing here re-authenticates.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Register,
    Dashboard,
    Assessment,
    Recommendations,
}

impl AppRoute {
    pub const ALL: [Self; 5] = [Self::Login, Self::Register, Self::Dashboard, Self::Assessment, Self::Recommendations];

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Assessment => "/assessment",
            Self::Recommendations => "/recommendations",
        }
    }

    /// Resolve a navigation path. The root path lands on the login screen.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Some(Self::Login);
        }
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    pub fn requires_session(self) -> bool {
        matches!(self, Self::Dashboard | Self::Assessment | Self::Recommendations)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Admit,
    Redirect(AppRoute),
}

/// Admit public routes always and protected routes when a token is present.
pub fn guard(route: AppRoute, token: Option<&str>) -> GuardDecision {
    if !route.requires_session() || token.is_some() {
        GuardDecision::Admit
    } else {
        GuardDecision::Redirect(AppRoute::Login)
    }
}
