//! Screen Routes
//!
//! The five screens, which of them need a session, and what the
//! navigation bar offers in each auth state.

use std::fmt;

use crate::session::SessionStore;

/// A top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Chat,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Chat,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Chat => "/chat",
        }
    }

    /// Match a browser path, ignoring a trailing slash
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Screens that render only for an authenticated session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Chat)
    }

    /// Screens that make no sense once logged in
    pub fn guest_only(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}

/// What the shell should do with a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Hydration has not finished; render a placeholder
    Loading,
    Render,
    Redirect(Route),
}

/// Decide access from the raw auth flags
pub fn access_for(route: Route, loading: bool, authenticated: bool) -> RouteAccess {
    if loading {
        return RouteAccess::Loading;
    }

    if route.requires_auth() && !authenticated {
        RouteAccess::Redirect(Route::Login)
    } else if route.guest_only() && authenticated {
        RouteAccess::Redirect(Route::Dashboard)
    } else {
        RouteAccess::Render
    }
}

/// Decide access for `route` given the current session
pub fn access(route: Route, session: &SessionStore) -> RouteAccess {
    access_for(route, session.is_loading(), session.is_authenticated())
}

/// An entry in the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Link { route: Route, label: &'static str },
    Logout,
}

/// Navigation entries for the current auth state
pub fn nav_items(authenticated: bool) -> Vec<NavItem> {
    if authenticated {
        vec![
            NavItem::Link {
                route: Route::Dashboard,
                label: "Dashboard",
            },
            NavItem::Link {
                route: Route::Chat,
                label: "Chat",
            },
            NavItem::Logout,
        ]
    } else {
        vec![
            NavItem::Link {
                route: Route::Register,
                label: "Register",
            },
            NavItem::Link {
                route: Route::Login,
                label: "Login",
            },
        ]
    }
}
