//! Client routes and the authentication guard.

use std::fmt;
use std::sync::Mutex;

use crate::traits::Navigator;
use crate::types::TaskId;

/// A view of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    TaskDetail(TaskId),
    Login,
    Register,
    Settings,
}

impl Route {
    /// Returns the route name.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::TaskDetail(_) => "task-detail",
            Route::Login => "login",
            Route::Register => "register",
            Route::Settings => "settings",
        }
    }

    /// Returns the route path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::TaskDetail(id) => format!("/task/{}", id),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Settings => "/settings".to_string(),
        }
    }

    /// Returns true if the route is reachable without signing in.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolve where a navigation to `target` actually lands.
///
/// Unauthenticated users are sent to [`Route::Login`] from every route that
/// is not public.
pub fn guard(target: Route, authenticated: bool) -> Route {
    if !target.is_public() && !authenticated {
        Route::Login
    } else {
        target
    }
}

/// A [`Navigator`] that records every route it is sent to.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded routes, oldest first.
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    /// Returns the most recent route, if any.
    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}
