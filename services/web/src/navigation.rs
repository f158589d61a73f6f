//! Client routes and navigation

use serde::Serialize;

/// Fixed client routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    Home,
    Login,
    Register,
    Logout,
    NotFound,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Logout => "/logout",
            Route::NotFound => "/not-found",
        }
    }
}

/// Something that can move the client to another route
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Navigator that remembers where it was sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    pub visited: Vec<Route>,
}

impl RecordingNavigator {
    pub fn last(&self) -> Option<Route> {
        self.visited.last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, route: Route) {
        self.visited.push(route);
    }
}
