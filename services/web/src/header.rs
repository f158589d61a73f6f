//! Header navigation reflecting the session

use serde::Serialize;

use crate::models::SessionContext;
use crate::navigation::Route;

pub const BRAND: &str = "Bloggy";

/// A link in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub to: &'static str,
}

impl NavLink {
    fn new(label: &'static str, route: Route) -> Self {
        Self {
            label,
            to: route.path(),
        }
    }
}

/// Header contents for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderNav {
    pub brand: NavLink,
    pub signed_in: bool,
    pub links: Vec<NavLink>,
}

/// Build the header for the given session
pub fn header_nav(session: &SessionContext) -> HeaderNav {
    let links = if session.is_signed_in() {
        vec![NavLink::new("Log out", Route::Logout)]
    } else {
        vec![
            NavLink::new("Login", Route::Login),
            NavLink::new("Register", Route::Register),
        ]
    };

    HeaderNav {
        brand: NavLink::new(BRAND, Route::Home),
        signed_in: session.is_signed_in(),
        links,
    }
}
