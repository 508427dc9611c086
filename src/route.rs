//! Application routes and the auth gate in front of them.

use crate::location::{ListLocation, INVOICES_PATH};
use crate::session::Session;
use std::fmt;

/// Path of the sign-in screen, the only public route.
pub const LOGIN_PATH: &str = "/login";
/// Path of the overview page; unknown paths land here.
pub const DASHBOARD_PATH: &str = "/";

/// A navigable screen.
///
/// ```
/// use invoice_kit::route::Route;
///
/// let route = Route::parse("/invoices/abc/edit").unwrap();
/// assert_eq!(route, Route::EditInvoice { id: "abc".to_string() });
/// assert_eq!(Route::parse("/invoices?page=2").unwrap().path(), "/invoices?page=2");
/// assert!(Route::parse("/nowhere").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Invoices(ListLocation),
    CreateInvoice,
    EditInvoice { id: String },
}

impl Route {
    /// Match a path (optionally with a query string). `None` if unknown.
    pub fn parse(path: &str) -> Option<Route> {
        let (path, search) = path.split_once('?').unwrap_or((path, ""));
        let path = match path.trim_end_matches('/') {
            "" => DASHBOARD_PATH,
            trimmed => trimmed,
        };

        if path == DASHBOARD_PATH {
            return Some(Route::Dashboard);
        }
        if path == LOGIN_PATH {
            return Some(Route::Login);
        }

        let rest = path.strip_prefix(INVOICES_PATH)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        let segments: Vec<&str> = rest.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Some(Route::Invoices(ListLocation::parse(search))),
            ["create"] => Some(Route::CreateInvoice),
            [id, "edit"] if !id.is_empty() => Some(Route::EditInvoice { id: id.to_string() }),
            _ => None,
        }
    }

    /// Path for this route, including the list's query string.
    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Dashboard => DASHBOARD_PATH.to_string(),
            Route::Invoices(location) => location.href(),
            Route::CreateInvoice => format!("{}/create", INVOICES_PATH),
            Route::EditInvoice { id } => format!("{}/{}/edit", INVOICES_PATH, id),
        }
    }

    /// Everything but the login screen needs a session.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What the shell should do with a requested path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Apply the routing rules to `path`.
///
/// Unknown paths redirect to the dashboard. Protected routes without a
/// session redirect to the login screen.
pub fn resolve(path: &str, session: Option<&Session>) -> Navigation {
    let Some(route) = Route::parse(path) else {
        debug!("Route: unknown path {}, redirecting to {}", path, DASHBOARD_PATH);
        return Navigation::Redirect(Route::Dashboard);
    };

    if route.requires_session() && session.is_none() {
        debug!("Route: {} requires a session", route);
        return Navigation::Redirect(Route::Login);
    }
    Navigation::Render(route)
}
