//! Application shell: one repository, one optional session, routed screens.

use crate::config::Config;
use crate::dashboard::DashboardViewModel;
use crate::error::Result;
use crate::form::InvoiceFormViewModel;
use crate::list::InvoicesViewModel;
use crate::location::ListLocation;
use crate::repository::InvoiceRepository;
use crate::route::{resolve, Navigation, Route};
use crate::session::{Credentials, Session};
use crate::store::InMemoryStore;
use std::sync::Arc;

const MAX_REDIRECTS: usize = 4;

/// A routed screen with its view-model, not yet loaded.
pub enum Screen<R: InvoiceRepository> {
    Login,
    Dashboard(DashboardViewModel<Arc<R>>),
    Invoices(InvoicesViewModel<Arc<R>>),
    Form(InvoiceFormViewModel<Arc<R>>),
}

/// Top-level handle.
///
/// Clones share the repository; each clone carries its own session.
///
/// ```
/// use invoice_kit::app::InvoiceApp;
/// use invoice_kit::config::Config;
/// use invoice_kit::route::Route;
///
/// let mut app = InvoiceApp::demo(Config::default()).unwrap();
/// assert_eq!(app.navigate("/invoices"), Route::Login);
///
/// app.login("user@nextmail.com", "123456").unwrap();
/// assert_eq!(app.navigate("/nowhere"), Route::Dashboard);
/// ```
pub struct InvoiceApp<R: InvoiceRepository> {
    repo: Arc<R>,
    config: Config,
    credentials: Credentials,
    session: Option<Session>,
}

impl<R: InvoiceRepository> Clone for InvoiceApp<R> {
    fn clone(&self) -> Self {
        InvoiceApp {
            repo: Arc::clone(&self.repo),
            config: self.config.clone(),
            credentials: self.credentials.clone(),
            session: self.session.clone(),
        }
    }
}

impl InvoiceApp<InMemoryStore> {
    /// App over the bundled mock data, with the configured latencies.
    pub fn demo(config: Config) -> Result<Self> {
        let store = InMemoryStore::seeded(config.latency.clone())?;
        Ok(InvoiceApp::new(store, config))
    }
}

impl<R: InvoiceRepository> InvoiceApp<R> {
    /// App over `repo`, signed out, accepting the demo credentials.
    pub fn new(repo: R, config: Config) -> Self {
        InvoiceApp {
            repo: Arc::new(repo),
            config,
            credentials: Credentials::demo(),
            session: None,
        }
    }

    /// Replace the account that may sign in.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The active session, if signed in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Sign in and land on the dashboard.
    ///
    /// # Errors
    /// Returns `Error::Unauthorized` on a mismatch; any existing session is kept.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Route> {
        let session = Session::login(email, password, &self.credentials)?;
        self.session = Some(session);
        Ok(Route::Dashboard)
    }

    /// Drop the session and return to the login screen.
    pub fn logout(&mut self) -> Route {
        if let Some(session) = self.session.take() {
            info!("Logout: {}", session.email());
        }
        Route::Login
    }

    /// Follow redirects for `path` and return the route that renders.
    pub fn navigate(&self, path: &str) -> Route {
        let mut target = path.to_string();
        for _ in 0..MAX_REDIRECTS {
            match resolve(&target, self.session.as_ref()) {
                Navigation::Render(route) => return route,
                Navigation::Redirect(route) => target = route.path(),
            }
        }
        warn!("Too many redirects from {}", path);
        Route::Login
    }

    /// Navigate to `path` and build the screen's view-model.
    pub fn open(&self, path: &str) -> Screen<R> {
        match self.navigate(path) {
            Route::Login => Screen::Login,
            Route::Dashboard => Screen::Dashboard(self.dashboard()),
            Route::Invoices(location) => Screen::Invoices(self.invoices(location)),
            Route::CreateInvoice => Screen::Form(self.create_form()),
            Route::EditInvoice { id } => Screen::Form(self.edit_form(id)),
        }
    }

    /// Overview page view-model.
    pub fn dashboard(&self) -> DashboardViewModel<Arc<R>> {
        DashboardViewModel::new(Arc::clone(&self.repo))
    }

    /// Invoices list opened at `location`, using the configured debounce.
    pub fn invoices(&self, location: ListLocation) -> InvoicesViewModel<Arc<R>> {
        InvoicesViewModel::with_location(Arc::clone(&self.repo), &self.config.list, location)
    }

    /// Create-invoice form.
    pub fn create_form(&self) -> InvoiceFormViewModel<Arc<R>> {
        InvoiceFormViewModel::create(Arc::clone(&self.repo))
    }

    /// Edit form for invoice `id`.
    pub fn edit_form(&self, id: impl Into<String>) -> InvoiceFormViewModel<Arc<R>> {
        InvoiceFormViewModel::edit(Arc::clone(&self.repo), id)
    }
}
