//! Invoices list view-model: search, pagination and row assembly.
//!
//! # Flow
//!
//! ```text
//! keystroke ─► input_query ─► location.query (page = 1)
//!                    │
//!                debounce (quiet window)
//!                    │
//!                    ▼
//!             debounced_query ─┐
//!  go_to_page ─► location.page ┴─► refresh ─► fetch page + page count
//!                                      │        fetch distinct customers
//!                                      ▼
//!                         apply if still the latest ticket
//! ```
//!
//! Every fetch takes a generation ticket. A result whose ticket has been
//! superseded is dropped, so the state always reflects the last request
//! issued, whatever order the responses arrive in.

use crate::config::ListConfig;
use crate::debounce::Debouncer;
use crate::entity::{Customer, Invoice, InvoiceStatus};
use crate::error::Result;
use crate::format::{format_currency, format_date, generate_pagination, PageItem};
use crate::location::ListLocation;
use crate::repository::InvoiceRepository;
use crate::token::GenerationClock;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Message shown when a list fetch fails.
pub const LOAD_ERROR: &str = "Failed to load invoices.";

/// Message shown when a delete fails.
pub const DELETE_ERROR: &str = "Failed to delete invoice.";

/// Snapshot of the list view-model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListState {
    /// Raw search text and current page, as in the address bar.
    pub location: ListLocation,
    /// Search text the current results were fetched with.
    pub debounced_query: String,
    pub invoices: Vec<Invoice>,
    /// Customers referenced by `invoices`, by id. Dangling ids are absent.
    pub customers: HashMap<String, Customer>,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
}

/// One table row, ready to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
    pub date: String,
    pub status: InvoiceStatus,
}

impl ListState {
    /// Display rows for the current page, customer fields blank when unresolved.
    pub fn rows(&self) -> Vec<InvoiceRow> {
        self.invoices
            .iter()
            .map(|inv| {
                let customer = self.customers.get(&inv.customer_id);
                InvoiceRow {
                    id: inv.id.clone(),
                    name: customer.map(|c| c.name.clone()).unwrap_or_default(),
                    email: customer.map(|c| c.email.clone()).unwrap_or_default(),
                    image_url: customer.map(|c| c.image_url.clone()).unwrap_or_default(),
                    amount: format_currency(inv.amount),
                    date: format_date(inv.date),
                    status: inv.status,
                }
            })
            .collect()
    }

    /// Pagination control items; empty when there are no pages.
    pub fn pagination(&self) -> Vec<PageItem> {
        if self.total_pages == 0 {
            return Vec::new();
        }
        generate_pagination(self.location.page, self.total_pages)
    }

    /// True once loaded with nothing to show ("No invoices found.").
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.invoices.is_empty()
    }
}

struct LoadedPage {
    invoices: Vec<Invoice>,
    customers: HashMap<String, Customer>,
    total_pages: u32,
}

#[derive(Default)]
struct Inner {
    state: ListState,
    /// (query, page) of the last issued fetch.
    last_key: Option<(String, u32)>,
}

/// View-model behind the invoices page.
///
/// Owns transient copies of fetched data; the repository owns the records.
/// After a write elsewhere, call [`refresh`](Self::refresh).
///
/// # Example
///
/// ```no_run
/// use invoice_kit::config::{LatencyProfile, ListConfig};
/// use invoice_kit::list::InvoicesViewModel;
/// use invoice_kit::store::InMemoryStore;
///
/// # #[tokio::main] async fn main() -> invoice_kit::Result<()> {
/// let store = InMemoryStore::seeded(LatencyProfile::default())?;
/// let list = InvoicesViewModel::new(store, &ListConfig::default());
/// list.refresh().await;
/// list.input_query("paid").await;
/// let state = list.snapshot().await;
/// println!("{} rows, pages {:?}", state.rows().len(), state.pagination());
/// # Ok(()) }
/// ```
pub struct InvoicesViewModel<R: InvoiceRepository> {
    repo: R,
    inner: RwLock<Inner>,
    debouncer: Debouncer,
    clock: GenerationClock,
}

impl<R: InvoiceRepository> InvoicesViewModel<R> {
    /// New view-model at the default location (no search, page 1).
    pub fn new(repo: R, config: &ListConfig) -> Self {
        Self::with_location(repo, config, ListLocation::default())
    }

    /// New view-model opened at a bookmarked location.
    pub fn with_location(repo: R, config: &ListConfig, location: ListLocation) -> Self {
        let state = ListState {
            debounced_query: location.query.clone(),
            location,
            loading: true,
            ..ListState::default()
        };

        InvoicesViewModel {
            repo,
            inner: RwLock::new(Inner {
                state,
                last_key: None,
            }),
            debouncer: Debouncer::new(config.debounce),
            clock: GenerationClock::new(),
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ListState {
        self.inner.read().await.state.clone()
    }

    /// Current location, for the address bar.
    pub async fn location(&self) -> ListLocation {
        self.inner.read().await.state.location.clone()
    }

    /// Handle a keystroke in the search box.
    ///
    /// The location updates at once (page back to 1). The fetch waits for
    /// the debounce window and only fires for the last keystroke of a burst.
    /// Returns true if this call issued a fetch.
    pub async fn input_query(&self, raw: &str) -> bool {
        {
            let mut inner = self.inner.write().await;
            inner.state.location = inner.state.location.with_query(raw);
        }

        let Some(query) = self.debouncer.settle(raw.to_string()).await else {
            return false;
        };

        self.inner.write().await.state.debounced_query = query;
        self.refresh_if_changed().await
    }

    /// Navigate to `page` (at least 1) of the current search.
    ///
    /// A search still waiting out the debounce window is committed at once
    /// rather than fetched later. Returns true if this call issued a fetch.
    pub async fn go_to_page(&self, page: u32) -> bool {
        self.debouncer.cancel();
        {
            let mut inner = self.inner.write().await;
            inner.state.debounced_query = inner.state.location.query.clone();
            inner.state.location = inner.state.location.with_page(page);
        }
        self.refresh_if_changed().await
    }

    /// Delete an invoice, then refetch the current page.
    ///
    /// A failed delete leaves the list as it was and sets the error message.
    pub async fn delete(&self, id: &str) {
        match self.repo.delete_invoice(id).await {
            Ok(()) => {
                self.refresh().await;
            }
            Err(e) => {
                warn!("Delete of invoice {} failed: {}", id, e);
                self.inner.write().await.state.error = Some(DELETE_ERROR.to_string());
            }
        }
    }

    async fn refresh_if_changed(&self) -> bool {
        let unchanged = {
            let inner = self.inner.read().await;
            let key = (
                inner.state.debounced_query.clone(),
                inner.state.location.page,
            );
            inner.last_key.as_ref() == Some(&key)
        };

        if unchanged {
            debug!("List key unchanged, no fetch");
            return false;
        }
        self.refresh().await
    }

    /// Fetch the current (debounced query, page) unconditionally.
    ///
    /// Returns false if the result was dropped because a newer fetch was
    /// issued while this one was in flight.
    pub async fn refresh(&self) -> bool {
        let (ticket, query, page) = {
            let mut inner = self.inner.write().await;
            let ticket = self.clock.next();
            let query = inner.state.debounced_query.clone();
            let page = inner.state.location.page;
            inner.state.loading = true;
            inner.last_key = Some((query.clone(), page));
            (ticket, query, page)
        };

        let outcome = self.load(&query, page).await;

        let mut inner = self.inner.write().await;
        if !self.clock.is_current(ticket) {
            debug!(
                "Dropping stale list result for {:?} page {} (generation {})",
                query, page, ticket
            );
            return false;
        }

        match outcome {
            Ok(loaded) => {
                let state = &mut inner.state;
                state.invoices = loaded.invoices;
                state.customers = loaded.customers;
                state.total_pages = loaded.total_pages;
                state.error = None;
            }
            Err(e) => {
                warn!("Loading invoices for {:?} page {} failed: {}", query, page, e);
                // Forget the key so the same search or page can be retried.
                inner.last_key = None;
                inner.state.error = Some(LOAD_ERROR.to_string());
            }
        }
        inner.state.loading = false;
        true
    }

    async fn load(&self, query: &str, page: u32) -> Result<LoadedPage> {
        let (invoices, total_pages) = tokio::join!(
            self.repo.fetch_filtered_invoices(query, page),
            self.repo.fetch_invoices_pages(query)
        );
        let invoices = invoices?;
        let total_pages = total_pages?;

        let mut seen = HashSet::new();
        let ids: Vec<&str> = invoices
            .iter()
            .map(|inv| inv.customer_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect();

        let fetched = join_all(ids.iter().map(|id| self.repo.get_customer_by_id(id))).await;

        let mut customers = HashMap::with_capacity(ids.len());
        for customer in fetched {
            if let Some(c) = customer? {
                customers.insert(c.id.clone(), c);
            }
        }

        debug!(
            "Loaded {} invoices, {} customers for {:?} page {}",
            invoices.len(),
            customers.len(),
            query,
            page
        );

        Ok(LoadedPage {
            invoices,
            customers,
            total_pages,
        })
    }
}
