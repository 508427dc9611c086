//! Data-access contract consumed by the view-models.
//!
//! `InvoiceRepository` is the seam between view-model logic and storage.
//! [`InMemoryStore`](crate::store::InMemoryStore) implements it over mock
//! data; a real backend implements the same eleven operations with the same
//! semantics:
//!
//! - pages hold [`ITEMS_PER_PAGE`] invoices, 1-based;
//! - the search filter is a case-insensitive substring match over customer
//!   name, customer email, formatted amount, ISO date and status;
//! - amounts cross the boundary as integer cents.
//!
//! # Error Handling
//!
//! Lookups by id return `Ok(None)` when absent. Return `Err` for storage
//! failures, and `Error::NotFound` from `update_invoice` when the id is unknown.

use crate::entity::{
    CardData, Customer, CustomerField, Invoice, InvoiceForm, LatestInvoice, RevenuePoint,
};
use crate::error::Result;
use crate::format::format_currency;

/// Fixed page size of the invoices list.
pub const ITEMS_PER_PAGE: usize = 6;

/// Number of invoices on the dashboard's latest list.
pub const LATEST_INVOICES: usize = 5;

/// Trait for invoice data sources.
///
/// All methods take `&self`; implementations use interior mutability.
#[allow(async_fn_in_trait)]
pub trait InvoiceRepository: Send + Sync {
    /// Full revenue series, in month order.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_revenue(&self) -> Result<Vec<RevenuePoint>>;

    /// The [`LATEST_INVOICES`] most recently created invoices, joined with customer fields.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>>;

    /// Dashboard counts and paid/pending totals.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_card_data(&self) -> Result<CardData>;

    /// One page of invoices matching `query`. Past the last page this is empty.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<Invoice>>;

    /// Number of pages of invoices matching `query`.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_invoices_pages(&self, query: &str) -> Result<u32>;

    /// Invoice by id.
    ///
    /// # Returns
    /// - `Ok(Some(invoice))` - Invoice found
    /// - `Ok(None)` - Invoice not found (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<Invoice>>;

    /// All customers as select-list entries.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn fetch_customers(&self) -> Result<Vec<CustomerField>>;

    /// Customer by id, `Ok(None)` when absent.
    ///
    /// # Errors
    /// Returns `Err` if the data source is unavailable
    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>>;

    /// Insert a new invoice dated today and return its fresh id.
    ///
    /// # Errors
    /// Returns `Err` if the write fails
    async fn create_invoice(&self, form: &InvoiceForm) -> Result<String>;

    /// Replace customer, amount and status of an existing invoice.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if no invoice has this id
    async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> Result<()>;

    /// Remove an invoice. Unknown ids are a no-op.
    ///
    /// # Errors
    /// Returns `Err` if the write fails
    async fn delete_invoice(&self, id: &str) -> Result<()>;
}

impl<R: InvoiceRepository> InvoiceRepository for std::sync::Arc<R> {
    async fn fetch_revenue(&self) -> Result<Vec<RevenuePoint>> {
        (**self).fetch_revenue().await
    }

    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>> {
        (**self).fetch_latest_invoices().await
    }

    async fn fetch_card_data(&self) -> Result<CardData> {
        (**self).fetch_card_data().await
    }

    async fn fetch_filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<Invoice>> {
        (**self).fetch_filtered_invoices(query, page).await
    }

    async fn fetch_invoices_pages(&self, query: &str) -> Result<u32> {
        (**self).fetch_invoices_pages(query).await
    }

    async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        (**self).fetch_invoice_by_id(id).await
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerField>> {
        (**self).fetch_customers().await
    }

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        (**self).get_customer_by_id(id).await
    }

    async fn create_invoice(&self, form: &InvoiceForm) -> Result<String> {
        (**self).create_invoice(form).await
    }

    async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> Result<()> {
        (**self).update_invoice(id, form).await
    }

    async fn delete_invoice(&self, id: &str) -> Result<()> {
        (**self).delete_invoice(id).await
    }
}

// ============================================================================
// Shared predicate and paging helpers
// ============================================================================

/// Lower-cased search haystack of one invoice.
///
/// A dangling customer reference contributes empty name and email.
pub fn search_text(invoice: &Invoice, customer: Option<&Customer>) -> String {
    [
        customer.map(|c| c.name.as_str()).unwrap_or(""),
        customer.map(|c| c.email.as_str()).unwrap_or(""),
        &format_currency(invoice.amount),
        &invoice.date.format("%Y-%m-%d").to_string(),
        invoice.status.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// True if `query` occurs in the invoice's search text, ignoring case.
/// The empty query matches everything.
pub fn matches_query(invoice: &Invoice, customer: Option<&Customer>, query: &str) -> bool {
    search_text(invoice, customer).contains(&query.to_lowercase())
}

/// Index range of `page` (1-based; 0 is treated as 1) within `len` rows.
pub fn page_bounds(page: u32, len: usize) -> std::ops::Range<usize> {
    let offset = (page.max(1) as usize - 1).saturating_mul(ITEMS_PER_PAGE);
    let start = offset.min(len);
    let end = offset.saturating_add(ITEMS_PER_PAGE).min(len);
    start..end
}

/// Pages needed for `matches` rows.
pub fn page_count(matches: usize) -> u32 {
    matches.div_ceil(ITEMS_PER_PAGE) as u32
}
