//! In-memory mock data source with simulated latency.
//!
//! Holds the canonical invoice, customer and revenue collections. Clones
//! share the same collections, so one store can back every view-model.
//! Invoices are kept most-recent-first: creation prepends.

use crate::config::LatencyProfile;
use crate::entity::{
    find_by_id, CardData, Customer, CustomerField, Entity, Invoice, InvoiceForm,
    InvoiceStatus, LatestInvoice, RevenuePoint,
};
use crate::error::{Error, Result};
use crate::format::format_currency;
use crate::observability::{LogMetrics, RepositoryMetrics};
use crate::repository::{
    matches_query, page_bounds, page_count, InvoiceRepository, LATEST_INVOICES,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Built-in demo dataset.
const SEED_JSON: &str = include_str!("../data/seed.json");

/// Serialized shape of a store's contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    /// Most recent first.
    pub invoices: Vec<Invoice>,
    pub revenue: Vec<RevenuePoint>,
}

struct Collections {
    invoices: RwLock<Vec<Invoice>>,
    customers: Vec<Customer>,
    revenue: Vec<RevenuePoint>,
}

/// Mock [`InvoiceRepository`] over in-memory collections.
///
/// # Example
///
/// ```no_run
/// use invoice_kit::config::LatencyProfile;
/// use invoice_kit::repository::InvoiceRepository;
/// use invoice_kit::store::InMemoryStore;
///
/// #[tokio::main]
/// async fn main() -> invoice_kit::Result<()> {
///     let store = InMemoryStore::seeded(LatencyProfile::default())?;
///     let page = store.fetch_filtered_invoices("delba", 1).await?;
///     assert_eq!(page.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    collections: Arc<Collections>,
    latency: LatencyProfile,
    metrics: Arc<dyn RepositoryMetrics>,
}

impl InMemoryStore {
    /// Create a store over `dataset`.
    pub fn new(dataset: Dataset, latency: LatencyProfile) -> Self {
        let Dataset {
            customers,
            invoices,
            revenue,
        } = dataset;

        InMemoryStore {
            collections: Arc::new(Collections {
                invoices: RwLock::new(invoices),
                customers,
                revenue,
            }),
            latency,
            metrics: Arc::new(LogMetrics),
        }
    }

    /// Create a store with no data at all.
    pub fn empty(latency: LatencyProfile) -> Self {
        Self::new(Dataset::default(), latency)
    }

    /// Create a store loaded with the built-in demo dataset.
    ///
    /// # Errors
    /// Returns `Err` only if the embedded dataset fails to parse.
    pub fn seeded(latency: LatencyProfile) -> Result<Self> {
        Self::from_json(SEED_JSON, latency)
    }

    /// Create a store from a JSON [`Dataset`].
    ///
    /// # Errors
    /// Returns `Error::Repository` if the JSON does not match the dataset shape.
    pub fn from_json(json: &str, latency: LatencyProfile) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        debug!(
            "✓ Loaded dataset: {} customers, {} invoices, {} revenue points",
            dataset.customers.len(),
            dataset.invoices.len(),
            dataset.revenue.len()
        );
        Ok(Self::new(dataset, latency))
    }

    /// Attach a metrics sink.
    pub fn with_metrics(mut self, metrics: Arc<dyn RepositoryMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Current number of invoices.
    pub async fn len(&self) -> usize {
        self.collections.invoices.read().await.len()
    }

    /// True if there are no invoices.
    pub async fn is_empty(&self) -> bool {
        self.collections.invoices.read().await.is_empty()
    }

    /// Copy of every invoice, most recent first.
    pub async fn invoices(&self) -> Vec<Invoice> {
        self.collections.invoices.read().await.clone()
    }

    /// Copy of the current contents.
    pub async fn export(&self) -> Dataset {
        Dataset {
            customers: self.collections.customers.clone(),
            invoices: self.invoices().await,
            revenue: self.collections.revenue.clone(),
        }
    }

    async fn simulate(&self, latency: Duration) -> Instant {
        let started = Instant::now();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        started
    }

    fn customer(&self, id: &str) -> Option<&Customer> {
        find_by_id(&self.collections.customers, id)
    }

    fn filtered(&self, invoices: &[Invoice], query: &str) -> Vec<Invoice> {
        invoices
            .iter()
            .filter(|inv| matches_query(inv, self.customer(&inv.customer_id), query))
            .cloned()
            .collect()
    }

    fn total_for(invoices: &[Invoice], status: InvoiceStatus) -> i64 {
        invoices
            .iter()
            .filter(|i| i.status == status)
            .map(|i| i.amount)
            .sum()
    }
}

impl InvoiceRepository for InMemoryStore {
    async fn fetch_revenue(&self) -> Result<Vec<RevenuePoint>> {
        let started = self.simulate(self.latency.revenue).await;
        self.metrics.record_read("fetch_revenue", started.elapsed());
        Ok(self.collections.revenue.clone())
    }

    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>> {
        let started = self.simulate(self.latency.latest_invoices).await;
        let invoices = self.collections.invoices.read().await;

        let latest = invoices
            .iter()
            .take(LATEST_INVOICES)
            .map(|inv| {
                let customer = self.customer(&inv.customer_id);
                LatestInvoice {
                    id: inv.id.clone(),
                    name: customer
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    email: customer.map(|c| c.email.clone()).unwrap_or_default(),
                    image_url: customer.map(|c| c.image_url.clone()).unwrap_or_default(),
                    amount: format_currency(inv.amount),
                }
            })
            .collect();

        self.metrics
            .record_read("fetch_latest_invoices", started.elapsed());
        Ok(latest)
    }

    async fn fetch_card_data(&self) -> Result<CardData> {
        let started = self.simulate(self.latency.card_data).await;
        let invoices = self.collections.invoices.read().await;

        let paid = Self::total_for(invoices.as_slice(), InvoiceStatus::Paid);
        let pending = Self::total_for(invoices.as_slice(), InvoiceStatus::Pending);

        let cards = CardData {
            number_of_customers: self.collections.customers.len(),
            number_of_invoices: invoices.len(),
            total_paid_invoices: format_currency(paid),
            total_pending_invoices: format_currency(pending),
        };

        self.metrics.record_read("fetch_card_data", started.elapsed());
        Ok(cards)
    }

    async fn fetch_filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<Invoice>> {
        let started = self.simulate(self.latency.filtered_invoices).await;
        let invoices = self.collections.invoices.read().await;

        let mut filtered = self.filtered(invoices.as_slice(), query);
        let bounds = page_bounds(page, filtered.len());
        let rows: Vec<Invoice> = filtered.drain(bounds).collect();

        debug!(
            "✓ InMemory FILTER {:?} page {} -> {} rows",
            query,
            page,
            rows.len()
        );
        self.metrics
            .record_read("fetch_filtered_invoices", started.elapsed());
        Ok(rows)
    }

    async fn fetch_invoices_pages(&self, query: &str) -> Result<u32> {
        let started = self.simulate(self.latency.invoices_pages).await;
        let invoices = self.collections.invoices.read().await;
        let pages = page_count(self.filtered(invoices.as_slice(), query).len());

        self.metrics
            .record_read("fetch_invoices_pages", started.elapsed());
        Ok(pages)
    }

    async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        let started = self.simulate(self.latency.invoice_by_id).await;
        let invoices = self.collections.invoices.read().await;
        let found = find_by_id(invoices.as_slice(), id).cloned();

        self.metrics
            .record_read("fetch_invoice_by_id", started.elapsed());
        Ok(found)
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerField>> {
        let started = self.simulate(self.latency.customers).await;
        let fields = self
            .collections
            .customers
            .iter()
            .map(CustomerField::from)
            .collect();

        self.metrics.record_read("fetch_customers", started.elapsed());
        Ok(fields)
    }

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        let started = self.simulate(self.latency.customer_by_id).await;
        let found = self.customer(id).cloned();

        self.metrics
            .record_read("get_customer_by_id", started.elapsed());
        Ok(found)
    }

    async fn create_invoice(&self, form: &InvoiceForm) -> Result<String> {
        let started = self.simulate(self.latency.create).await;

        let invoice = Invoice {
            id: uuid::Uuid::now_v7().to_string(),
            customer_id: form.customer_id.clone(),
            amount: form.amount,
            status: form.status,
            date: chrono::Local::now().date_naive(),
        };
        let id = invoice.id.clone();

        self.collections.invoices.write().await.insert(0, invoice);
        info!("Created {} {}", Invoice::kind(), id);

        self.metrics.record_write("create_invoice", started.elapsed());
        Ok(id)
    }

    async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> Result<()> {
        let started = self.simulate(self.latency.update).await;
        let mut invoices = self.collections.invoices.write().await;

        match invoices.iter_mut().find(|inv| inv.id == id) {
            Some(invoice) => {
                invoice.apply(form);
                info!("Updated {} {}", Invoice::kind(), id);
                self.metrics.record_write("update_invoice", started.elapsed());
                Ok(())
            }
            None => {
                let err = Error::not_found(Invoice::kind(), id);
                self.metrics
                    .record_error("update_invoice", &err.to_string());
                Err(err)
            }
        }
    }

    async fn delete_invoice(&self, id: &str) -> Result<()> {
        let started = self.simulate(self.latency.delete).await;
        let mut invoices = self.collections.invoices.write().await;

        let before = invoices.len();
        invoices.retain(|inv| inv.id != id);
        if invoices.len() < before {
            info!("Deleted {} {}", Invoice::kind(), id);
        } else {
            debug!("Delete of unknown {} {} ignored", Invoice::kind(), id);
        }

        self.metrics.record_write("delete_invoice", started.elapsed());
        Ok(())
    }
}
