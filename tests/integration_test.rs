//! Integration tests for invoice-kit
//!
//! These tests drive the view-models against the in-memory store, some of
//! them through a recording wrapper that counts and delays repository calls.

use chrono::NaiveDate;
use invoice_kit::config::{LatencyProfile, ListConfig};
use invoice_kit::dashboard::DashboardViewModel;
use invoice_kit::entity::{
    CardData, Customer, CustomerField, Invoice, InvoiceForm, InvoiceStatus, LatestInvoice,
    RevenuePoint,
};
use invoice_kit::form::{FormPhase, InvoiceFormInput, InvoiceFormViewModel, SubmitOutcome};
use invoice_kit::list::InvoicesViewModel;
use invoice_kit::store::{Dataset, InMemoryStore};
use invoice_kit::{Config, InvoiceApp, InvoiceRepository, ListLocation, Result, Route};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

const DELBA: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";
const LEE: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";

fn customer(id: &str, name: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        image_url: String::new(),
    }
}

/// `n` invoices alternating between two customers, amounts 1000.. in cents.
fn dataset(n: usize) -> Dataset {
    let customers = vec![customer("c-ada", "Ada"), customer("c-bo", "Bo")];
    let invoices = (0..n)
        .map(|i| Invoice {
            id: format!("inv-{}", i),
            customer_id: customers[i % 2].id.clone(),
            amount: 1000 + i as i64,
            status: if i % 3 == 0 {
                InvoiceStatus::Paid
            } else {
                InvoiceStatus::Pending
            },
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        })
        .collect();

    Dataset {
        customers,
        invoices,
        revenue: Vec::new(),
    }
}

/// Repository wrapper that records list fetches and delays page 1.
#[derive(Clone)]
struct Recording {
    inner: InMemoryStore,
    page_one_delay: Duration,
    fetches: Arc<Mutex<Vec<(String, u32)>>>,
}

impl Recording {
    fn new(inner: InMemoryStore) -> Self {
        Recording {
            inner,
            page_one_delay: Duration::ZERO,
            fetches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn slow_first_page(mut self, delay: Duration) -> Self {
        self.page_one_delay = delay;
        self
    }

    fn fetches(&self) -> Vec<(String, u32)> {
        self.fetches.lock().unwrap().clone()
    }
}

impl InvoiceRepository for Recording {
    async fn fetch_revenue(&self) -> Result<Vec<RevenuePoint>> {
        self.inner.fetch_revenue().await
    }

    async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>> {
        self.inner.fetch_latest_invoices().await
    }

    async fn fetch_card_data(&self) -> Result<CardData> {
        self.inner.fetch_card_data().await
    }

    async fn fetch_filtered_invoices(&self, query: &str, page: u32) -> Result<Vec<Invoice>> {
        self.fetches.lock().unwrap().push((query.to_string(), page));
        let rows = self.inner.fetch_filtered_invoices(query, page).await?;
        if page == 1 {
            sleep(self.page_one_delay).await;
        }
        Ok(rows)
    }

    async fn fetch_invoices_pages(&self, query: &str) -> Result<u32> {
        self.inner.fetch_invoices_pages(query).await
    }

    async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        self.inner.fetch_invoice_by_id(id).await
    }

    async fn fetch_customers(&self) -> Result<Vec<CustomerField>> {
        self.inner.fetch_customers().await
    }

    async fn get_customer_by_id(&self, id: &str) -> Result<Option<Customer>> {
        self.inner.get_customer_by_id(id).await
    }

    async fn create_invoice(&self, form: &InvoiceForm) -> Result<String> {
        self.inner.create_invoice(form).await
    }

    async fn update_invoice(&self, id: &str, form: &InvoiceForm) -> Result<()> {
        self.inner.update_invoice(id, form).await
    }

    async fn delete_invoice(&self, id: &str) -> Result<()> {
        self.inner.delete_invoice(id).await
    }
}

/// Test 1: Create, read, update, delete through the repository
#[tokio::test]
async fn test_crud_round_trip() {
    let store = InMemoryStore::seeded(LatencyProfile::instant()).unwrap();
    let form = InvoiceForm {
        customer_id: LEE.to_string(),
        amount: 4200,
        status: InvoiceStatus::Pending,
    };

    let id = store.create_invoice(&form).await.unwrap();
    let created = store.fetch_invoice_by_id(&id).await.unwrap().unwrap();
    assert_eq!(created.customer_id, LEE);
    assert_eq!(created.amount, 4200);
    assert_eq!(created.status, InvoiceStatus::Pending);
    assert_eq!(created.date, chrono::Local::now().date_naive());
    assert_eq!(store.fetch_latest_invoices().await.unwrap()[0].id, id);

    let paid = InvoiceForm {
        status: InvoiceStatus::Paid,
        ..form
    };
    store.update_invoice(&id, &paid).await.unwrap();
    let updated = store.fetch_invoice_by_id(&id).await.unwrap().unwrap();
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.customer_id, LEE);
    assert_eq!(updated.amount, 4200);
    assert_eq!(updated.id, id);
    assert_eq!(updated.date, created.date);

    store.delete_invoice(&id).await.unwrap();
    assert_eq!(store.fetch_invoice_by_id(&id).await.unwrap(), None);
    assert!(store.update_invoice(&id, &paid).await.unwrap_err().is_not_found());
}

/// Test 2: A slow older page never overwrites a newer one
///
/// Page 1 is requested first but resolves last; the final state shows page 2.
#[tokio::test(start_paused = true)]
async fn test_stale_page_result_is_dropped() {
    let store = InMemoryStore::new(dataset(20), LatencyProfile::instant());
    let repo = Recording::new(store).slow_first_page(Duration::from_millis(1000));
    let vm = InvoicesViewModel::new(repo.clone(), &ListConfig::default());

    let (first, second) = tokio::join!(vm.refresh(), async {
        sleep(Duration::from_millis(10)).await;
        vm.go_to_page(2).await
    });

    assert!(!first, "page 1 result should be discarded");
    assert!(second);

    let state = vm.snapshot().await;
    assert_eq!(state.location.page, 2);
    assert!(!state.loading);
    let ids: Vec<&str> = state.invoices.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["inv-6", "inv-7", "inv-8", "inv-9", "inv-10", "inv-11"]);
    assert_eq!(repo.fetches(), [(String::new(), 1), (String::new(), 2)]);
}

/// Test 3: A burst of keystrokes issues one fetch, for the final text
#[tokio::test(start_paused = true)]
async fn test_typing_burst_fetches_once() {
    let store = InMemoryStore::new(dataset(10), LatencyProfile::instant());
    let repo = Recording::new(store);
    let vm = InvoicesViewModel::new(repo.clone(), &ListConfig::default());

    let typed = |text: &'static str, at: u64| {
        let vm = &vm;
        async move {
            sleep(Duration::from_millis(at)).await;
            vm.input_query(text).await
        }
    };

    let fired = tokio::join!(typed("b", 0), typed("bo", 120), typed("bo@", 240));
    assert_eq!(fired, (false, false, true));
    assert_eq!(repo.fetches(), [("bo@".to_string(), 1)]);

    let state = vm.snapshot().await;
    assert_eq!(state.debounced_query, "bo@");
    assert_eq!(state.invoices.len(), 5);
    assert!(state.rows().iter().all(|row| row.name == "Bo"));
}

/// Test 4: Location updates immediately; fetch waits for the debounce window
#[tokio::test(start_paused = true)]
async fn test_location_leads_fetch() {
    let store = InMemoryStore::new(dataset(20), LatencyProfile::instant());
    let repo = Recording::new(store);
    let vm = InvoicesViewModel::with_location(
        repo.clone(),
        &ListConfig::default(),
        ListLocation::parse("page=3"),
    );
    vm.refresh().await;

    let (_, (location, fetches)) = tokio::join!(vm.input_query("ada"), async {
        sleep(Duration::from_millis(100)).await;
        (vm.location().await, repo.fetches().len())
    });

    assert_eq!(location.href(), "/invoices?query=ada&page=1");
    assert_eq!(fetches, 1, "only the initial fetch before the window elapses");
    assert_eq!(repo.fetches().len(), 2);
}

/// Test 5: Create through the form, then find it on the list and dashboard
#[tokio::test]
async fn test_create_then_list_and_dashboard() {
    let store = InMemoryStore::seeded(LatencyProfile::instant()).unwrap();

    let form = InvoiceFormViewModel::create(store.clone());
    let outcome = form
        .submit(&InvoiceFormInput::new(LEE, "a thousand", "paid"))
        .await;
    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(form.error().await.as_deref(), Some("Please fill out all fields."));

    let outcome = form.submit(&InvoiceFormInput::new(LEE, "1000", "paid")).await;
    let Route::Invoices(location) = (match outcome {
        SubmitOutcome::Navigate(route) => route,
        SubmitOutcome::Rejected => panic!("create rejected"),
    }) else {
        panic!("expected the invoices list");
    };
    assert_eq!(form.phase().await, FormPhase::Succeeded);

    let list = InvoicesViewModel::with_location(store.clone(), &ListConfig::default(), location);
    list.refresh().await;
    let rows = list.snapshot().await.rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].name, "Lee Robinson");
    assert_eq!(rows[0].amount, "$1,000.00");

    let view = DashboardViewModel::new(store).load().await.unwrap();
    assert_eq!(view.cards[0].value, "$1,203.48");
    assert_eq!(view.latest_invoices[0].name, "Lee Robinson");
}

/// Test 6: Edit flow through the app shell
#[tokio::test]
async fn test_edit_through_app() {
    let config = Config::default().with_latency(LatencyProfile::instant());
    let mut app = InvoiceApp::demo(config).unwrap();

    let path = Route::EditInvoice {
        id: DELBA.to_string(),
    }
    .path();
    assert_eq!(app.navigate(&path), Route::Login);
    app.login("user@nextmail.com", "123456").unwrap();
    assert_eq!(
        app.navigate(&path),
        Route::EditInvoice {
            id: DELBA.to_string()
        }
    );

    let form = app.edit_form(DELBA);
    let ctx = form.load().await.unwrap();
    let mut input = InvoiceFormInput::from_invoice(ctx.invoice.as_ref().unwrap());
    assert_eq!(input.amount.as_deref(), Some("157.95"));
    input.amount = Some("160".to_string());

    assert!(matches!(form.submit(&input).await, SubmitOutcome::Navigate(_)));
    let saved = app
        .repository()
        .fetch_invoice_by_id(DELBA)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.amount, 16000);
    assert_eq!(saved.status, InvoiceStatus::Pending);
}

/// Test 7: Deleting the last row of the last page
#[tokio::test]
async fn test_delete_on_last_page() {
    let store = InMemoryStore::new(dataset(7), LatencyProfile::instant());
    let vm = InvoicesViewModel::with_location(
        store.clone(),
        &ListConfig::default(),
        ListLocation::parse("page=2"),
    );
    vm.refresh().await;
    assert_eq!(vm.snapshot().await.invoices.len(), 1);

    vm.delete("inv-6").await;
    let state = vm.snapshot().await;
    assert_eq!(state.total_pages, 1);
    assert!(state.invoices.is_empty());
    assert!(state.is_empty_result());
    assert_eq!(store.len().await, 6);
}
