//! Create and edit invoice forms.
//!
//! Both forms share one view-model and one state machine:
//!
//! ```text
//! Idle ──submit──► Submitting ──ok──► Succeeded (navigate to the list)
//!                       │
//!                       └──validation / write failure──► Idle (error set)
//! ```
//!
//! Nothing is retried; the user resubmits.

use crate::entity::{CustomerField, Invoice, InvoiceForm, InvoiceStatus};
use crate::error::{Error, Result};
use crate::location::ListLocation;
use crate::repository::InvoiceRepository;
use crate::route::Route;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::sync::RwLock;

/// Shown when a required field is missing or unreadable.
pub const FILL_OUT_FIELDS: &str = "Please fill out all fields.";

/// Shown when the amount is below zero.
pub const NEGATIVE_AMOUNT: &str = "Amount must be a non-negative number.";

/// Convert a decimal dollar string to integer cents.
///
/// Arithmetic is exact; half a cent rounds up (away from zero).
///
/// ```
/// use invoice_kit::form::parse_amount_to_cents;
///
/// assert_eq!(parse_amount_to_cents("157.95").unwrap(), 15795);
/// assert_eq!(parse_amount_to_cents("1.005").unwrap(), 101);
/// assert_eq!(parse_amount_to_cents("12").unwrap(), 1200);
/// assert!(parse_amount_to_cents("-3").is_err());
/// ```
///
/// # Errors
/// Returns `Error::Validation` for unparsable, negative or out-of-range input.
pub fn parse_amount_to_cents(amount: &str) -> Result<i64> {
    let dollars = Decimal::from_str(amount.trim())?;
    if dollars.is_sign_negative() && !dollars.is_zero() {
        return Err(Error::Validation(NEGATIVE_AMOUNT.to_string()));
    }

    dollars
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| Error::Validation(format!("amount out of range: {}", amount)))
}

/// Raw form fields as submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFormInput {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl InvoiceFormInput {
    /// All three fields present.
    pub fn new(
        customer_id: impl Into<String>,
        amount: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        InvoiceFormInput {
            customer_id: Some(customer_id.into()),
            amount: Some(amount.into()),
            status: Some(status.into()),
        }
    }

    /// Pre-filled fields for editing `invoice`; amount shown in dollars.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        InvoiceFormInput {
            customer_id: Some(invoice.customer_id.clone()),
            amount: Some(Decimal::new(invoice.amount, 2).normalize().to_string()),
            status: Some(invoice.status.to_string()),
        }
    }

    /// Validate and build the write payload.
    ///
    /// # Errors
    /// Returns `Error::Validation` with the message to show inline.
    pub fn into_form(&self) -> Result<InvoiceForm> {
        fn required(field: &Option<String>) -> Option<&str> {
            field.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }
        let fill_out = || Error::Validation(FILL_OUT_FIELDS.to_string());

        let (Some(customer_id), Some(amount), Some(status)) = (
            required(&self.customer_id),
            required(&self.amount),
            required(&self.status),
        ) else {
            return Err(fill_out());
        };

        let status: InvoiceStatus = status.parse().map_err(|_| fill_out())?;
        let amount = parse_amount_to_cents(amount).map_err(|e| match e {
            Error::Validation(msg) if msg == NEGATIVE_AMOUNT => Error::Validation(msg),
            _ => fill_out(),
        })?;

        Ok(InvoiceForm {
            customer_id: customer_id.to_string(),
            amount,
            status,
        })
    }
}

/// Which write the form performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Step of the submit state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

/// Result of a submit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The write succeeded; go here.
    Navigate(Route),
    /// Nothing was written; see the error message.
    Rejected,
}

/// Data a form needs before it can render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormContext {
    pub customers: Vec<CustomerField>,
    /// The invoice being edited; `None` when creating.
    pub invoice: Option<Invoice>,
}

#[derive(Default)]
struct FormState {
    phase: FormPhase,
    error: Option<String>,
}

/// View-model behind the create and edit pages.
pub struct InvoiceFormViewModel<R: InvoiceRepository> {
    repo: R,
    mode: FormMode,
    state: RwLock<FormState>,
}

impl<R: InvoiceRepository> InvoiceFormViewModel<R> {
    /// Form for a new invoice.
    pub fn create(repo: R) -> Self {
        Self::new(repo, FormMode::Create)
    }

    /// Form editing the invoice `id`. The id is checked by [`load`](Self::load).
    pub fn edit(repo: R, id: impl Into<String>) -> Self {
        Self::new(repo, FormMode::Edit { id: id.into() })
    }

    /// Form in the given mode, starting idle with no error.
    pub fn new(repo: R, mode: FormMode) -> Self {
        InvoiceFormViewModel {
            repo,
            mode,
            state: RwLock::new(FormState::default()),
        }
    }

    /// Which write this form performs.
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Current step of the submit state machine.
    pub async fn phase(&self) -> FormPhase {
        self.state.read().await.phase
    }

    /// True while a write is in flight; the submit control is disabled.
    pub async fn is_submitting(&self) -> bool {
        self.phase().await == FormPhase::Submitting
    }

    /// Inline error message, if the last attempt failed.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Text of the submit control.
    pub async fn submit_label(&self) -> &'static str {
        let submitting = self.is_submitting().await;
        match (&self.mode, submitting) {
            (FormMode::Create, false) => "Create Invoice",
            (FormMode::Create, true) => "Creating...",
            (FormMode::Edit { .. }, false) => "Edit Invoice",
            (FormMode::Edit { .. }, true) => "Updating...",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Failed to create invoice.",
            FormMode::Edit { .. } => "Failed to update invoice.",
        }
    }

    /// Fetch the customer list and, when editing, the invoice.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the invoice being edited does not exist,
    /// or the repository error if a fetch fails.
    pub async fn load(&self) -> Result<FormContext> {
        match &self.mode {
            FormMode::Create => Ok(FormContext {
                customers: self.repo.fetch_customers().await?,
                invoice: None,
            }),
            FormMode::Edit { id } => {
                let (customers, invoice) = tokio::join!(
                    self.repo.fetch_customers(),
                    self.repo.fetch_invoice_by_id(id)
                );
                let invoice = invoice?.ok_or_else(|| Error::not_found("invoice", id.clone()))?;
                Ok(FormContext {
                    customers: customers?,
                    invoice: Some(invoice),
                })
            }
        }
    }

    /// Validate `input` and perform the write.
    ///
    /// A submit while another is in flight is ignored.
    pub async fn submit(&self, input: &InvoiceFormInput) -> SubmitOutcome {
        {
            let mut state = self.state.write().await;
            if state.phase == FormPhase::Submitting {
                debug!("Submit ignored: already submitting");
                return SubmitOutcome::Rejected;
            }
            state.phase = FormPhase::Submitting;
            state.error = None;
        }

        let form = match input.into_form() {
            Ok(form) => form,
            Err(e) => {
                debug!("Form rejected: {}", e);
                self.settle(FormPhase::Idle, Some(e.to_string())).await;
                return SubmitOutcome::Rejected;
            }
        };

        let written = match &self.mode {
            FormMode::Create => self.repo.create_invoice(&form).await.map(|_| ()),
            FormMode::Edit { id } => self.repo.update_invoice(id, &form).await,
        };

        match written {
            Ok(()) => {
                self.settle(FormPhase::Succeeded, None).await;
                SubmitOutcome::Navigate(Route::Invoices(ListLocation::default()))
            }
            Err(e) => {
                warn!("Invoice form write failed: {}", e);
                self.settle(FormPhase::Idle, Some(self.failure_message().to_string()))
                    .await;
                SubmitOutcome::Rejected
            }
        }
    }

    async fn settle(&self, phase: FormPhase, error: Option<String>) {
        let mut state = self.state.write().await;
        state.phase = phase;
        state.error = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyProfile;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;
    use std::time::Duration;

    const DELBA: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";
    const LEE: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";

    fn store() -> InMemoryStore {
        InMemoryStore::seeded(LatencyProfile::instant()).unwrap()
    }

    #[test]
    fn test_amount_rounding() {
        assert_eq!(parse_amount_to_cents("0").unwrap(), 0);
        assert_eq!(parse_amount_to_cents("0.004").unwrap(), 0);
        assert_eq!(parse_amount_to_cents("0.005").unwrap(), 1);
        assert_eq!(parse_amount_to_cents("2.675").unwrap(), 268);
        assert_eq!(parse_amount_to_cents(" 10.10 ").unwrap(), 1010);
        assert_eq!(parse_amount_to_cents("-0").unwrap(), 0);
    }

    #[test]
    fn test_amount_rejects() {
        assert_eq!(
            parse_amount_to_cents("-0.01").unwrap_err(),
            Error::Validation(NEGATIVE_AMOUNT.to_string())
        );
        assert!(parse_amount_to_cents("abc").is_err());
        assert!(parse_amount_to_cents("").is_err());
    }

    #[test]
    fn test_into_form() {
        let form = InvoiceFormInput::new(LEE, "42.5", "paid").into_form().unwrap();
        assert_eq!(form.customer_id, LEE);
        assert_eq!(form.amount, 4250);
        assert_eq!(form.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_into_form_missing_fields() {
        let cases = [
            InvoiceFormInput::default(),
            InvoiceFormInput {
                status: None,
                ..InvoiceFormInput::new(LEE, "1", "paid")
            },
            InvoiceFormInput::new("  ", "1", "paid"),
            InvoiceFormInput::new(LEE, "one", "paid"),
            InvoiceFormInput::new(LEE, "1", "void"),
        ];
        for input in cases {
            assert_eq!(
                input.into_form().unwrap_err(),
                Error::Validation(FILL_OUT_FIELDS.to_string()),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_into_form_negative_amount() {
        let err = InvoiceFormInput::new(LEE, "-5", "paid")
            .into_form()
            .unwrap_err();
        assert_eq!(err.to_string(), NEGATIVE_AMOUNT);
    }

    #[test]
    fn test_from_invoice_prefill() {
        let invoice = Invoice {
            id: "i".to_string(),
            customer_id: LEE.to_string(),
            amount: 20000,
            status: InvoiceStatus::Paid,
            date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        };
        let input = InvoiceFormInput::from_invoice(&invoice);
        assert_eq!(input.amount.as_deref(), Some("200"));
        assert_eq!(input.status.as_deref(), Some("paid"));
        assert_eq!(input.into_form().unwrap().amount, 20000);
    }

    #[test]
    fn test_form_input_field_names() {
        let input: InvoiceFormInput = serde_json::from_str(
            r#"{"customerId": "c1", "amount": "3.50", "status": "pending"}"#,
        )
        .unwrap();
        assert_eq!(input.customer_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_create_success_navigates() {
        let store = store();
        let vm = InvoiceFormViewModel::create(store.clone());

        let outcome = vm.submit(&InvoiceFormInput::new(LEE, "12.34", "pending")).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Navigate(Route::Invoices(ListLocation::default()))
        );
        assert_eq!(vm.phase().await, FormPhase::Succeeded);
        assert_eq!(vm.error().await, None);

        let newest = &store.invoices().await[0];
        assert_eq!(newest.customer_id, LEE);
        assert_eq!(newest.amount, 1234);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_write() {
        let store = store();
        let vm = InvoiceFormViewModel::create(store.clone());

        let outcome = vm.submit(&InvoiceFormInput::default()).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(vm.phase().await, FormPhase::Idle);
        assert_eq!(vm.error().await.as_deref(), Some(FILL_OUT_FIELDS));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_error_cleared_on_next_attempt() {
        let vm = InvoiceFormViewModel::create(store());
        vm.submit(&InvoiceFormInput::default()).await;
        assert!(vm.error().await.is_some());

        vm.submit(&InvoiceFormInput::new(LEE, "1", "paid")).await;
        assert_eq!(vm.error().await, None);
    }

    #[tokio::test]
    async fn test_edit_unknown_id_reports_generic_failure() {
        let vm = InvoiceFormViewModel::edit(store(), "missing");
        let outcome = vm.submit(&InvoiceFormInput::new(LEE, "1", "paid")).await;
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(vm.error().await.as_deref(), Some("Failed to update invoice."));
        assert_eq!(vm.phase().await, FormPhase::Idle);
    }

    #[tokio::test]
    async fn test_edit_updates_in_place() {
        let store = store();
        let vm = InvoiceFormViewModel::edit(store.clone(), DELBA);

        let ctx = vm.load().await.unwrap();
        let mut input = InvoiceFormInput::from_invoice(ctx.invoice.as_ref().unwrap());
        input.status = Some("paid".to_string());

        assert!(matches!(vm.submit(&input).await, SubmitOutcome::Navigate(_)));
        let updated = store.invoices().await[0].clone();
        assert_eq!(updated.id, DELBA);
        assert_eq!(updated.status, InvoiceStatus::Paid);
        assert_eq!(updated.amount, 15795);
    }

    #[tokio::test]
    async fn test_load_contexts() {
        let create = InvoiceFormViewModel::create(store()).load().await.unwrap();
        assert_eq!(create.customers.len(), 3);
        assert!(create.invoice.is_none());

        let err = InvoiceFormViewModel::edit(store(), "missing")
            .load()
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitting_phase_and_label() {
        let latency = LatencyProfile::instant();
        let latency = LatencyProfile {
            create: Duration::from_millis(1000),
            ..latency
        };
        let vm = InvoiceFormViewModel::create(InMemoryStore::seeded(latency).unwrap());
        assert_eq!(vm.submit_label().await, "Create Invoice");

        let input = InvoiceFormInput::new(LEE, "1", "paid");
        let (outcome, (during, label, second)) = tokio::join!(vm.submit(&input), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            (
                vm.is_submitting().await,
                vm.submit_label().await,
                vm.submit(&input).await,
            )
        });

        assert!(during);
        assert_eq!(label, "Creating...");
        assert_eq!(second, SubmitOutcome::Rejected);
        assert!(matches!(outcome, SubmitOutcome::Navigate(_)));
    }

    #[tokio::test]
    async fn test_edit_label() {
        let vm = InvoiceFormViewModel::edit(store(), DELBA);
        assert_eq!(vm.submit_label().await, "Edit Invoice");
    }
}
