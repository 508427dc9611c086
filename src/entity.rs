//! Records exchanged between the data-access layer and the view-models.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trait implemented by every stored record.
///
/// # Example
///
/// ```
/// use invoice_kit::entity::{Customer, Entity};
///
/// let customer = Customer {
///     id: "c1".to_string(),
///     name: "Lee Robinson".to_string(),
///     email: "lee@robinson.com".to_string(),
///     image_url: String::new(),
/// };
/// assert_eq!(customer.entity_id(), "c1");
/// assert_eq!(Customer::kind(), "customer");
/// ```
pub trait Entity: Clone + Send + Sync + Serialize + for<'de> Deserialize<'de> {
    /// Return the record's unique id.
    fn entity_id(&self) -> &str;

    /// Return the record kind, used in log lines and not-found errors.
    fn kind() -> &'static str;
}

/// Linear lookup by id over an owned collection.
pub(crate) fn find_by_id<'a, T: Entity>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.entity_id() == id)
}

/// A customer. Never edited by this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

impl Entity for Customer {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn kind() -> &'static str {
        "customer"
    }
}

/// Invoice lifecycle status. There is no other state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Wire name, as stored and searched.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Badge text shown in the invoices table.
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(Error::Validation(format!("unknown status: {}", other))),
        }
    }
}

/// An invoice. `amount` is in cents; `date` is the creation date and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl Invoice {
    /// Overwrite the mutable subset. `id` and `date` are untouched.
    pub fn apply(&mut self, form: &InvoiceForm) {
        self.customer_id = form.customer_id.clone();
        self.amount = form.amount;
        self.status = form.status;
    }
}

impl Entity for Invoice {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn kind() -> &'static str {
        "invoice"
    }
}

/// One month of the revenue chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: i64,
}

/// Invoice joined with its customer's display fields, amount pre-formatted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub amount: String,
}

/// Customer reduced to what a select list needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

impl From<&Customer> for CustomerField {
    fn from(c: &Customer) -> Self {
        CustomerField {
            id: c.id.clone(),
            name: c.name.clone(),
        }
    }
}

/// Write payload for create and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceForm {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Aggregates shown on the dashboard cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub number_of_customers: usize,
    pub number_of_invoices: usize,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}
