//! Dashboard overview: summary cards, revenue chart, latest invoices.

use crate::entity::{CardData, LatestInvoice, RevenuePoint};
use crate::error::Result;
use crate::format::{generate_y_axis, YAxis};
use crate::repository::InvoiceRepository;

/// Which summary a dashboard card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardKind {
    Collected,
    Pending,
    Invoices,
    Customers,
}

impl CardKind {
    /// Card heading.
    pub fn title(&self) -> &'static str {
        match self {
            CardKind::Collected => "Collected",
            CardKind::Pending => "Pending",
            CardKind::Invoices => "Total Invoices",
            CardKind::Customers => "Total Customers",
        }
    }
}

/// One summary card; `value` is display-ready.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub kind: CardKind,
    pub title: &'static str,
    pub value: String,
}

impl Card {
    fn new(kind: CardKind, value: impl ToString) -> Self {
        Card {
            kind,
            title: kind.title(),
            value: value.to_string(),
        }
    }

    /// The four cards, in display order.
    pub fn from_data(data: &CardData) -> Vec<Card> {
        vec![
            Card::new(CardKind::Collected, &data.total_paid_invoices),
            Card::new(CardKind::Pending, &data.total_pending_invoices),
            Card::new(CardKind::Invoices, data.number_of_invoices),
            Card::new(CardKind::Customers, data.number_of_customers),
        ]
    }
}

/// Everything the overview page renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardView {
    pub cards: Vec<Card>,
    pub revenue: Vec<RevenuePoint>,
    pub y_axis: YAxis,
    pub latest_invoices: Vec<LatestInvoice>,
}

impl DashboardView {
    /// The chart is replaced by a placeholder when there is no series.
    pub fn has_revenue(&self) -> bool {
        !self.revenue.is_empty()
    }
}

/// View-model behind the overview page.
///
/// Stateless: each [`load`](Self::load) fetches a fresh [`DashboardView`].
pub struct DashboardViewModel<R: InvoiceRepository> {
    repo: R,
}

impl<R: InvoiceRepository> DashboardViewModel<R> {
    /// Creates a view-model reading from `repo`.
    pub fn new(repo: R) -> Self {
        DashboardViewModel { repo }
    }

    /// Fetch the three panels concurrently.
    ///
    /// # Errors
    /// Returns the first repository error; no partial view is produced.
    pub async fn load(&self) -> Result<DashboardView> {
        let (revenue, latest, cards) = tokio::join!(
            self.repo.fetch_revenue(),
            self.repo.fetch_latest_invoices(),
            self.repo.fetch_card_data()
        );
        let revenue = revenue?;
        let cards = Card::from_data(&cards?);

        debug!("Dashboard loaded: {} revenue points", revenue.len());
        Ok(DashboardView {
            cards,
            y_axis: generate_y_axis(&revenue),
            revenue,
            latest_invoices: latest?,
        })
    }
}
