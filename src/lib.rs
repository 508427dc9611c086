//! # invoice-kit
//!
//! The core of an invoice dashboard: formatting, a swappable async data
//! layer, and the view-models behind the list, form and overview screens.
//!
//! ## Features
//!
//! - **Repository Agnostic:** view-models talk to [`InvoiceRepository`]; the bundled
//!   [`InMemoryStore`] serves mock data with simulated latency
//! - **Debounced Search:** keystrokes settle for a configurable window before a fetch
//! - **Stale-Result Safe:** a late response never overwrites a newer one
//! - **Bookmarkable:** list state lives in a `?query=..&page=..` location
//! - **Integer Money:** amounts are cents end to end, converted with exact decimals
//!
//! ## Quick Start
//!
//! ```no_run
//! use invoice_kit::{Config, InvoiceApp};
//! use invoice_kit::app::Screen;
//!
//! # #[tokio::main] async fn main() -> invoice_kit::Result<()> {
//! let mut app = InvoiceApp::demo(Config::from_env()?)?;
//! app.login("user@nextmail.com", "123456")?;
//!
//! if let Screen::Invoices(list) = app.open("/invoices?query=paid") {
//!     list.refresh().await;
//!     for row in list.snapshot().await.rows() {
//!         println!("{} {} {}", row.name, row.amount, row.status);
//!     }
//! }
//! # Ok(()) }
//! ```
//!
//! ### Custom data sources
//!
//! Implement [`InvoiceRepository`] and hand it to [`InvoiceApp::new`]. The
//! view-models only rely on the trait's documented semantics.

#[macro_use]
extern crate log;

pub mod app;
pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod entity;
pub mod error;
pub mod form;
pub mod format;
pub mod list;
pub mod location;
pub mod observability;
pub mod repository;
pub mod route;
pub mod session;
pub mod store;
pub mod token;

// Re-exports for convenience
pub use app::InvoiceApp;
pub use config::Config;
pub use dashboard::DashboardViewModel;
pub use entity::{Customer, Invoice, InvoiceStatus};
pub use error::{Error, Result};
pub use form::{InvoiceFormInput, InvoiceFormViewModel};
pub use list::InvoicesViewModel;
pub use location::ListLocation;
pub use repository::InvoiceRepository;
pub use route::Route;
pub use store::InMemoryStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
