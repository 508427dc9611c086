//! Configuration for the mock store and the list view-model.
//!
//! Everything has a `Default` matching the reference dashboard. Tests use
//! [`LatencyProfile::instant`] or paused tokio time instead of tuning values.

use crate::error::{Error, Result};
use std::time::Duration;

/// Environment variable overriding the list debounce window, in milliseconds.
pub const ENV_DEBOUNCE_MS: &str = "INVOICE_KIT_DEBOUNCE_MS";

/// Environment variable selecting the store latency: `off`, `reference`, or a scale factor.
pub const ENV_LATENCY: &str = "INVOICE_KIT_LATENCY";

/// Simulated latency of each data-access operation.
///
/// Latency is configuration only; nothing in the crate depends on its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatencyProfile {
    pub revenue: Duration,
    pub latest_invoices: Duration,
    pub card_data: Duration,
    pub filtered_invoices: Duration,
    pub invoices_pages: Duration,
    pub invoice_by_id: Duration,
    pub customers: Duration,
    pub customer_by_id: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl LatencyProfile {
    /// No delay anywhere.
    pub fn instant() -> Self {
        Self::uniform(Duration::ZERO)
    }

    /// Same delay for every operation.
    pub fn uniform(d: Duration) -> Self {
        LatencyProfile {
            revenue: d,
            latest_invoices: d,
            card_data: d,
            filtered_invoices: d,
            invoices_pages: d,
            invoice_by_id: d,
            customers: d,
            customer_by_id: d,
            create: d,
            update: d,
            delete: d,
        }
    }

    /// Every delay multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        let s = |d: Duration| d.mul_f64(factor);
        LatencyProfile {
            revenue: s(self.revenue),
            latest_invoices: s(self.latest_invoices),
            card_data: s(self.card_data),
            filtered_invoices: s(self.filtered_invoices),
            invoices_pages: s(self.invoices_pages),
            invoice_by_id: s(self.invoice_by_id),
            customers: s(self.customers),
            customer_by_id: s(self.customer_by_id),
            create: s(self.create),
            update: s(self.update),
            delete: s(self.delete),
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "off" | "0" => Ok(Self::instant()),
            "reference" => Ok(Self::default()),
            other => {
                let factor: f64 = other.parse().map_err(|_| {
                    Error::Config(format!("{} must be off, reference or a number", ENV_LATENCY))
                })?;
                if !factor.is_finite() || factor < 0.0 {
                    return Err(Error::Config(format!(
                        "{} scale must be a non-negative number, got {}",
                        ENV_LATENCY, other
                    )));
                }
                Ok(Self::default().scaled(factor))
            }
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        let ms = Duration::from_millis;
        LatencyProfile {
            revenue: ms(750),
            latest_invoices: ms(1000),
            card_data: ms(500),
            filtered_invoices: ms(500),
            invoices_pages: ms(200),
            invoice_by_id: ms(500),
            customers: ms(300),
            customer_by_id: ms(100),
            create: ms(1000),
            update: ms(1000),
            delete: ms(500),
        }
    }
}

/// List view-model settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListConfig {
    /// Quiet period after the last keystroke before a search fires.
    pub debounce: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            debounce: Duration::from_millis(500),
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```
/// use invoice_kit::config::{Config, LatencyProfile};
/// use std::time::Duration;
///
/// let config = Config::default()
///     .with_latency(LatencyProfile::instant())
///     .with_debounce(Duration::from_millis(250));
/// assert_eq!(config.list.debounce, Duration::from_millis(250));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub latency: LatencyProfile,
    pub list: ListConfig,
}

impl Config {
    /// Override the store latency profile.
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Override the search debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.list.debounce = debounce;
        self
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// # Errors
    /// Returns `Error::Config` if a variable is set but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be an integer, got {:?}", ENV_DEBOUNCE_MS, raw))
            })?;
            config.list.debounce = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_LATENCY) {
            config.latency = LatencyProfile::parse(&raw)?;
        }

        debug!(
            "Loaded config: debounce {:?}, filtered-invoices latency {:?}",
            config.list.debounce, config.latency.filtered_invoices
        );
        Ok(config)
    }
}
