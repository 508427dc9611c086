//! Metrics hooks for data-access operations.
//!
//! Implement [`RepositoryMetrics`] to feed latency and error counts into a
//! monitoring system:
//!
//! ```ignore
//! use invoice_kit::observability::RepositoryMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl RepositoryMetrics for PrometheusMetrics {
//!     fn record_read(&self, op: &str, duration: Duration) {
//!         // histogram!("invoice_read_latency", "op" => op).record(duration);
//!     }
//! }
//!
//! // let store = InMemoryStore::seeded(latency)?.with_metrics(Arc::new(PrometheusMetrics));
//! ```
//!
//! The default sink is [`LogMetrics`], which logs via the `log` crate.

use std::time::Duration;

/// Trait for data-access metrics collection.
pub trait RepositoryMetrics: Send + Sync {
    /// Record a completed read.
    fn record_read(&self, op: &str, duration: Duration) {
        debug!("READ {} took {:?}", op, duration);
    }

    /// Record a completed write.
    fn record_write(&self, op: &str, duration: Duration) {
        debug!("WRITE {} took {:?}", op, duration);
    }

    /// Record a failed operation.
    fn record_error(&self, op: &str, error: &str) {
        warn!("{} failed: {}", op, error);
    }
}

/// Metrics sink that only logs. Used unless another is attached.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl RepositoryMetrics for LogMetrics {}

/// Metrics sink that does nothing.
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl RepositoryMetrics for NoOpMetrics {
    fn record_read(&self, _op: &str, _duration: Duration) {}
    fn record_write(&self, _op: &str, _duration: Duration) {}
    fn record_error(&self, _op: &str, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        events: Mutex<Vec<String>>,
    }

    impl RepositoryMetrics for Recording {
        fn record_read(&self, op: &str, _duration: Duration) {
            self.events.lock().unwrap().push(format!("read:{}", op));
        }

        fn record_error(&self, op: &str, error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error:{}:{}", op, error));
        }
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_read("fetch_revenue", Duration::from_millis(1));
        metrics.record_error("update_invoice", "not found");
    }

    #[test]
    fn test_custom_metrics_overrides() {
        let metrics = Recording::default();
        metrics.record_read("fetch_customers", Duration::ZERO);
        metrics.record_write("create_invoice", Duration::ZERO);
        metrics.record_error("update_invoice", "gone");

        let events = metrics.events.lock().unwrap();
        assert_eq!(
            *events,
            vec!["read:fetch_customers", "error:update_invoice:gone"]
        );
    }
}
