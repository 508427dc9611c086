//! Trailing-edge debounce for async callers.

use crate::token::GenerationClock;
use std::time::Duration;

/// Coalesces bursts of values into the last one.
///
/// Each [`settle`](Self::settle) call waits out the quiet window and yields
/// its value only if no later call arrived meanwhile. A burst of calls closer
/// together than the window therefore yields exactly one value: the final one,
/// one window after it was submitted.
///
/// ```
/// use invoice_kit::debounce::Debouncer;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// let debouncer = Debouncer::new(Duration::from_millis(500));
/// let (a, b) = tokio::join!(debouncer.settle("inv"), async {
///     tokio::time::sleep(Duration::from_millis(100)).await;
///     debouncer.settle("invoice").await
/// });
/// assert_eq!(a, None);
/// assert_eq!(b, Some("invoice"));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    clock: GenerationClock,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet window. A zero window passes
    /// every value through without sleeping.
    pub fn new(window: Duration) -> Self {
        Debouncer {
            window,
            clock: GenerationClock::new(),
        }
    }

    /// Wait out the window; `None` if superseded by a later call.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.clock.next();
        if !self.window.is_zero() {
            tokio::time::sleep(self.window).await;
        }

        if self.clock.is_current(ticket) {
            Some(value)
        } else {
            debug!("Debounce: generation {} superseded", ticket);
            None
        }
    }

    /// Supersede any pending call without submitting a value.
    pub fn cancel(&self) {
        self.clock.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_single_value_passes_after_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let started = Instant::now();
        assert_eq!(debouncer.settle(1).await, Some(1));
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_last_value_only() {
        let debouncer = Debouncer::new(Duration::from_millis(500));

        let typed = |value: &'static str, at: u64| {
            let debouncer = &debouncer;
            async move {
                sleep(Duration::from_millis(at)).await;
                debouncer.settle(value).await
            }
        };

        let (a, b, c) = tokio::join!(typed("i", 0), typed("in", 200), typed("inv", 400));
        assert_eq!((a, b, c), (None, None, Some("inv")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_values_outside_window_both_pass() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        assert_eq!(debouncer.settle("a").await, Some("a"));
        assert_eq!(debouncer.settle("b").await, Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_value() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let (value, _) = tokio::join!(debouncer.settle("a"), async {
            sleep(Duration::from_millis(10)).await;
            debouncer.cancel();
        });
        assert_eq!(value, None);
    }
}
