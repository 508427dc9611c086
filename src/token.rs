//! Generation counter used to discard superseded async results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic generation source.
///
/// Every request takes a ticket with [`next`](Self::next); when its result
/// arrives, [`is_current`](Self::is_current) tells whether a newer request
/// was issued in the meantime. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct GenerationClock {
    latest: Arc<AtomicU64>,
}

impl GenerationClock {
    /// Creates a new clock. The first ticket is generation 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next generation, superseding all earlier ones.
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    /// Latest issued generation, 0 if none.
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// True if no ticket was issued after `generation`.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}
