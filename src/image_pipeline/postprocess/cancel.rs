use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Coarse-grained abort signal checked by the pipeline between stages.
///
/// Clones share the same flag, so a UI thread can hold one end while a worker
/// runs the pipeline with the other.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
