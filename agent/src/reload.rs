//! Page reload requests.
//!
//! Reloading is how a rewritten cart reaches the rendered page. The
//! reconciler only asks for it; the page lifecycle decides what a reload
//! means for the running agent.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Capability to reload the current page.
pub trait PageReloader: Send + Sync {
    fn reload(&self);
}

/// Records reload requests for the page lifecycle to act on.
#[derive(Debug, Default)]
pub struct ReloadRequest {
    pending: AtomicUsize,
    total: AtomicUsize,
}

impl ReloadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume pending requests. True if at least one was made.
    pub fn take(&self) -> bool {
        self.pending.swap(0, Ordering::SeqCst) > 0
    }

    /// Requests made over the lifetime of this value.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl PageReloader for ReloadRequest {
    fn reload(&self) {
        tracing::info!("Page reload requested");
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }
}
