//! Page lifecycle.
//!
//! Each page load reconciles once with a fresh reconciler. When
//! reconciliation asks for a reload, the pending push work of the old page is
//! dropped and the shopper is sent round again. The watermark guarantees the
//! next load settles without another reload.

use crate::indicator::LoadingIndicator;
use crate::reload::ReloadRequest;
use crate::sync::{PullReconciler, PushScheduler, SyncContext};
use cart_sync_engine::LoadPhase;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// How one page load settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLoad {
    pub phase: LoadPhase,
    pub reload: bool,
}

/// Drives page loads for one shopper session.
pub struct PageLifecycle {
    ctx: SyncContext,
    scheduler: PushScheduler,
    indicator: Arc<dyn LoadingIndicator>,
    reloads: AtomicUsize,
}

impl PageLifecycle {
    pub fn new(
        ctx: SyncContext,
        scheduler: PushScheduler,
        indicator: Arc<dyn LoadingIndicator>,
    ) -> Self {
        Self {
            ctx,
            scheduler,
            indicator,
            reloads: AtomicUsize::new(0),
        }
    }

    /// Run one page load.
    pub async fn load_page(&self) -> PageLoad {
        let request = Arc::new(ReloadRequest::new());
        let reconciler =
            PullReconciler::new(self.ctx.clone(), self.indicator.clone(), request.clone());
        // Errors are logged by the reconciler; the page carries on regardless.
        let _ = reconciler.reconcile().await;

        let reload = request.take();
        if reload {
            self.reloads.fetch_add(1, Ordering::SeqCst);
            self.scheduler.unload();
        }
        PageLoad {
            phase: reconciler.phase(),
            reload,
        }
    }

    /// Load pages until one settles without asking for a reload.
    ///
    /// Returns the number of page loads performed.
    pub async fn run(&self) -> usize {
        let mut loads = 0;
        loop {
            loads += 1;
            let page = self.load_page().await;
            tracing::info!(page = loads, phase = ?page.phase, "Page load settled");

            if !page.reload {
                return loads;
            }
        }
    }

    /// Reloads requested so far.
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}
