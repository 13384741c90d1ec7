//! Pull reconciler - applies the remote cart on page load.

use super::SyncContext;
use crate::indicator::{LoaderGuard, LoadingIndicator};
use crate::reload::PageReloader;
use cart_sync_engine::{plan, LoadPhase, NoOpReason, ReconcilePlan, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Reconciles the storefront cart with the remote cart, once per page load.
pub struct PullReconciler {
    ctx: SyncContext,
    indicator: Arc<dyn LoadingIndicator>,
    reloader: Arc<dyn PageReloader>,
    phase: Mutex<LoadPhase>,
}

impl PullReconciler {
    pub fn new(
        ctx: SyncContext,
        indicator: Arc<dyn LoadingIndicator>,
        reloader: Arc<dyn PageReloader>,
    ) -> Self {
        Self {
            ctx,
            indicator,
            reloader,
            phase: Mutex::new(LoadPhase::Idle),
        }
    }

    /// Where this page load stands.
    pub fn phase(&self) -> LoadPhase {
        *self.lock_phase()
    }

    /// Run reconciliation for this page load.
    ///
    /// Only the first call does any work; later calls return the phase the
    /// first one settled in. Errors leave the storefront cart and the
    /// watermark as they were and settle the page in [`LoadPhase::Failed`].
    pub async fn reconcile(&self) -> Result<LoadPhase> {
        let started = self.lock_phase().begin();
        if !started {
            let phase = self.phase();
            tracing::debug!(?phase, "Cart already reconciled for this page");
            return Ok(phase);
        }

        let result = self.run().await;
        let outcome = match &result {
            Ok(phase) => *phase,
            Err(err) => {
                tracing::error!(error = %err, "Cart reconciliation failed");
                LoadPhase::Failed
            }
        };
        self.lock_phase().finish(outcome);
        result
    }

    async fn run(&self) -> Result<LoadPhase> {
        let Some(identity) = self.ctx.identity.logged_in() else {
            self.ctx.clear_watermark().await?;
            tracing::debug!("No logged-in customer, watermark cleared");
            return Ok(LoadPhase::NoOp);
        };

        let _loader = LoaderGuard::show(self.indicator.as_ref());

        let applied = self.ctx.watermark().await?;
        let local = self.ctx.storefront.read_cart().await?;
        let remote = self.ctx.remote.fetch(&identity.email).await?;

        let (decision, reason) = plan(&local, remote.as_ref(), applied.as_ref());
        match decision {
            ReconcilePlan::NoOp => {
                if reason == Some(NoOpReason::MissingAddedDate) {
                    tracing::warn!("Remote cart has items but no addedDate, not applying");
                } else {
                    tracing::debug!(?reason, "Cart already in sync");
                }
                Ok(LoadPhase::NoOp)
            }
            ReconcilePlan::ClearLocal => {
                self.ctx.storefront.clear_cart().await?;
                tracing::info!(
                    stale_lines = local.items.len(),
                    "Remote cart is empty, cleared storefront cart"
                );
                self.reloader.reload();
                Ok(LoadPhase::Reloading)
            }
            ReconcilePlan::ReplaceLocal {
                line_items,
                watermark,
            } => {
                self.ctx.storefront.clear_cart().await?;
                self.ctx.storefront.add_items(&line_items).await?;
                self.ctx.set_watermark(watermark.clone()).await?;
                tracing::info!(
                    lines = line_items.len(),
                    previous = ?applied,
                    watermark = %watermark,
                    "Replaced storefront cart with remote cart"
                );
                self.reloader.reload();
                Ok(LoadPhase::Reloading)
            }
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, LoadPhase> {
        // LoadPhase is Copy; a poisoned lock still holds a valid value.
        self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }
}
