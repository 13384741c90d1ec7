//! The cart synchronization engine: push on change, reconcile on load.

mod pull;
mod push;
mod scheduler;

pub use pull::PullReconciler;
pub use push::PushSynchronizer;
pub use scheduler::PushScheduler;

use crate::remote::RemoteCartStore;
use crate::session::IdentityProvider;
use crate::storefront::StorefrontCart;
use cart_sync_engine::{Error, Result, Watermark, WatermarkStore};
use std::sync::Arc;

/// Collaborators shared by the push and pull sides.
#[derive(Clone)]
pub struct SyncContext {
    pub storefront: Arc<dyn StorefrontCart>,
    pub remote: Arc<dyn RemoteCartStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub watermarks: Arc<dyn WatermarkStore>,
}

impl SyncContext {
    pub async fn watermark(&self) -> Result<Option<Watermark>> {
        self.with_watermarks(|store| store.get()).await
    }

    pub async fn set_watermark(&self, watermark: Watermark) -> Result<()> {
        self.with_watermarks(move |store| store.set(&watermark)).await
    }

    pub async fn clear_watermark(&self) -> Result<()> {
        self.with_watermarks(|store| store.clear()).await
    }

    /// Watermark stores may block on disk; keep them off the event loop.
    async fn with_watermarks<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn WatermarkStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.watermarks);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| Error::Storage(format!("watermark task failed: {e}")))?
    }
}
