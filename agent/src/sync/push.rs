//! Push synchronizer - sends the storefront cart to the remote store.

use super::SyncContext;
use cart_sync_engine::{PushPayload, Result, Watermark};
use chrono::{SecondsFormat, Utc};

/// Performs single push attempts. Retrying is the scheduler's business.
pub struct PushSynchronizer {
    ctx: SyncContext,
    anonymous: bool,
}

impl PushSynchronizer {
    /// `anonymous` allows pushes without a logged-in customer; they carry an
    /// empty customer id and email.
    pub fn new(ctx: SyncContext, anonymous: bool) -> Self {
        Self { ctx, anonymous }
    }

    /// Push the current storefront cart once.
    ///
    /// Returns the watermark recorded for the push, or `None` when the push
    /// was skipped because nobody is logged in and anonymous pushes are off.
    pub async fn push(&self) -> Result<Option<Watermark>> {
        let identity = self.ctx.identity.logged_in();
        if identity.is_none() && !self.anonymous {
            tracing::debug!("No logged-in customer, skipping cart push");
            return Ok(None);
        }

        let cart = self.ctx.storefront.read_cart().await?;
        let line_count = cart.items.len();
        let payload = PushPayload::new(identity.as_ref(), cart);

        let ack = self.ctx.remote.push(&payload).await?;
        let watermark = match ack.added_date() {
            Some(added) => added.clone(),
            None => {
                tracing::warn!("Remote push response carried no addedDate, using local time");
                Watermark::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        };

        self.ctx.set_watermark(watermark.clone()).await?;
        tracing::info!(
            lines = line_count,
            watermark = %watermark,
            "Cart pushed to remote"
        );
        Ok(Some(watermark))
    }
}
