//! # Cart Sync Engine
//!
//! Deterministic core for keeping a storefront cart in step with a durable
//! remote cart record keyed by customer identity.
//!
//! The engine performs no IO. It owns the data model, the wire shapes, and
//! the decisions; the agent crate performs the network calls, timers and
//! page reloads those decisions call for.
//!
//! ## Core Concepts
//!
//! ### Change detection
//!
//! [`ChangeDetector`] classifies outgoing calls. Only storefront cart
//! mutations (`/cart/add`, `/cart/change`, `/cart/update`) count, so the
//! remote sync call can never trigger itself.
//!
//! ### Retry
//!
//! [`RetryState`] counts failed pushes against a [`SyncPolicy`]. Backoff is
//! constant and the budget resets on success.
//!
//! ### Watermark
//!
//! A [`Watermark`] is the `addedDate` of the last remote cart pushed or
//! applied. [`WatermarkStore`] persists it; reconciliation never applies a
//! remote cart whose `addedDate` equals it.
//!
//! ### Reconciliation
//!
//! [`plan`] compares local cart, remote cart and watermark and returns a
//! [`ReconcilePlan`]. [`LoadPhase`] tracks the once-per-page lifecycle.
//!
//! ## Quick Start
//!
//! ```rust
//! use cart_sync_engine::{plan, LineItem, LocalCart, ReconcilePlan, RemoteCart, Watermark};
//!
//! let local = LocalCart::new(vec![LineItem::new(1, 1)]);
//! let remote = RemoteCart::new(vec![LineItem::new(2, 1)], "2024-01-02");
//! let applied = Watermark::from("2024-01-01");
//!
//! let (decision, _) = plan(&local, Some(&remote), Some(&applied));
//! assert!(matches!(decision, ReconcilePlan::ReplaceLocal { .. }));
//! ```

pub mod cart;
pub mod detector;
pub mod error;
pub mod reconcile;
pub mod retry;
pub mod watermark;

// Re-export main types at crate root
pub use cart::{
    AddItem, AddItemsRequest, Identity, LineItem, LocalCart, Properties, PushAck, PushPayload,
    RemoteCart, RemoteCartEnvelope,
};
pub use detector::{CartCall, ChangeDetector};
pub use error::{CartOperation, Error, Result};
pub use reconcile::{plan, LoadPhase, NoOpReason, ReconcilePlan};
pub use retry::{RetryDecision, RetryState, SyncPolicy};
pub use watermark::{MemoryWatermarkStore, Watermark, WatermarkStore};

/// Type aliases for clarity
pub type VariantId = u64;
pub type Quantity = u32;
