//! Reconciliation policy for a page load.
//!
//! Given the local cart, the remote cart and the stored watermark, decide
//! whether the local cart must be rewritten. The decision is pure; carrying
//! it out (clear, add, persist, reload) is the caller's job.
//!
//! # Policy
//!
//! Evaluated in order:
//!
//! 1. Remote empty, local non-empty: clear the local cart and reload. The
//!    watermark is left alone.
//! 2. Remote non-empty and `addedDate` differs from the watermark: clear the
//!    local cart, add the remote line items, store `addedDate` as the new
//!    watermark and reload.
//!
//! The two rules cannot both match. Anything else is a no-op.

use crate::{LineItem, LocalCart, RemoteCart, Watermark};
use serde::{Deserialize, Serialize};

/// What a page load should do to the local cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilePlan {
    /// Leave everything untouched.
    NoOp,
    /// Remote cart was emptied elsewhere; drop the stale local items.
    ClearLocal,
    /// Remote cart is newer than anything applied here.
    ReplaceLocal {
        line_items: Vec<LineItem>,
        watermark: Watermark,
    },
}

impl ReconcilePlan {
    /// Whether carrying out this plan ends with a page reload.
    pub fn requires_reload(&self) -> bool {
        !matches!(self, ReconcilePlan::NoOp)
    }
}

/// Why a plan is a no-op. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    NoRemoteCart,
    BothEmpty,
    AlreadyApplied,
    MissingAddedDate,
}

/// Decide how to reconcile a page load.
///
/// `remote` is `None` when the customer has no saved cart.
pub fn plan(
    local: &LocalCart,
    remote: Option<&RemoteCart>,
    watermark: Option<&Watermark>,
) -> (ReconcilePlan, Option<NoOpReason>) {
    let Some(remote) = remote else {
        return (ReconcilePlan::NoOp, Some(NoOpReason::NoRemoteCart));
    };

    if remote.is_empty() {
        if local.is_empty() {
            return (ReconcilePlan::NoOp, Some(NoOpReason::BothEmpty));
        }
        return (ReconcilePlan::ClearLocal, None);
    }

    match &remote.added_date {
        None => (ReconcilePlan::NoOp, Some(NoOpReason::MissingAddedDate)),
        Some(added) if Some(added) == watermark => {
            (ReconcilePlan::NoOp, Some(NoOpReason::AlreadyApplied))
        }
        Some(added) => (
            ReconcilePlan::ReplaceLocal {
                line_items: remote.line_items.clone(),
                watermark: added.clone(),
            },
            None,
        ),
    }
}

/// Lifecycle of reconciliation within one page load.
///
/// `Idle -> Reconciling -> {NoOp, Reloading, Failed}`. The three outcomes are
/// terminal for the page: reconciliation never runs twice in one lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadPhase {
    #[default]
    Idle,
    Reconciling,
    NoOp,
    Reloading,
    Failed,
}

impl LoadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoadPhase::NoOp | LoadPhase::Reloading | LoadPhase::Failed
        )
    }

    /// Move from `Idle` to `Reconciling`. Returns false if reconciliation
    /// already started for this page.
    pub fn begin(&mut self) -> bool {
        if *self == LoadPhase::Idle {
            *self = LoadPhase::Reconciling;
            true
        } else {
            false
        }
    }

    /// Settle a running reconciliation. Ignored unless `Reconciling` and the
    /// target is terminal.
    pub fn finish(&mut self, outcome: LoadPhase) {
        if *self == LoadPhase::Reconciling && outcome.is_terminal() {
            *self = outcome;
        }
    }
}
