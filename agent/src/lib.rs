//! Cart Sync Agent - keeps a storefront cart in step with the customer's
//! durable remote cart.
//!
//! The agent sits between shoppers and the storefront as a thin HTTP
//! interceptor. Cart mutations passing through it schedule a debounced push
//! to the remote cart store; every page load passing through it first
//! reconciles the storefront cart against the remote cart using the engine's
//! watermark policy.

pub mod config;
pub mod error;
pub mod indicator;
pub mod lifecycle;
pub mod proxy;
pub mod reload;
pub mod remote;
pub mod routes;
pub mod session;
pub mod storefront;
pub mod sync;
pub mod watermark;

use crate::config::Config;
use crate::lifecycle::PageLifecycle;
use crate::proxy::StorefrontProxy;
use crate::sync::PushScheduler;
use axum::Router;
use cart_sync_engine::ChangeDetector;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub detector: Arc<ChangeDetector>,
    pub proxy: Arc<StorefrontProxy>,
    pub scheduler: PushScheduler,
    pub lifecycle: Arc<PageLifecycle>,
}

/// Build the interceptor application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
