//! Cart Sync Agent - keeps a storefront cart in step with the customer's
//! remote cart.
//!
//! Runs the interceptor in front of the storefront and drives page loads for
//! the configured shopper session.

use cart_sync_agent::config::Config;
use cart_sync_agent::indicator::LogIndicator;
use cart_sync_agent::lifecycle::PageLifecycle;
use cart_sync_agent::proxy::StorefrontProxy;
use cart_sync_agent::remote::HttpRemoteStore;
use cart_sync_agent::session::StaticIdentity;
use cart_sync_agent::storefront::HttpStorefront;
use cart_sync_agent::sync::{PushScheduler, PushSynchronizer, SyncContext};
use cart_sync_agent::watermark::FileWatermarkStore;
use cart_sync_agent::AppState;
use cart_sync_engine::ChangeDetector;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cart_sync_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(
        storefront = %config.storefront_url,
        remote = %config.remote_cart_url,
        "Starting Cart Sync Agent on {}:{}",
        config.host,
        config.port
    );

    // The agent's own storefront calls carry the shopper's session cookie
    let mut storefront_headers = HeaderMap::new();
    if let Some(cookie) = &config.storefront_cookie {
        storefront_headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
    }
    let storefront_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .default_headers(storefront_headers)
        .build()?;
    let proxy_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let remote_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let ctx = SyncContext {
        storefront: Arc::new(HttpStorefront::new(
            storefront_client,
            config.storefront_url.clone(),
        )),
        remote: Arc::new(HttpRemoteStore::new(
            remote_client,
            config.remote_cart_url.clone(),
        )),
        identity: Arc::new(StaticIdentity::new(config.customer.clone())),
        watermarks: Arc::new(FileWatermarkStore::new(&config.watermark_path)),
    };

    let pusher = Arc::new(PushSynchronizer::new(ctx.clone(), config.anonymous_push));
    let (scheduler, worker) = PushScheduler::spawn(pusher, config.policy);
    let lifecycle = Arc::new(PageLifecycle::new(
        ctx,
        scheduler.clone(),
        Arc::new(LogIndicator),
    ));

    // Build application state
    let state = AppState {
        config: Arc::new(config.clone()),
        detector: Arc::new(ChangeDetector::for_storefront(
            config.storefront_url.as_str(),
        )),
        proxy: Arc::new(StorefrontProxy::new(
            proxy_client,
            config.storefront_url.clone(),
        )),
        scheduler,
        lifecycle: lifecycle.clone(),
    };
    let app = cart_sync_agent::app(state);

    // Reconcile once before the first shopper request arrives
    tokio::spawn(async move {
        let loads = lifecycle.run().await;
        tracing::info!(loads, reloads = lifecycle.reloads(), "Cart reconciled");
    });

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Interceptor listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last scheduler handles; a pending push goes out now
    match tokio::time::timeout(config.http_timeout, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!(error = %err, "Push worker failed"),
        Err(_) => tracing::warn!("Push worker still busy at shutdown"),
    }

    tracing::info!("Cart Sync Agent stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
