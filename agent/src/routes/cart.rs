//! Storefront interception.
//!
//! Every request that is not the agent's own is forwarded to the storefront.
//! Page loads reconcile the cart first; a load whose reconciliation rewrote
//! the cart is answered with a redirect back to itself, which is the reload.
//! Once the storefront has answered, cart mutations notify the push
//! scheduler.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Redirect, Response},
    Router,
};
use cart_sync_engine::CartCall;

use crate::error::Result;
use crate::AppState;

/// Create the catch-all interception route.
pub fn routes() -> Router<AppState> {
    Router::new().fallback(intercept)
}

/// Any method, any path - reconcile page loads, forward, then detect.
async fn intercept(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let call = CartCall::new(method.as_str(), uri.to_string());
    let mutation = state.detector.is_cart_mutation(&call);

    if !mutation && is_page_load(&method, &headers) {
        let page = state.lifecycle.load_page().await;
        if page.reload {
            let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
            tracing::debug!(
                location = target,
                phase = ?page.phase,
                "Reloading page after reconciliation"
            );
            return Ok(Redirect::to(target).into_response());
        }
    }

    let response = state.proxy.forward(method, &uri, &headers, body).await?;

    if mutation {
        tracing::debug!(
            method = %call.method,
            url = %call.url,
            status = %response.status(),
            "Cart mutation intercepted"
        );
        state.scheduler.notify();
    }

    Ok(response)
}

/// A browser navigation: a document `GET`, as opposed to scripts fetching
/// assets or JSON.
fn is_page_load(method: &Method, headers: &HeaderMap) -> bool {
    if *method != Method::GET {
        return false;
    }
    if let Some(dest) = headers.get("sec-fetch-dest") {
        return dest.as_bytes() == b"document";
    }
    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
