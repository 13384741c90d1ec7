//! Forwarding of intercepted requests to the storefront.

use crate::error::Result;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, Method, Uri},
    response::Response,
};
use reqwest::Url;

/// Headers that describe a single hop and are never forwarded.
static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHORIZATION,
];

/// Reverse proxy to the storefront origin.
#[derive(Debug, Clone)]
pub struct StorefrontProxy {
    client: reqwest::Client,
    base: Url,
}

impl StorefrontProxy {
    /// Request paths are appended to the path of `base`.
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Forward a request and relay the storefront's answer.
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response> {
        let url = self.upstream_url(uri);
        let upstream = self
            .client
            .request(method, url)
            .headers(end_to_end(headers))
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let response_headers = end_to_end(upstream.headers());
        let bytes = upstream.bytes().await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }

    /// The storefront URL for an incoming request. Scheme, host and port
    /// always come from `base`, whatever the request path looks like.
    fn upstream_url(&self, uri: &Uri) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{}", self.base.path().trim_end_matches('/'), uri.path());
        url.set_path(&path);
        url.set_query(uri.query());
        url
    }
}

fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();
    for name in HOP_BY_HOP.iter() {
        forwarded.remove(name);
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn strips_hop_by_hop_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("agent.local"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        headers.insert(header::COOKIE, HeaderValue::from_static("cart=abc"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let forwarded = end_to_end(&headers);
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[header::COOKIE], "cart=abc");
        assert!(forwarded.get(header::HOST).is_none());
    }

    fn proxy(base: &str) -> StorefrontProxy {
        StorefrontProxy::new(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn upstream_url_keeps_path_and_query() {
        let proxy = proxy("https://shop.example.com/");
        let uri: Uri = "/cart/change.js?line=1".parse().unwrap();
        assert_eq!(
            proxy.upstream_url(&uri).as_str(),
            "https://shop.example.com/cart/change.js?line=1"
        );
    }

    #[test]
    fn upstream_url_keeps_base_path() {
        let proxy = proxy("https://example.com/shop/");
        let uri: Uri = "/cart.js".parse().unwrap();
        assert_eq!(
            proxy.upstream_url(&uri).as_str(),
            "https://example.com/shop/cart.js"
        );
    }

    #[test]
    fn scheme_like_paths_stay_on_the_storefront() {
        let proxy = proxy("https://shop.example.com/");
        for path in ["/http:127.0.0.1:41385/steal", "//evil.example/x", "/https://evil.example/"] {
            let uri: Uri = path.parse().unwrap();
            let url = proxy.upstream_url(&uri);
            assert_eq!(url.host_str(), Some("shop.example.com"), "{path}");
            assert_eq!(url.scheme(), "https", "{path}");
            assert_eq!(url.port(), None, "{path}");
        }
    }
}
