//! Detection of storefront cart mutations.
//!
//! The detector looks at an outgoing call (method + URL) and decides whether
//! it may have changed the cart. Only storefront-local endpoints are
//! considered: relative URLs, or absolute URLs on the storefront's own
//! origin. The remote sync endpoint therefore never triggers another push.

use serde::{Deserialize, Serialize};

/// Path segment that namespaces the storefront cart endpoints.
const CART_SEGMENT: &str = "cart";

/// Endpoint names under the cart namespace that mutate the cart.
const MUTATING_ENDPOINTS: [&str; 3] = ["add", "change", "update"];

/// Methods that never change server state.
const PROBE_METHODS: [&str; 2] = ["HEAD", "OPTIONS"];

/// Description of an outgoing network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCall {
    pub method: String,
    pub url: String,
}

impl CartCall {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }
}

/// Pure predicate over [`CartCall`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDetector {
    /// Authority (`host[:port]`) of the storefront, lowercased
    storefront_authority: Option<String>,
}

impl ChangeDetector {
    /// A detector that only accepts relative URLs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A detector that also accepts absolute URLs on the given storefront origin.
    pub fn for_storefront(origin: &str) -> Self {
        Self {
            storefront_authority: split_authority(origin).map(|(authority, _)| authority),
        }
    }

    /// True iff the call is a storefront cart mutation.
    pub fn is_cart_mutation(&self, call: &CartCall) -> bool {
        if PROBE_METHODS
            .iter()
            .any(|m| call.method.eq_ignore_ascii_case(m))
        {
            return false;
        }

        let path = match split_authority(&call.url) {
            Some((authority, path)) => {
                if self.storefront_authority.as_deref() != Some(authority.as_str()) {
                    return false;
                }
                path
            }
            None => call.url.as_str(),
        };

        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        segments.windows(2).any(|pair| {
            pair[0].eq_ignore_ascii_case(CART_SEGMENT) && is_mutating_endpoint(pair[1])
        })
    }
}

fn is_mutating_endpoint(segment: &str) -> bool {
    let stem = segment.split('.').next().unwrap_or_default();
    MUTATING_ENDPOINTS
        .iter()
        .any(|name| stem.eq_ignore_ascii_case(name))
}

/// Split an absolute (`scheme://` or protocol-relative `//`) URL into its
/// lowercased authority and the remainder. Returns `None` for relative URLs.
fn split_authority(url: &str) -> Option<(String, &str)> {
    let rest = match url.find("://") {
        Some(idx) if url[..idx].chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) => {
            &url[idx + 3..]
        }
        _ => url.strip_prefix("//")?,
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = rest[..end].to_ascii_lowercase();
    Some((authority, &rest[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ChangeDetector {
        ChangeDetector::for_storefront("https://shop.example.com")
    }

    #[test]
    fn storefront_mutations() {
        let d = detector();
        assert!(d.is_cart_mutation(&CartCall::post("/cart/add.js")));
        assert!(d.is_cart_mutation(&CartCall::post("/cart/change.js")));
        assert!(d.is_cart_mutation(&CartCall::post("/cart/update.js")));
        assert!(d.is_cart_mutation(&CartCall::post("/cart/add")));
        assert!(d.is_cart_mutation(&CartCall::post("/cart/update?attributes[x]=1")));
    }

    #[test]
    fn locale_prefix() {
        assert!(detector().is_cart_mutation(&CartCall::post("/en-ca/cart/add.js")));
    }

    #[test]
    fn reads_and_clears_are_not_mutations_to_sync() {
        let d = detector();
        assert!(!d.is_cart_mutation(&CartCall::new("GET", "/cart.js")));
        assert!(!d.is_cart_mutation(&CartCall::post("/cart/clear.js")));
        assert!(!d.is_cart_mutation(&CartCall::post("/cart")));
        assert!(!d.is_cart_mutation(&CartCall::post("/products/add-on")));
    }

    #[test]
    fn absolute_storefront_url() {
        let d = detector();
        assert!(d.is_cart_mutation(&CartCall::post("https://SHOP.example.com/cart/add.js")));
        assert!(d.is_cart_mutation(&CartCall::post("//shop.example.com/cart/change.js")));
    }

    #[test]
    fn remote_sync_endpoint_never_matches() {
        let d = detector();
        assert!(!d.is_cart_mutation(&CartCall::post("https://sync.example.net/api/cart")));
        assert!(!d.is_cart_mutation(&CartCall::post(
            "https://sync.example.net/api/cart/update"
        )));
        assert!(!d.is_cart_mutation(&CartCall::new(
            "GET",
            "https://sync.example.net/api/cart/email/a@example.com"
        )));
    }

    #[test]
    fn relative_only_detector_rejects_absolute_urls() {
        let d = ChangeDetector::new();
        assert!(d.is_cart_mutation(&CartCall::post("/cart/add.js")));
        assert!(!d.is_cart_mutation(&CartCall::post("https://shop.example.com/cart/add.js")));
    }

    #[test]
    fn probe_methods_ignored() {
        let d = detector();
        assert!(!d.is_cart_mutation(&CartCall::new("OPTIONS", "/cart/add.js")));
        assert!(!d.is_cart_mutation(&CartCall::new("head", "/cart/add.js")));
    }

    #[test]
    fn segment_match_is_exact() {
        let d = detector();
        assert!(!d.is_cart_mutation(&CartCall::post("/cart/adder.js")));
        assert!(!d.is_cart_mutation(&CartCall::post("/carts/add.js")));
    }
}
