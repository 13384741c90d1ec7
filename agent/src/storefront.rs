//! Storefront cart endpoints.
//!
//! The engine reads the storefront cart and replaces it wholesale; it never
//! edits individual lines. Three endpoints cover that: read, clear, add.

use async_trait::async_trait;
use cart_sync_engine::{AddItemsRequest, CartOperation, Error, LineItem, LocalCart, Result};
use reqwest::{StatusCode, Url};

const CART_PATH: &str = "cart.js";
const CLEAR_PATH: &str = "cart/clear.js";
const ADD_PATH: &str = "cart/add.js";

/// The storefront's cart, as seen by the sync engine.
#[async_trait]
pub trait StorefrontCart: Send + Sync {
    /// Fetch the current cart.
    async fn read_cart(&self) -> Result<LocalCart>;

    /// Remove every line.
    async fn clear_cart(&self) -> Result<()>;

    /// Add lines to the cart, in order.
    async fn add_items(&self, items: &[LineItem]) -> Result<()>;
}

/// Storefront cart over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    client: reqwest::Client,
    base: Url,
}

impl HttpStorefront {
    /// `base` must end in `/`.
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    fn endpoint(&self, operation: CartOperation, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::local_cart(operation, e.to_string()))
    }
}

fn check_status(operation: CartOperation, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::local_cart(operation, format!("status {status}")))
    }
}

#[async_trait]
impl StorefrontCart for HttpStorefront {
    async fn read_cart(&self) -> Result<LocalCart> {
        let op = CartOperation::Read;
        let response = self
            .client
            .get(self.endpoint(op, CART_PATH)?)
            .send()
            .await
            .map_err(|e| Error::local_cart(op, e.to_string()))?;
        check_status(op, response.status())?;

        response
            .json::<LocalCart>()
            .await
            .map_err(|e| Error::local_cart(op, e.to_string()))
    }

    async fn clear_cart(&self) -> Result<()> {
        let op = CartOperation::Clear;
        let response = self
            .client
            .post(self.endpoint(op, CLEAR_PATH)?)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| Error::local_cart(op, e.to_string()))?;
        check_status(op, response.status())
    }

    async fn add_items(&self, items: &[LineItem]) -> Result<()> {
        let op = CartOperation::Add;
        let response = self
            .client
            .post(self.endpoint(op, ADD_PATH)?)
            .json(&AddItemsRequest::from_line_items(items))
            .send()
            .await
            .map_err(|e| Error::local_cart(op, e.to_string()))?;
        check_status(op, response.status())
    }
}
