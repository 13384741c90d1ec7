//! Cart data model and the wire shapes exchanged with the storefront and the
//! remote persistence service.
//!
//! The storefront speaks snake_case (`variant_id`), the remote service wraps
//! line items in camelCase envelopes (`lineItems`, `addedDate`). Line items
//! travel between the two unchanged, so [`LineItem`] keeps the storefront
//! field names in both directions.

use crate::{Quantity, VariantId, Watermark};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Free-form line item properties (engraving text, gift notes, ...).
pub type Properties = BTreeMap<String, String>;

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Storefront product variant
    pub variant_id: VariantId,
    pub quantity: Quantity,
    /// Line item properties; `null` on the wire reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

impl LineItem {
    /// Create a line item without properties.
    pub fn new(variant_id: VariantId, quantity: Quantity) -> Self {
        Self {
            variant_id,
            quantity,
            properties: Properties::new(),
        }
    }

    /// Attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// The cart as held by the storefront page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCart {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl LocalCart {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The durable cart record held by the remote persistence service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCart {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<LineItem>,
    /// Server-assigned timestamp of the last write
    #[serde(default)]
    pub added_date: Option<Watermark>,
}

impl RemoteCart {
    pub fn new(line_items: Vec<LineItem>, added_date: impl Into<Watermark>) -> Self {
        Self {
            line_items,
            added_date: Some(added_date.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Body returned by the remote pull endpoint: `{cart: {...}}` or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCartEnvelope {
    #[serde(default)]
    pub cart: Option<RemoteCart>,
}

impl RemoteCartEnvelope {
    /// Decode a pull response body. An empty body or a JSON `null` means the
    /// customer has no saved cart.
    pub fn decode(body: &[u8]) -> crate::Result<Option<RemoteCart>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let envelope: Option<RemoteCartEnvelope> = serde_json::from_slice(body)?;
        Ok(envelope.and_then(|e| e.cart))
    }
}

/// Body sent to the remote push endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub customer_id: String,
    pub email: String,
    pub line_items: Vec<LineItem>,
}

impl PushPayload {
    /// Build a payload for a customer. Anonymous shoppers push with empty
    /// `customer_id` and `email`.
    pub fn new(identity: Option<&Identity>, cart: LocalCart) -> Self {
        let (customer_id, email) = identity
            .map(|i| (i.id.clone(), i.email.clone()))
            .unwrap_or_default();
        Self {
            customer_id,
            email,
            line_items: cart.items,
        }
    }
}

/// Remote push acknowledgement: `{cart: {addedDate, ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushAck {
    #[serde(default)]
    pub cart: Option<PushAckCart>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushAckCart {
    #[serde(default)]
    pub added_date: Option<Watermark>,
}

impl PushAck {
    /// The watermark assigned by the server, if the response carries one.
    pub fn added_date(&self) -> Option<&Watermark> {
        self.cart.as_ref()?.added_date.as_ref()
    }
}

/// Body sent to the storefront add endpoint: `{items: [{id, quantity, properties}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItemsRequest {
    pub items: Vec<AddItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddItem {
    pub id: VariantId,
    pub quantity: Quantity,
    pub properties: Properties,
}

impl AddItemsRequest {
    pub fn from_line_items(items: &[LineItem]) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| AddItem {
                    id: item.variant_id,
                    quantity: item.quantity,
                    properties: item.properties.clone(),
                })
                .collect(),
        }
    }
}

/// The shopper as resolved by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub is_logged_in: bool,
}

impl Identity {
    pub fn logged_in(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            is_logged_in: true,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
