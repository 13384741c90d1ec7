//! Error types for the cart sync engine.

use thiserror::Error;

/// All possible errors raised while syncing a cart.
///
/// None of these are fatal to the storefront page. Callers log them and leave
/// the local cart and the watermark as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Remote persistence service
    #[error("remote cart sync failed: {0}")]
    RemoteSync(String),

    #[error("remote cart fetch failed: {0}")]
    RemoteFetch(String),

    // Storefront cart endpoints
    #[error("local cart {operation} failed: {reason}")]
    LocalCart {
        operation: CartOperation,
        reason: String,
    },

    // Watermark persistence
    #[error("watermark storage error: {0}")]
    Storage(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl Error {
    /// Shorthand for a storefront cart failure.
    pub fn local_cart(operation: CartOperation, reason: impl Into<String>) -> Self {
        Self::LocalCart {
            operation,
            reason: reason.into(),
        }
    }
}

/// Storefront cart endpoint that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Read,
    Clear,
    Add,
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CartOperation::Read => "read",
            CartOperation::Clear => "clear",
            CartOperation::Add => "add",
        };
        f.write_str(name)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidPayload(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
