//! The watermark: the `addedDate` of the last remote cart this client pushed
//! or applied.
//!
//! Reconciliation never applies a remote cart whose `addedDate` equals the
//! stored watermark. That single comparison is what keeps a reload from
//! triggering another reload.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// Opaque server timestamp. Compared for equality only, never ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watermark(String);

impl Watermark {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Watermark {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Watermark {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistence for the single watermark value.
///
/// Scoped to one storage area shared by every tab, surviving reloads.
/// Reads and writes are not transactional; the last writer wins.
pub trait WatermarkStore: Send + Sync {
    /// Read the stored watermark, `None` if nothing was synced yet.
    fn get(&self) -> Result<Option<Watermark>>;

    /// Replace the stored watermark.
    fn set(&self, watermark: &Watermark) -> Result<()>;

    /// Forget the watermark (logout, no identity).
    fn clear(&self) -> Result<()>;
}

/// In-process watermark store.
#[derive(Debug, Default)]
pub struct MemoryWatermarkStore {
    value: Mutex<Option<Watermark>>,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a watermark.
    pub fn with_value(watermark: impl Into<Watermark>) -> Self {
        Self {
            value: Mutex::new(Some(watermark.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Watermark>> {
        // A poisoned lock still holds a valid Option.
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WatermarkStore for MemoryWatermarkStore {
    fn get(&self) -> Result<Option<Watermark>> {
        Ok(self.slot().clone())
    }

    fn set(&self, watermark: &Watermark) -> Result<()> {
        *self.slot() = Some(watermark.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_lifecycle() {
        let store = MemoryWatermarkStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set(&Watermark::from("2024-01-01")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Watermark::from("2024-01-01")));

        store.set(&Watermark::from("2024-01-02")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Watermark::from("2024-01-02")));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Watermark::from("T")).unwrap();
        assert_eq!(json, "\"T\"");
    }
}
