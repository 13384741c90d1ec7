//! File-backed watermark persistence.

use cart_sync_engine::{Error, Result, Watermark, WatermarkStore};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Keeps the watermark in a single small file, byte for byte.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never observes a half-written value.
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn storage_error(&self, err: std::io::Error) -> Error {
        Error::Storage(format!("{}: {}", self.path.display(), err))
    }
}

impl WatermarkStore for FileWatermarkStore {
    fn get(&self) -> Result<Option<Watermark>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(Watermark::from(raw))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.storage_error(err)),
        }
    }

    fn set(&self, watermark: &Watermark) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, watermark.as_str()).map_err(|e| self.storage_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.storage_error(e))?;
        tracing::debug!(watermark = %watermark, "Watermark stored");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.storage_error(err)),
        }
    }
}
