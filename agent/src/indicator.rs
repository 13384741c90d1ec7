//! Loading indicator shown while a page load reconciles.

/// Something that can display "syncing your cart".
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Used when there is nothing to display the indicator on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl LoadingIndicator for NoIndicator {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Reports indicator transitions through tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogIndicator;

impl LoadingIndicator for LogIndicator {
    fn show(&self) {
        tracing::debug!("Cart sync indicator shown");
    }

    fn hide(&self) {
        tracing::debug!("Cart sync indicator hidden");
    }
}

/// Shows the indicator for as long as the guard lives.
///
/// Hiding happens in `Drop`, so every exit path releases it, errors included.
#[must_use = "the indicator is hidden as soon as the guard is dropped"]
pub struct LoaderGuard<'a> {
    indicator: &'a dyn LoadingIndicator,
}

impl<'a> LoaderGuard<'a> {
    pub fn show(indicator: &'a dyn LoadingIndicator) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl Drop for LoaderGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}
