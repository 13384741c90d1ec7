//! Debounced push scheduling.
//!
//! A single worker task owns the quiet-window timer and the retry state.
//! Handles only send signals, so any number of `notify()` calls costs one
//! push per burst.

use super::PushSynchronizer;
use cart_sync_engine::{RetryDecision, RetryState, SyncPolicy};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy)]
enum Signal {
    Changed,
    Unload,
}

/// What ended a wait.
enum Wake {
    Elapsed,
    Changed,
    Unloaded,
    Closed,
}

/// Handle to a push worker. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PushScheduler {
    tx: mpsc::UnboundedSender<Signal>,
}

impl PushScheduler {
    /// Start the worker on the current runtime.
    ///
    /// The worker stops once every handle is dropped. A push that is waiting
    /// out its quiet window or a backoff is sent once, without retries, before
    /// the worker exits.
    pub fn spawn(pusher: Arc<PushSynchronizer>, policy: SyncPolicy) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            rx,
            pusher,
            policy,
            retry: RetryState::new(),
        };
        (Self { tx }, tokio::spawn(worker.run()))
    }

    /// The cart may have changed. Restarts the quiet window.
    pub fn notify(&self) {
        if self.tx.send(Signal::Changed).is_err() {
            tracing::warn!("Push worker stopped, change dropped");
        }
    }

    /// The page is going away: drop any pending push or retry.
    pub fn unload(&self) {
        let _ = self.tx.send(Signal::Unload);
    }
}

struct Worker {
    rx: mpsc::UnboundedReceiver<Signal>,
    pusher: Arc<PushSynchronizer>,
    policy: SyncPolicy,
    retry: RetryState,
}

impl Worker {
    async fn run(mut self) {
        while let Some(signal) = self.rx.recv().await {
            match signal {
                Signal::Unload => self.retry.reset(),
                Signal::Changed => {
                    if !self.cycle().await {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Push worker stopped");
    }

    /// One burst: debounce, push, retry. Returns false once the channel is closed.
    async fn cycle(&mut self) -> bool {
        self.retry.reset();
        let mut delay = self.policy.sync_delay;

        loop {
            match self.wait(delay).await {
                Wake::Elapsed => {}
                Wake::Changed => {
                    // Fresh burst, fresh budget
                    self.retry.reset();
                    delay = self.policy.sync_delay;
                    continue;
                }
                Wake::Unloaded => {
                    self.retry.reset();
                    return true;
                }
                Wake::Closed => {
                    self.flush().await;
                    return false;
                }
            }

            match self.pusher.push().await {
                Ok(_) => {
                    self.retry.record_success();
                    return true;
                }
                Err(err) => match self.retry.record_failure(&self.policy) {
                    RetryDecision::RetryAfter {
                        attempt,
                        delay: backoff,
                    } => {
                        tracing::warn!(
                            error = %err,
                            attempt,
                            max_retries = self.policy.max_retries,
                            "Cart push failed, retrying"
                        );
                        delay = backoff;
                    }
                    RetryDecision::GiveUp { retries } => {
                        tracing::error!(error = %err, retries, "Cart push failed, giving up");
                        return true;
                    }
                },
            }
        }
    }

    /// Last attempt for a pending push when no handle is left to retry it.
    async fn flush(&mut self) {
        match self.pusher.push().await {
            Ok(_) => self.retry.record_success(),
            Err(err) => tracing::error!(error = %err, "Final cart push failed"),
        }
    }

    async fn wait(&mut self, period: Duration) -> Wake {
        tokio::select! {
            signal = self.rx.recv() => match signal {
                Some(Signal::Changed) => Wake::Changed,
                Some(Signal::Unload) => Wake::Unloaded,
                None => Wake::Closed,
            },
            _ = tokio::time::sleep(period) => Wake::Elapsed,
        }
    }
}
