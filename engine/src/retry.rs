//! Push timing policy and the retry bookkeeping for failed pushes.
//!
//! Backoff is constant: every retry waits the same delay. The retry state is
//! a plain value owned by whoever drives pushes, so independent drivers never
//! share a counter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default quiet window before a push.
pub const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(500);

/// Default delay between push retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Timing knobs for the push side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPolicy {
    /// Quiet period after the last change before pushing
    pub sync_delay: Duration,
    /// Constant wait before each retry
    pub retry_delay: Duration,
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            sync_delay: DEFAULT_SYNC_DELAY,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// What to do after a failed push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after `delay`; `attempt` is 1-based.
    RetryAfter { attempt: u32, delay: Duration },
    /// Budget exhausted; drop the failure.
    GiveUp { retries: u32 },
}

/// Retry counter for one push driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    count: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries consumed since the last success or reset.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Record a failed push and decide whether to retry.
    pub fn record_failure(&mut self, policy: &SyncPolicy) -> RetryDecision {
        if self.count < policy.max_retries {
            self.count += 1;
            RetryDecision::RetryAfter {
                attempt: self.count,
                delay: policy.retry_delay,
            }
        } else {
            RetryDecision::GiveUp {
                retries: self.count,
            }
        }
    }

    /// Record a successful push.
    pub fn record_success(&mut self) {
        self.count = 0;
    }

    /// Forget everything (page unload, fresh change burst).
    pub fn reset(&mut self) {
        self.count = 0;
    }
}
