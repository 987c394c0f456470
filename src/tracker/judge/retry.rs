extern crate serde;

use crate::config::verdict::{CHECK_DELAY, MAX_ATTEMPTS, MAX_ELAPSED};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often and for how long a pending verdict is re-checked.
///
/// `None` for a cap disables it; with both caps disabled polling runs until
/// the judge finishes or the call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
    pub max_elapsed: Option<Duration>,
}
impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            delay: CHECK_DELAY,
            max_attempts: Some(MAX_ATTEMPTS),
            max_elapsed: Some(MAX_ELAPSED),
        }
    }
}
impl PollPolicy {
    pub fn unbounded() -> Self {
        Self {
            delay: CHECK_DELAY,
            max_attempts: None,
            max_elapsed: None,
        }
    }
    /// Whether another check may start after `attempts` checks and `elapsed` time.
    pub fn allows(&self, attempts: u32, elapsed: Duration) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
            && self.max_elapsed.map_or(true, |max| elapsed < max)
    }
}

/// Serialized form used in the options file.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PollOptions {
    pub delay_secs: u64,
    pub max_attempts: Option<u32>,
    pub max_elapsed_secs: Option<u64>,
}
impl Default for PollOptions {
    fn default() -> Self {
        Self {
            delay_secs: CHECK_DELAY.as_secs(),
            max_attempts: Some(MAX_ATTEMPTS),
            max_elapsed_secs: Some(MAX_ELAPSED.as_secs()),
        }
    }
}
impl From<PollOptions> for PollPolicy {
    fn from(v: PollOptions) -> Self {
        Self {
            delay: Duration::from_secs(v.delay_secs),
            max_attempts: v.max_attempts,
            max_elapsed: v.max_elapsed_secs.map(Duration::from_secs),
        }
    }
}
