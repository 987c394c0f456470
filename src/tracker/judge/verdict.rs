extern crate log;
extern crate tokio;

use super::{error::PollError, remote::Remote, retry::PollPolicy};
use crate::config::verdict::{ACCEPTED, SUCCESS};
use log::debug;
use std::sync::Arc;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status_message: String,
}
impl Verdict {
    /// Only an accepted solution counts towards proficiency.
    pub fn is_accepted(&self) -> bool {
        self.status_message == ACCEPTED
    }
}

/// Polls a submission check URL until the judge reports a final verdict.
pub struct VerdictPoller {
    remote: Arc<dyn Remote>,
    policy: PollPolicy,
}
impl VerdictPoller {
    pub fn new(remote: Arc<dyn Remote>, policy: PollPolicy) -> Self {
        Self { remote, policy }
    }
    /// One check. `Ok(None)` while the judge is still working.
    pub async fn poll(&self, check_url: &str) -> Result<Option<Verdict>, PollError> {
        let body = self
            .remote
            .get_json(check_url)
            .await
            .map_err(PollError::Transport)?
            .ok_or(PollError::EmptyBody)?;
        match body["state"].as_str() {
            Some(SUCCESS) => Ok(Some(Verdict {
                status_message: body["status_msg"].as_str().unwrap_or_default().to_string(),
            })),
            state => {
                debug!("Submission {} still {}", check_url, state.unwrap_or("unknown"));
                Ok(None)
            }
        }
    }
    pub async fn await_verdict(&self, check_url: &str) -> Result<Verdict, PollError> {
        let start = Instant::now();
        let mut next = start;
        let mut attempts = 0;
        loop {
            sleep_until(next).await;
            attempts += 1;
            if let Some(v) = self.poll(check_url).await? {
                return Ok(v);
            }
            next += self.policy.delay;
            if !self.policy.allows(attempts, next - start) {
                return Err(PollError::Timeout {
                    attempts,
                    elapsed: start.elapsed(),
                });
            }
        }
    }
}
