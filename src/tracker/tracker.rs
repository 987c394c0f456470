//! Turns observed judge traffic into review-schedule updates.
//!
//! Check requests for a submission arrive in bursts while the judge
//! redirects, so they are debounced into one episode. An episode resolves
//! the problem from the active tab, waits for the verdict, looks up the
//! problem's identity and commits the scheduled record. Episodes run one at
//! a time; any failure drops the episode and the next submission retries.

extern crate chrono;
extern crate log;
extern crate tokio;

pub mod debounce;
pub mod episode;
pub mod event;

pub use debounce::Debouncer;
pub use episode::{Abort, Outcome, Stage};
pub use event::{channel, ActiveTab, NetworkEvent, SharedTab};

use crate::{
    config::tracker::DEBOUNCE_DELAY,
    curve::{self, apply_accepted_submission},
    judge::{MetadataClient, RegexSet, VerdictPoller},
    settings::SettingsWatch,
    store::ProblemStore,
};
use log::{debug, info, warn};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::mpsc;

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct SubmissionTracker {
    patterns: RegexSet,
    tab: Arc<dyn ActiveTab>,
    poller: VerdictPoller,
    metadata: MetadataClient,
    store: Arc<ProblemStore>,
    settings: SettingsWatch,
    episodes: AtomicU64,
}
impl SubmissionTracker {
    pub fn new(
        tab: Arc<dyn ActiveTab>,
        poller: VerdictPoller,
        metadata: MetadataClient,
        store: Arc<ProblemStore>,
        settings: SettingsWatch,
    ) -> Self {
        Self {
            patterns: RegexSet::new(),
            tab,
            poller,
            metadata,
            store,
            settings,
            episodes: AtomicU64::new(0),
        }
    }
    fn observe(&self, event: NetworkEvent, debouncer: &mut Debouncer<NetworkEvent>) {
        if self.patterns.is_check(&event.url) {
            if debouncer.push(event) {
                debug!("Check request within quiet period, restarting debounce");
            }
        } else if self.patterns.is_submit(&event.url) {
            debug!("Observed submit request {}", event.url);
        } else {
            debug!("Ignoring request {}", event.url);
        }
    }

    /// Consumes events until the sender side closes. A burst still waiting
    /// for its quiet period when that happens is run before returning.
    pub async fn run(&self, mut events: mpsc::Receiver<NetworkEvent>) {
        let mut debouncer = Debouncer::new(DEBOUNCE_DELAY);
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.observe(event, &mut debouncer),
                    None => break,
                },
                trigger = debouncer.expired() => {
                    self.run_episode(trigger).await;
                }
            }
        }
        if debouncer.is_pending() {
            let trigger = debouncer.expired().await;
            self.run_episode(trigger).await;
        }
        info!("Event source closed, tracker stopped");
    }

    /// Runs one episode for `trigger` and logs how it ended.
    pub async fn run_episode(&self, trigger: NetworkEvent) -> Outcome {
        let episode = self.episodes.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Episode {} triggered by {}", episode, trigger.url);
        let outcome = self.resolve_and_commit(episode, &trigger).await;
        match &outcome {
            Outcome::Committed(r) => info!(
                "Episode {}: {} now at proficiency {}{}",
                episode,
                r,
                r.proficiency,
                if r.is_archived { ", archived" } else { "" }
            ),
            Outcome::Unchanged(r) => info!(
                "Episode {}: {} not due for review, unchanged",
                episode, r
            ),
            Outcome::WriteFailed(r, e) => {
                warn!("Episode {}: {} only partly stored: {}", episode, r, e)
            }
            Outcome::Aborted(reason) => match reason {
                Abort::Poll(_) | Abort::Lookup(_) | Abort::Read(_) => warn!(
                    "Episode {} aborted while {}: {}",
                    episode,
                    reason.stage(),
                    reason
                ),
                _ => info!(
                    "Episode {} aborted while {}: {}",
                    episode,
                    reason.stage(),
                    reason
                ),
            },
        }
        outcome
    }

    async fn resolve_and_commit(&self, episode: u64, trigger: &NetworkEvent) -> Outcome {
        let settings = self.settings.borrow().clone();

        let tab = match self.tab.active_url().await {
            Some(v) => v,
            None => return Outcome::Aborted(Abort::NoActiveTab),
        };
        if !trigger
            .initiator
            .as_deref()
            .map_or(false, |i| self.patterns.is_judge_origin(i))
        {
            return Outcome::Aborted(Abort::ForeignInitiator(trigger.initiator.clone()));
        }
        let slug = match self.patterns.slug(&tab) {
            Some(v) => v.to_string(),
            None => return Outcome::Aborted(Abort::NoSlug(tab)),
        };

        debug!("Episode {} {} for {}", episode, Stage::AwaitingVerdict, slug);
        let verdict = match self.poller.await_verdict(&trigger.url).await {
            Ok(v) => v,
            Err(e) => return Outcome::Aborted(Abort::Poll(e)),
        };
        if !verdict.is_accepted() {
            return Outcome::Aborted(Abort::NotAccepted(verdict.status_message));
        }

        debug!("Episode {} {} for {}", episode, Stage::AwaitingMetadata, slug);
        let identity = match self.metadata.resolve(&slug).await {
            Ok(v) => v,
            Err(e) => return Outcome::Aborted(Abort::Lookup(e)),
        };

        debug!("Episode {} {} {}", episode, Stage::Committing, identity.id);
        let stored = match self.store.get(&identity.id).await {
            Ok(v) => v,
            Err(e) => return Outcome::Aborted(Abort::Read(e)),
        };
        let mut existing = stored.clone();
        if let Some(r) = existing.as_mut() {
            if curve::repair_archived(r, &settings) {
                warn!("Record {} had a stale archive flag, repairing", r.id);
            }
        }
        let next =
            apply_accepted_submission(existing.as_ref(), &identity, &settings, now_millis());
        if stored.as_ref() == Some(&next) {
            return Outcome::Unchanged(next);
        }
        match self.store.upsert(&next).await {
            Ok(()) => Outcome::Committed(next),
            Err(e) => Outcome::WriteFailed(next, e),
        }
    }
}
