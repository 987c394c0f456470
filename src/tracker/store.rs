//! Problem records replicated over a fast and a durable tier.
//!
//! Writes go to the fast tier first, since that is what readers see, then to
//! the durable tier. While the durable write is outstanding the key is listed
//! under the fast tier's pending key, so a write interrupted by a restart is
//! replayed by [`ProblemStore::reconcile_on_startup`].

extern crate futures;
extern crate log;
extern crate serde_json;

use crate::{
    config::storage::{PENDING_KEY, SETTINGS_KEY},
    curve::{self, ReviewSettings},
    problem::{is_problem_id, ProblemRecord},
    storage::{KeyValueStore, StoreError},
};
use futures::future::join_all;
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{error::Error as StdError, fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Fast,
    Durable,
}
impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fast => "fast",
            Self::Durable => "durable",
        })
    }
}

/// A write that did not reach every tier.
#[derive(Debug)]
pub struct StoreWriteError {
    pub key: String,
    pub failures: Vec<(Tier, StoreError)>,
}
impl StoreWriteError {
    pub fn failed(&self, tier: Tier) -> bool {
        self.failures.iter().any(|(t, _)| *t == tier)
    }
}
impl fmt::Display for StoreWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error writing {}", self.key)?;
        for (tier, err) in &self.failures {
            write!(f, "; {} tier: {}", tier, err)?;
        }
        Ok(())
    }
}
impl StdError for StoreWriteError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.failures
            .first()
            .map(|(_, e)| e as &(dyn StdError + 'static))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// Pending durable writes pushed from the fast tier.
    pub replayed: usize,
    /// Keys copied from the durable tier into the fast tier.
    pub copied: usize,
    pub failed: usize,
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Codec(key.to_string(), e))
}
fn encode<T: Serialize>(key: &str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Codec(key.to_string(), e))
}

pub struct ProblemStore {
    fast: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles of the pending list.
    pending_lock: Mutex<()>,
}
impl ProblemStore {
    pub fn new(fast: Arc<dyn KeyValueStore>, durable: Arc<dyn KeyValueStore>) -> Self {
        Self {
            fast,
            durable,
            pending_lock: Mutex::new(()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<ProblemRecord>, StoreError> {
        match self.fast.get(id).await? {
            Some(v) => decode(id, v).map(Some),
            None => Ok(None),
        }
    }

    pub async fn upsert(&self, record: &ProblemRecord) -> Result<(), StoreWriteError> {
        let value = encode(&record.id, record).map_err(|e| StoreWriteError {
            key: record.id.clone(),
            failures: vec![(Tier::Fast, e)],
        })?;
        self.write_both(&record.id, value).await
    }

    /// Every record in the fast tier, with the archive flag re-derived.
    pub async fn list(&self, settings: &ReviewSettings) -> Result<Vec<ProblemRecord>, StoreError> {
        let mut ret: Vec<ProblemRecord> = self
            .fast
            .get_all()
            .await?
            .into_iter()
            .filter(|(k, _)| is_problem_id(k))
            .filter_map(|(k, v)| match decode::<ProblemRecord>(&k, v) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!("Skipping unreadable record: {}", e);
                    None
                }
            })
            .collect();
        for r in ret.iter_mut() {
            if curve::repair_archived(r, settings) {
                warn!(
                    "Record {} has stale archive flag at proficiency {}",
                    r.id, r.proficiency
                );
            }
        }
        ret.sort_by_key(|r| r.id.parse::<u64>().unwrap_or(u64::MAX));
        Ok(ret)
    }

    /// Settings from the durable tier, writing the defaults when none exist.
    pub async fn load_settings(&self) -> Result<ReviewSettings, StoreError> {
        let stored = match self.durable.get(SETTINGS_KEY).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Durable settings unreadable, using fast tier: {}", e);
                self.fast.get(SETTINGS_KEY).await?
            }
        };
        let settings = match stored.map(|v| decode::<ReviewSettings>(SETTINGS_KEY, v)) {
            Some(Ok(v)) => v,
            Some(Err(e)) => {
                warn!("Resetting malformed settings: {}", e);
                self.init_settings().await
            }
            None => {
                info!("No review settings stored, writing defaults");
                self.init_settings().await
            }
        };
        if let Err(e) = settings.validate() {
            warn!("Using malformed forgetting curve as-is: {}", e);
        }
        Ok(settings)
    }
    async fn init_settings(&self) -> ReviewSettings {
        let settings = ReviewSettings::default();
        if let Err(e) = self.save_settings(&settings).await {
            warn!("{}", e);
        }
        settings
    }
    pub async fn save_settings(&self, settings: &ReviewSettings) -> Result<(), StoreWriteError> {
        let value = encode(SETTINGS_KEY, settings).map_err(|e| StoreWriteError {
            key: SETTINGS_KEY.to_string(),
            failures: vec![(Tier::Fast, e)],
        })?;
        self.write_both(SETTINGS_KEY, value).await
    }

    async fn write_both(&self, key: &str, value: Value) -> Result<(), StoreWriteError> {
        let mut failures = Vec::new();
        if let Err(e) = self.fast.set(key, value.clone()).await {
            warn!("Fast tier write of {} failed: {}", key, e);
            failures.push((Tier::Fast, e));
        }
        self.mark_pending(key, true).await;
        match self.durable.set(key, value).await {
            Ok(()) => self.mark_pending(key, false).await,
            Err(e) => {
                warn!(
                    "Durable tier write of {} failed, tiers diverge until next sync: {}",
                    key, e
                );
                failures.push((Tier::Durable, e));
            }
        }
        if failures.is_empty() {
            debug!("Wrote {} to both tiers", key);
            Ok(())
        } else {
            Err(StoreWriteError {
                key: key.to_string(),
                failures,
            })
        }
    }

    async fn pending(&self) -> Vec<String> {
        match self.fast.get(PENDING_KEY).await {
            Ok(Some(v)) => decode(PENDING_KEY, v).unwrap_or_else(|e| {
                warn!("Dropping unreadable pending list: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Can't read pending list: {}", e);
                Vec::new()
            }
        }
    }
    async fn set_pending(&self, keys: &[String]) {
        let ret = if keys.is_empty() {
            self.fast.remove(PENDING_KEY).await
        } else {
            self.fast.set(PENDING_KEY, Value::from(keys.to_vec())).await
        };
        if let Err(e) = ret {
            warn!("Can't update pending list: {}", e);
        }
    }
    async fn mark_pending(&self, key: &str, pending: bool) {
        let _guard = self.pending_lock.lock().await;
        let mut keys = self.pending().await;
        let present = keys.iter().any(|k| k == key);
        if pending && !present {
            keys.push(key.to_string());
        } else if !pending && present {
            keys.retain(|k| k != key);
        } else {
            return;
        }
        self.set_pending(&keys).await;
    }

    /// Pushes every pending fast-tier value to the durable tier. Returns the
    /// keys that are still pending afterwards.
    async fn replay_pending(&self, ret: &mut Reconciled) -> Vec<String> {
        let _guard = self.pending_lock.lock().await;
        let mut still_pending = Vec::new();
        for key in self.pending().await {
            match self.fast.get(&key).await {
                Ok(Some(v)) => match self.durable.set(&key, v).await {
                    Ok(()) => ret.replayed += 1,
                    Err(e) => {
                        warn!("Replaying {} to durable tier failed: {}", key, e);
                        ret.failed += 1;
                        still_pending.push(key);
                    }
                },
                Ok(None) => debug!("Pending key {} no longer in fast tier", key),
                Err(e) => {
                    warn!("Can't read pending key {}: {}", key, e);
                    ret.failed += 1;
                    still_pending.push(key);
                }
            }
        }
        self.set_pending(&still_pending).await;
        still_pending
    }

    /// Copies every missing or differing durable key into the fast tier,
    /// except keys whose newest value only lives in the fast tier.
    async fn copy_from_durable(
        &self,
        still_pending: &[String],
        ret: &mut Reconciled,
    ) -> Result<(), StoreError> {
        let durable = self.durable.get_all().await?;
        let fast = self.fast.get_all().await?;
        let copies = durable
            .into_iter()
            .filter(|(k, _)| k != PENDING_KEY && !still_pending.contains(k))
            .filter(|(k, v)| fast.get(k) != Some(v))
            .map(|(k, v)| async move {
                let ret = self.fast.set(&k, v).await;
                (k, ret)
            });
        for (key, result) in join_all(copies).await {
            match result {
                Ok(()) => ret.copied += 1,
                Err(e) => {
                    warn!("Copying {} into fast tier failed: {}", key, e);
                    ret.failed += 1;
                }
            }
        }
        Ok(())
    }

    /// Recovers after a restart: replays durable writes that never finished,
    /// then copies every missing or differing durable key into the fast tier.
    pub async fn reconcile_on_startup(&self) -> Result<Reconciled, StoreError> {
        let mut ret = Reconciled::default();
        let still_pending = self.replay_pending(&mut ret).await;
        self.copy_from_durable(&still_pending, &mut ret).await?;
        info!(
            "Reconciled storage: {} replayed, {} copied, {} failed",
            ret.replayed, ret.copied, ret.failed
        );
        Ok(ret)
    }

    /// Drops the fast tier and rebuilds it from the durable tier. Pending
    /// writes are replayed first; those that still can't reach the durable
    /// tier survive the rebuild together with their pending marks.
    pub async fn rebuild_fast(&self) -> Result<Reconciled, StoreError> {
        let mut ret = Reconciled::default();
        let still_pending = self.replay_pending(&mut ret).await;
        let mut kept = Vec::with_capacity(still_pending.len());
        for key in &still_pending {
            if let Some(v) = self.fast.get(key).await? {
                kept.push((key.clone(), v));
            }
        }

        self.fast.clear().await?;
        for (key, value) in kept {
            if let Err(e) = self.fast.set(&key, value).await {
                warn!("Restoring unsynced {} after rebuild failed: {}", key, e);
                ret.failed += 1;
            }
        }
        {
            let _guard = self.pending_lock.lock().await;
            self.set_pending(&still_pending).await;
        }

        self.copy_from_durable(&still_pending, &mut ret).await?;
        info!(
            "Rebuilt fast tier: {} replayed, {} copied, {} failed",
            ret.replayed, ret.copied, ret.failed
        );
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::Difficulty,
        storage::{testing::FlakyStore, MemoryStore},
    };
    use serde_json::json;

    fn record(id: &str, proficiency: u32) -> ProblemRecord {
        ProblemRecord {
            id: id.to_string(),
            title: format!("Problem {}", id),
            difficulty: Difficulty::Medium,
            url: format!("https://leetcode.com/problems/p{}/", id),
            first_submission_time: 1_000,
            proficiency,
            is_archived: proficiency >= 5,
        }
    }
    fn tiers() -> (Arc<FlakyStore>, Arc<FlakyStore>, ProblemStore) {
        let fast = Arc::new(FlakyStore::new());
        let durable = Arc::new(FlakyStore::new());
        let store = ProblemStore::new(fast.clone(), durable.clone());
        (fast, durable, store)
    }

    #[tokio::test]
    async fn upsert_reaches_both_tiers() {
        let (fast, durable, store) = tiers();
        let r = record("1", 1);
        store.upsert(&r).await.unwrap();
        assert_eq!(store.get("1").await.unwrap(), Some(r.clone()));
        assert_eq!(
            durable.get("1").await.unwrap(),
            Some(serde_json::to_value(&r).unwrap())
        );
        assert_eq!(fast.get(PENDING_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn durable_failure_keeps_fast_write_and_marks_pending() {
        let (fast, durable, store) = tiers();
        durable.fail_writes(true);
        let err = store.upsert(&record("7", 2)).await.unwrap_err();
        assert!(err.failed(Tier::Durable));
        assert!(!err.failed(Tier::Fast));
        assert_eq!(store.get("7").await.unwrap(), Some(record("7", 2)));
        assert_eq!(
            fast.get(PENDING_KEY).await.unwrap(),
            Some(json!(["7"]))
        );

        durable.fail_writes(false);
        let done = store.reconcile_on_startup().await.unwrap();
        assert_eq!(done.replayed, 1);
        assert_eq!(
            durable.get("7").await.unwrap(),
            Some(serde_json::to_value(record("7", 2)).unwrap())
        );
        assert_eq!(fast.get(PENDING_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_replay_keeps_newer_fast_value() {
        let (fast, durable, store) = tiers();
        durable
            .set("7", serde_json::to_value(record("7", 1)).unwrap())
            .await
            .unwrap();
        durable.fail_writes(true);
        assert!(store.upsert(&record("7", 3)).await.is_err());

        let done = store.reconcile_on_startup().await.unwrap();
        assert_eq!(done.replayed, 0);
        assert_eq!(done.failed, 1);
        assert_eq!(store.get("7").await.unwrap(), Some(record("7", 3)));
        assert_eq!(
            fast.get(PENDING_KEY).await.unwrap(),
            Some(json!(["7"]))
        );
        assert_eq!(
            durable.get("7").await.unwrap(),
            Some(serde_json::to_value(record("7", 1)).unwrap())
        );
    }

    #[tokio::test]
    async fn concurrent_failed_writes_are_all_pending() {
        let (fast, durable, store) = tiers();
        durable.fail_writes(true);
        let records: Vec<ProblemRecord> = (1..=6).map(|i| record(&i.to_string(), 1)).collect();
        let results = join_all(records.iter().map(|r| store.upsert(r))).await;
        assert!(results.iter().all(|r| r.is_err()));

        let mut pending: Vec<String> =
            serde_json::from_value(fast.get(PENDING_KEY).await.unwrap().unwrap()).unwrap();
        pending.sort();
        assert_eq!(pending, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn fast_failure_still_writes_durable() {
        let (fast, durable, store) = tiers();
        fast.fail_writes(true);
        let err = store.upsert(&record("3", 1)).await.unwrap_err();
        assert!(err.failed(Tier::Fast));
        assert!(durable.get("3").await.unwrap().is_some());

        fast.fail_writes(false);
        let done = store.reconcile_on_startup().await.unwrap();
        assert_eq!(done.copied, 1);
        assert_eq!(store.get("3").await.unwrap(), Some(record("3", 1)));
    }

    #[tokio::test]
    async fn reconcile_restores_cold_fast_tier() {
        let durable = Arc::new(MemoryStore::new());
        durable
            .set("1", serde_json::to_value(record("1", 1)).unwrap())
            .await
            .unwrap();
        durable
            .set("2", serde_json::to_value(record("2", 3)).unwrap())
            .await
            .unwrap();
        durable
            .set(SETTINGS_KEY, json!({"forgettingCurve": [1, 3]}))
            .await
            .unwrap();
        let fast = Arc::new(MemoryStore::new());
        fast.set("2", serde_json::to_value(record("2", 1)).unwrap())
            .await
            .unwrap();
        let store = ProblemStore::new(fast.clone(), durable);

        let done = store.reconcile_on_startup().await.unwrap();
        assert_eq!(done.copied, 3);
        assert_eq!(store.get("2").await.unwrap(), Some(record("2", 3)));
        assert_eq!(
            fast.get(SETTINGS_KEY).await.unwrap(),
            Some(json!({"forgettingCurve": [1, 3]}))
        );
        assert_eq!(store.reconcile_on_startup().await.unwrap().copied, 0);
    }

    #[tokio::test]
    async fn list_skips_non_record_keys_and_repairs_flag() {
        let (fast, _durable, store) = tiers();
        store.upsert(&record("10", 1)).await.unwrap();
        store.upsert(&record("2", 1)).await.unwrap();
        let mut stale = record("5", 5);
        stale.is_archived = false;
        store.upsert(&stale).await.unwrap();
        store.save_settings(&ReviewSettings::default()).await.unwrap();
        fast.set("user", json!({"_id": "someone"})).await.unwrap();

        let list = store.list(&ReviewSettings::default()).await.unwrap();
        let ids: Vec<&str> = list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "5", "10"]);
        assert!(list[1].is_archived);
    }

    #[tokio::test]
    async fn settings_default_is_written_once() {
        let (fast, durable, store) = tiers();
        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings, ReviewSettings::default());
        assert_eq!(
            durable.get(SETTINGS_KEY).await.unwrap(),
            Some(json!({"forgettingCurve": [1, 2, 4, 7, 15]}))
        );
        assert!(fast.get(SETTINGS_KEY).await.unwrap().is_some());

        store
            .save_settings(&ReviewSettings::new(vec![2, 5]))
            .await
            .unwrap();
        assert_eq!(
            store.load_settings().await.unwrap(),
            ReviewSettings::new(vec![2, 5])
        );
    }

    #[tokio::test]
    async fn malformed_settings_are_reset() {
        let (_fast, durable, store) = tiers();
        durable
            .set(SETTINGS_KEY, json!({"forgettingCurve": "soon"}))
            .await
            .unwrap();
        assert_eq!(
            store.load_settings().await.unwrap(),
            ReviewSettings::default()
        );
    }

    #[tokio::test]
    async fn rebuild_fast_drops_stale_keys() {
        let (fast, _durable, store) = tiers();
        store.upsert(&record("1", 1)).await.unwrap();
        fast.set("99", serde_json::to_value(record("99", 1)).unwrap())
            .await
            .unwrap();
        store.rebuild_fast().await.unwrap();
        assert_eq!(store.get("99").await.unwrap(), None);
        assert!(store.get("1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rebuild_fast_replays_pending_before_clearing() {
        let (fast, durable, store) = tiers();
        durable.fail_writes(true);
        assert!(store.upsert(&record("7", 2)).await.is_err());
        durable.fail_writes(false);

        let done = store.rebuild_fast().await.unwrap();
        assert_eq!(done.replayed, 1);
        assert_eq!(store.get("7").await.unwrap(), Some(record("7", 2)));
        assert_eq!(
            durable.get("7").await.unwrap(),
            Some(serde_json::to_value(record("7", 2)).unwrap())
        );
        assert_eq!(fast.get(PENDING_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn rebuild_fast_keeps_unsynced_records() {
        let (fast, durable, store) = tiers();
        store.upsert(&record("1", 1)).await.unwrap();
        durable.fail_writes(true);
        assert!(store.upsert(&record("7", 2)).await.is_err());
        fast.set("99", json!({"stale": true})).await.unwrap();

        let done = store.rebuild_fast().await.unwrap();
        assert_eq!(done.replayed, 0);
        assert_eq!(done.failed, 1);
        assert_eq!(store.get("7").await.unwrap(), Some(record("7", 2)));
        assert_eq!(store.get("1").await.unwrap(), Some(record("1", 1)));
        assert_eq!(fast.get("99").await.unwrap(), None);
        assert_eq!(
            fast.get(PENDING_KEY).await.unwrap(),
            Some(json!(["7"]))
        );

        durable.fail_writes(false);
        assert_eq!(store.reconcile_on_startup().await.unwrap().replayed, 1);
        assert!(durable.get("7").await.unwrap().is_some());
    }
}
