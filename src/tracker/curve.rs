//! Forgetting-curve scheduling.
//!
//! Everything here is pure: status and transitions are functions of a
//! record, a settings snapshot and the current time in epoch milliseconds.

extern crate serde;

use crate::{
    config::curve::{
        DEFAULT_FORGETTING_CURVE, MAX_INTERVAL, MAX_LEVELS, MAX_PROFICIENCY, MIN_INTERVAL, ONE_DAY,
    },
    problem::{ProblemIdentity, ProblemRecord},
};
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSettings {
    /// Days a problem must age at level `i` before it is due again.
    pub forgetting_curve: Vec<u32>,
}
impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            forgetting_curve: DEFAULT_FORGETTING_CURVE.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidCurve {
    Empty,
    TooLong(usize),
    OutOfRange(u32),
    NotIncreasing(u32, u32),
}
impl fmt::Display for InvalidCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("forgetting curve is empty"),
            Self::TooLong(len) => write!(
                f,
                "forgetting curve has {} entries, at most {} allowed",
                len, MAX_LEVELS
            ),
            Self::OutOfRange(v) => write!(
                f,
                "interval {} out of range [{}, {}]",
                v, MIN_INTERVAL, MAX_INTERVAL
            ),
            Self::NotIncreasing(prev, v) => {
                write!(f, "interval {} should be greater than {}", v, prev)
            }
        }
    }
}
impl StdError for InvalidCurve {}

impl ReviewSettings {
    pub fn new(forgetting_curve: Vec<u32>) -> Self {
        Self { forgetting_curve }
    }
    pub fn levels(&self) -> usize {
        self.forgetting_curve.len()
    }
    /// Interval for `level`, falling back to the last interval when the level
    /// is past the end of the curve. `None` only for an empty curve.
    pub fn interval_days(&self, level: u32) -> Option<u32> {
        self.forgetting_curve
            .get(level as usize)
            .or_else(|| self.forgetting_curve.last())
            .copied()
    }
    pub fn validate(&self) -> Result<(), InvalidCurve> {
        if self.forgetting_curve.is_empty() {
            return Err(InvalidCurve::Empty);
        }
        if self.forgetting_curve.len() > MAX_LEVELS {
            return Err(InvalidCurve::TooLong(self.forgetting_curve.len()));
        }
        let mut prev = 0;
        for &v in &self.forgetting_curve {
            if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&v) {
                return Err(InvalidCurve::OutOfRange(v));
            }
            if v <= prev {
                return Err(InvalidCurve::NotIncreasing(prev, v));
            }
            prev = v;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Scheduled,
    Review,
    Archived,
}
impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Scheduled => "Scheduled",
            Self::Review => "Review",
            Self::Archived => "Archived",
        })
    }
}

pub fn is_archived(proficiency: u32, settings: &ReviewSettings) -> bool {
    proficiency as usize >= settings.levels()
}

/// Recomputes the cached `is_archived` flag. Returns whether it had drifted.
pub fn repair_archived(record: &mut ProblemRecord, settings: &ReviewSettings) -> bool {
    let archived = is_archived(record.proficiency, settings);
    let drifted = record.is_archived != archived;
    record.is_archived = archived;
    drifted
}

pub fn derive_status(record: &ProblemRecord, settings: &ReviewSettings, now: i64) -> Status {
    if is_archived(record.proficiency, settings) {
        return Status::Archived;
    }
    match settings.interval_days(record.proficiency) {
        Some(days) if now - record.first_submission_time >= i64::from(days) * ONE_DAY => {
            Status::Review
        }
        Some(_) => Status::Scheduled,
        None => Status::Archived,
    }
}

/// Epoch milliseconds at which `record` becomes due, `None` once archived.
pub fn next_review_at(record: &ProblemRecord, settings: &ReviewSettings) -> Option<i64> {
    if is_archived(record.proficiency, settings) {
        return None;
    }
    settings
        .interval_days(record.proficiency)
        .map(|days| record.first_submission_time + i64::from(days) * ONE_DAY)
}

/// Record after an accepted submission of `identity` at `now`.
///
/// A new problem starts at proficiency 1. An existing one only advances while
/// it is due for review; scheduled and archived records come back unchanged.
pub fn apply_accepted_submission(
    existing: Option<&ProblemRecord>,
    identity: &ProblemIdentity,
    settings: &ReviewSettings,
    now: i64,
) -> ProblemRecord {
    let existing = match existing {
        Some(v) => v,
        None => {
            return ProblemRecord {
                id: identity.id.clone(),
                title: identity.title.clone(),
                difficulty: identity.difficulty,
                url: identity.url.clone(),
                first_submission_time: now,
                proficiency: 1,
                is_archived: is_archived(1, settings),
            }
        }
    };
    match derive_status(existing, settings, now) {
        Status::Archived | Status::Scheduled => existing.clone(),
        Status::Review => {
            let proficiency = (existing.proficiency + 1).min(MAX_PROFICIENCY);
            ProblemRecord {
                proficiency,
                is_archived: is_archived(proficiency, settings),
                ..existing.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Difficulty;

    const NOW: i64 = 1_700_000_000_000;

    fn identity() -> ProblemIdentity {
        ProblemIdentity {
            id: "1".to_string(),
            title: "Two Sum".to_string(),
            difficulty: Difficulty::Easy,
            url: "u".to_string(),
        }
    }
    fn record(proficiency: u32, age_days: i64) -> ProblemRecord {
        ProblemRecord {
            id: "1".to_string(),
            title: "Two Sum".to_string(),
            difficulty: Difficulty::Easy,
            url: "u".to_string(),
            first_submission_time: NOW - age_days * ONE_DAY,
            proficiency,
            is_archived: false,
        }
    }

    #[test]
    fn status_follows_interval_of_current_level() {
        let settings = ReviewSettings::default();
        assert_eq!(derive_status(&record(2, 5), &settings, NOW), Status::Review);
        assert_eq!(derive_status(&record(2, 3), &settings, NOW), Status::Scheduled);
        assert_eq!(derive_status(&record(5, 0), &settings, NOW), Status::Archived);
    }

    #[test]
    fn review_boundary_is_inclusive() {
        let settings = ReviewSettings::default();
        assert_eq!(derive_status(&record(0, 1), &settings, NOW), Status::Review);
        let mut r = record(0, 1);
        r.first_submission_time += 1;
        assert_eq!(derive_status(&r, &settings, NOW), Status::Scheduled);
    }

    #[test]
    fn first_acceptance_creates_level_one() {
        let r = apply_accepted_submission(None, &identity(), &ReviewSettings::default(), NOW);
        assert_eq!(r.proficiency, 1);
        assert_eq!(r.first_submission_time, NOW);
        assert!(!r.is_archived);
        assert_eq!(r.identity(), identity());
    }

    #[test]
    fn single_level_curve_archives_immediately() {
        let settings = ReviewSettings::new(vec![3]);
        let r = apply_accepted_submission(None, &identity(), &settings, NOW);
        assert!(r.is_archived);
        assert_eq!(derive_status(&r, &settings, NOW), Status::Archived);
    }

    #[test]
    fn scheduled_resubmission_is_idempotent() {
        let settings = ReviewSettings::default();
        let r = record(2, 1);
        let once = apply_accepted_submission(Some(&r), &identity(), &settings, NOW);
        let twice = apply_accepted_submission(Some(&once), &identity(), &settings, NOW);
        assert_eq!(once, r);
        assert_eq!(twice, r);
    }

    #[test]
    fn review_advances_to_archive() {
        let settings = ReviewSettings::default();
        let r = record(4, 16);
        assert_eq!(derive_status(&r, &settings, NOW), Status::Review);
        let next = apply_accepted_submission(Some(&r), &identity(), &settings, NOW);
        assert_eq!(next.proficiency, 5);
        assert!(next.is_archived);
        assert_eq!(next.first_submission_time, r.first_submission_time);
    }

    #[test]
    fn archived_records_absorb_submissions() {
        let settings = ReviewSettings::default();
        let mut r = record(5, 400);
        r.is_archived = true;
        let next = apply_accepted_submission(Some(&r), &identity(), &settings, NOW);
        assert_eq!(next, r);
    }

    #[test]
    fn proficiency_is_monotone_and_bounded() {
        let settings = ReviewSettings::default();
        let mut now = NOW;
        let mut r = apply_accepted_submission(None, &identity(), &settings, now);
        for _ in 0..12 {
            now += 20 * ONE_DAY;
            let next = apply_accepted_submission(Some(&r), &identity(), &settings, now);
            assert!(next.proficiency >= r.proficiency);
            assert!(next.proficiency <= MAX_PROFICIENCY);
            assert_eq!(next.is_archived, is_archived(next.proficiency, &settings));
            r = next;
        }
        assert_eq!(r.proficiency, MAX_PROFICIENCY);
    }

    #[test]
    fn long_curve_saturates_at_max_proficiency() {
        let settings = ReviewSettings::new(vec![1, 2, 3, 4, 5, 6, 7]);
        let r = record(5, 100);
        let next = apply_accepted_submission(Some(&r), &identity(), &settings, NOW);
        assert_eq!(next.proficiency, 5);
        assert!(!next.is_archived);
    }

    #[test]
    fn repair_fixes_stale_archive_flag() {
        let settings = ReviewSettings::default();
        let mut r = record(5, 0);
        assert!(repair_archived(&mut r, &settings));
        assert!(r.is_archived);
        assert!(!repair_archived(&mut r, &settings));
    }

    #[test]
    fn empty_curve_never_panics() {
        let settings = ReviewSettings::new(Vec::new());
        let r = record(0, 0);
        assert_eq!(derive_status(&r, &settings, NOW), Status::Archived);
        assert_eq!(next_review_at(&r, &settings), None);
    }

    #[test]
    fn next_review_clamps_to_last_interval() {
        let settings = ReviewSettings::new(vec![1, 2]);
        assert_eq!(settings.interval_days(7), Some(2));
        let r = record(1, 0);
        assert_eq!(next_review_at(&r, &settings), Some(NOW + 2 * ONE_DAY));
    }

    #[test]
    fn validate_rejects_malformed_curves() {
        assert_eq!(ReviewSettings::default().validate(), Ok(()));
        assert_eq!(
            ReviewSettings::new(vec![]).validate(),
            Err(InvalidCurve::Empty)
        );
        assert_eq!(
            ReviewSettings::new(vec![1, 2, 3, 4, 5, 6]).validate(),
            Err(InvalidCurve::TooLong(6))
        );
        assert_eq!(
            ReviewSettings::new(vec![0, 2]).validate(),
            Err(InvalidCurve::OutOfRange(0))
        );
        assert_eq!(
            ReviewSettings::new(vec![3, 3]).validate(),
            Err(InvalidCurve::NotIncreasing(3, 3))
        );
    }
}
