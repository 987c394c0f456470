extern crate serde;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        })
    }
}
impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Self::Easy),
            "Medium" => Ok(Self::Medium),
            "Hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty {:?}", other)),
        }
    }
}

/// Whether `key` names a problem record: a non-empty string of ascii digits.
pub fn is_problem_id(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

/// Canonical identity of a problem as reported by the judge.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProblemIdentity {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub url: String,
    /// Epoch milliseconds of the first accepted submission. Never updated.
    #[serde(alias = "submissionTime")]
    pub first_submission_time: i64,
    pub proficiency: u32,
    pub is_archived: bool,
}
impl ProblemRecord {
    pub fn identity(&self) -> ProblemIdentity {
        ProblemIdentity {
            id: self.id.clone(),
            title: self.title.clone(),
            difficulty: self.difficulty,
            url: self.url.clone(),
        }
    }
}
impl fmt::Display for ProblemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({})", self.id, self.title, self.difficulty)
    }
}
