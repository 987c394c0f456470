use crate::{
    judge::{LookupError, PollError},
    problem::ProblemRecord,
    storage::StoreError,
    store::StoreWriteError,
};
use std::fmt;

/// Where an episode is when it runs or stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    AwaitingVerdict,
    AwaitingMetadata,
    Committing,
}
impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolving => "resolving problem",
            Self::AwaitingVerdict => "awaiting verdict",
            Self::AwaitingMetadata => "awaiting metadata",
            Self::Committing => "committing",
        })
    }
}

#[derive(Debug)]
pub enum Abort {
    NoActiveTab,
    ForeignInitiator(Option<String>),
    NoSlug(String),
    Poll(PollError),
    NotAccepted(String),
    Lookup(LookupError),
    Read(StoreError),
}
impl Abort {
    pub fn stage(&self) -> Stage {
        match self {
            Self::NoActiveTab | Self::ForeignInitiator(_) | Self::NoSlug(_) => Stage::Resolving,
            Self::Poll(_) | Self::NotAccepted(_) => Stage::AwaitingVerdict,
            Self::Lookup(_) => Stage::AwaitingMetadata,
            Self::Read(_) => Stage::Committing,
        }
    }
}
impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveTab => f.write_str("no active tab"),
            Self::ForeignInitiator(Some(origin)) => {
                write!(f, "request initiated by {}", origin)
            }
            Self::ForeignInitiator(None) => f.write_str("request has no initiator"),
            Self::NoSlug(url) => write!(f, "no problem in {}", url),
            Self::Poll(err) => write!(f, "{}", err),
            Self::NotAccepted(msg) => write!(f, "verdict {:?}", msg),
            Self::Lookup(err) => write!(f, "{}", err),
            Self::Read(err) => write!(f, "{}", err),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// A new or advanced record reached both tiers.
    Committed(ProblemRecord),
    /// The submission did not change the record.
    Unchanged(ProblemRecord),
    /// The record was computed but not every tier took it.
    WriteFailed(ProblemRecord, StoreWriteError),
    Aborted(Abort),
}
impl Outcome {
    pub fn record(&self) -> Option<&ProblemRecord> {
        match self {
            Self::Committed(r) | Self::Unchanged(r) | Self::WriteFailed(r, _) => Some(r),
            Self::Aborted(_) => None,
        }
    }
}
