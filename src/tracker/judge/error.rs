extern crate reqwest;

use std::{error::Error as StdError, fmt, time::Duration};

#[derive(Debug)]
pub enum TransportError {
    Builder(reqwest::Error),
    Network(reqwest::Error),
    Other(String),
}
impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builder(err) => write!(f, "Error building client: {}", err),
            Self::Network(err) => write!(f, "Error sending request: {}", err),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}
impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Builder(x) | Self::Network(x) => Some(x),
            Self::Other(_) => None,
        }
    }
}

pub(super) fn network_error(err: reqwest::Error) -> TransportError {
    TransportError::Network(err)
}

#[derive(Debug)]
pub enum LookupError {
    EmptySlug,
    Transport(String, TransportError),
    NoData(String),
    Malformed(String, String),
}
impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySlug => f.write_str("No problem slug to look up"),
            Self::Transport(slug, err) => write!(f, "Error looking up {}: {}", slug, err),
            Self::NoData(slug) => write!(f, "Judge returned no data for {}", slug),
            Self::Malformed(slug, what) => {
                write!(f, "Malformed metadata for {}: {}", slug, what)
            }
        }
    }
}
impl StdError for LookupError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(_, e) => Some(e),
            Self::EmptySlug | Self::NoData(_) | Self::Malformed(_, _) => None,
        }
    }
}

#[derive(Debug)]
pub enum PollError {
    Transport(TransportError),
    EmptyBody,
    Timeout { attempts: u32, elapsed: Duration },
}
impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "Error polling verdict: {}", err),
            Self::EmptyBody => f.write_str("Verdict check returned no body"),
            Self::Timeout { attempts, elapsed } => write!(
                f,
                "Verdict still pending after {} checks ({:.1}s)",
                attempts,
                elapsed.as_secs_f32()
            ),
        }
    }
}
impl StdError for PollError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::EmptyBody | Self::Timeout { .. } => None,
        }
    }
}
