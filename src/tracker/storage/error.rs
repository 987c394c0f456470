extern crate serde_json;

use std::{error::Error as StdError, fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum StoreError {
    Io(PathBuf, io::Error),
    Json(PathBuf, serde_json::Error),
    Codec(String, serde_json::Error),
    Unavailable(String),
}
impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, err) => write!(f, "Error accessing {}: {}", path.display(), err),
            Self::Json(path, err) => write!(f, "Error processing {}: {}", path.display(), err),
            Self::Codec(key, err) => write!(f, "Error converting value of {}: {}", key, err),
            Self::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}
impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Json(_, e) | Self::Codec(_, e) => Some(e),
            Self::Unavailable(_) => None,
        }
    }
}
