extern crate serde;
extern crate serde_yaml;

use crate::{config::judge::BASE_URL, judge::PollOptions};
use serde::{Deserialize, Serialize};
use std::{
    error::Error as StdError,
    fmt,
    io::Read,
    path::PathBuf,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Options {
    pub base_url: String,
    pub proxy: Option<String>,
    /// Synchronized tier; the source of truth after a restart.
    pub durable_path: PathBuf,
    /// Local tier. Kept in memory when unset.
    pub fast_path: Option<PathBuf>,
    pub poll: PollOptions,
}
impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            proxy: None,
            durable_path: PathBuf::from("leet-tracker.json"),
            fast_path: None,
            poll: PollOptions::default(),
        }
    }
}

#[derive(Debug)]
pub struct Error(serde_yaml::Error);
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing options: {}", self.0)
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

pub fn from_reader<R: Read>(rdr: R) -> Result<Options, Error> {
    serde_yaml::from_reader(rdr).map_err(Error)
}
