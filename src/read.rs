extern crate serde;
extern crate serde_json;

use leet_tracker::{
    options::{self, Options},
    tracker::NetworkEvent,
    types::Result,
};
use serde::Deserialize;
use std::fs::File;

/// One line of the browser bridge's output.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Input {
    Request(NetworkEvent),
    Tab { url: Option<String> },
    Reload,
}

pub fn parse_input(line: &str) -> std::result::Result<Option<Input>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        Ok(None)
    } else {
        serde_json::from_str(line).map(Some)
    }
}

pub fn read_options(path: Option<&str>) -> Result<Options> {
    match path {
        Some(p) => Ok(options::from_reader(File::open(p)?)?),
        None => Ok(Options::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bridge_lines() {
        assert_eq!(
            parse_input(
                r#"{"type":"request","url":"https://leetcode.com/submissions/detail/1/check/","initiator":"https://leetcode.com","timestamp":1700000000000.5}"#
            )
            .unwrap(),
            Some(Input::Request(NetworkEvent {
                url: "https://leetcode.com/submissions/detail/1/check/".to_string(),
                initiator: Some("https://leetcode.com".to_string()),
                timestamp: 1700000000000.5,
            }))
        );
        assert_eq!(
            parse_input(r#"{"type":"tab","url":null}"#).unwrap(),
            Some(Input::Tab { url: None })
        );
        assert_eq!(
            parse_input(r#"{"type":"reload"}"#).unwrap(),
            Some(Input::Reload)
        );
        assert_eq!(parse_input("   ").unwrap(), None);
        assert!(parse_input(r#"{"type":"launch"}"#).is_err());
    }
}
