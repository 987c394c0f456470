extern crate termcolor;

use leet_tracker::error::Error;
use std::io::Write;
use termcolor::{Color, StandardStream};

#[allow(unused_must_use)]
pub fn write_result<T, E: Error>(stdout: &mut StandardStream, result: Result<T, E>, success: &str) {
    match result {
        Ok(_) => write_ok!(stdout, "Success", "{}", success),
        Err(e) => write_error!(stdout, "Error", "{}", e),
    }
}
