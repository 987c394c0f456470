use crate::curve;
use std::error::Error as StdError;

/// Errors the binary can report through `write_result`.
pub trait Error: StdError + Send {}

impl Error for curve::InvalidCurve {}
