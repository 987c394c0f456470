use std::{boxed::Box, error::Error as StdError, result::Result as StdResult};

pub type Error = Box<dyn StdError + Send + Sync>;
pub type Result<T> = StdResult<T, Error>;
