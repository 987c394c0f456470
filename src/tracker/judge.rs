pub mod error;
pub mod metadata;
pub mod pattern;
pub mod remote;
pub mod retry;
pub mod session;
pub mod verdict;

pub use error::{LookupError, PollError, TransportError};
pub use metadata::MetadataClient;
pub use pattern::RegexSet;
pub use remote::Remote;
pub use retry::{PollOptions, PollPolicy};
pub use session::Session;
pub use verdict::{Verdict, VerdictPoller};
