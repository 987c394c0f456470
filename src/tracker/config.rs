pub mod tracker {
    use std::time::Duration;
    pub const DEBOUNCE_DELAY: Duration = Duration::from_secs(2);
    pub const EVENT_BUFFER: usize = 64;
}
pub mod verdict {
    use std::time::Duration;
    pub const CHECK_DELAY: Duration = Duration::from_secs(2);
    pub const MAX_ATTEMPTS: u32 = 150;
    pub const MAX_ELAPSED: Duration = Duration::from_secs(300);
    pub const ACCEPTED: &str = "Accepted";
    pub const SUCCESS: &str = "SUCCESS";
}
pub mod curve {
    pub const ONE_DAY: i64 = 24 * 60 * 60 * 1000;
    pub const MAX_PROFICIENCY: u32 = 5;
    pub const DEFAULT_FORGETTING_CURVE: [u32; 5] = [1, 2, 4, 7, 15];
    pub const MIN_INTERVAL: u32 = 1;
    pub const MAX_INTERVAL: u32 = 99;
    pub const MAX_LEVELS: usize = 5;
}
pub mod storage {
    pub const SETTINGS_KEY: &str = "remindSettings";
    pub const PENDING_KEY: &str = "pendingSync";
}
pub mod judge {
    pub const BASE_URL: &str = "https://leetcode.com";
    pub const GRAPHQL_PATH: &str = "/graphql";
}
