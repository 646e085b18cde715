/// Longest request timeout accepted for community service calls (5 minutes)
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Upper bound for concurrent community service requests
pub const MAX_CONCURRENT_REQUESTS: usize = 32;

/// Default number of concurrent community service requests
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 4;

/// Lowest port accepted when a port is required
pub const MIN_REQUIRED_PORT: u16 = 1;

/// Highest TCP port
pub const MAX_PORT: u16 = u16::MAX;
