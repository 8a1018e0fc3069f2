//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Backend network constants
pub mod network {
    /// Default backend API base
    pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Connection establishment timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

    /// Comparison endpoint path, relative to the API base
    pub const COMPARE_PATH: &str = "compare/";

    /// AI insights endpoint path
    pub const INSIGHTS_PATH: &str = "ai/insights/";

    /// Health endpoint path
    pub const STATUS_PATH: &str = "status/";
}

/// Selection rules
pub mod selection {
    /// Banks needed before a report is generated
    pub const MIN_ENTITIES: usize = 2;

    /// Product used when none is configured
    pub const DEFAULT_PRODUCT: &str = "deposits";
}

/// Fetch orchestration
pub mod fetch {
    /// 0 disables periodic refresh
    pub const DEFAULT_REFETCH_INTERVAL_MS: u64 = 0;

    /// Lower bound for a non-zero refresh interval
    pub const MIN_REFETCH_INTERVAL_MS: u64 = 100;
}

/// Demo data
pub mod demo {
    /// Probability that a synthetic cell is `true`, identical for every bank
    pub const SATISFIED_PROBABILITY: f64 = 0.4;
}
