//! Application constants for myvax_fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Overrides the feed base URL from configuration
    pub const FEED_BASE_URL: &str = "MYVAX_FEED_BASE_URL";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "MyVax-Fetcher/0.1.0 (CITF feed reshaper)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 5;
}

/// Rate limiting
pub mod limits {
    /// Default rate limit for upstream requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
}

/// Upstream CITF feed locations
pub mod feeds {
    /// Base URL of the CITF public data repository
    pub const BASE_URL: &str = "https://raw.githubusercontent.com/CITF-Malaysia/citf-public/main/";

    /// National daily vaccination counts
    pub const NATIONAL_VACCINATION: &str = "vaccination/vax_malaysia.csv";

    /// Per-state daily vaccination counts
    pub const STATE_VACCINATION: &str = "vaccination/vax_state.csv";

    /// National cumulative registration counts
    pub const NATIONAL_REGISTRATION: &str = "registration/vaxreg_malaysia.csv";

    /// Per-state cumulative registration counts
    pub const STATE_REGISTRATION: &str = "registration/vaxreg_state.csv";

    /// Static population table
    pub const POPULATION: &str = "static/population.csv";
}

/// Column names shared by every upstream file
pub mod columns {
    /// ISO `YYYY-MM-DD` date column
    pub const DATE: &str = "date";

    /// Region label column
    pub const REGION: &str = "state";
}

/// Configuration file locations
pub mod config {
    /// Directory name under the user config dir
    pub const APP_DIR: &str = "myvax-fetcher";

    /// Project-local config file name
    pub const LOCAL_FILE: &str = "myvax-fetcher.toml";

    /// Config file name inside the config directory
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use env::FEED_BASE_URL as ENV_FEED_BASE_URL;
pub use feeds::BASE_URL as FEED_BASE_URL;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::DEFAULT_RATE_LIMIT_RPS;
