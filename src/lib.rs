//! MyVax Fetcher Library
//!
//! Fetches the CITF Malaysia vaccination, registration and population CSV
//! feeds and reshapes them into JSON views: full listings, day-over-day
//! deltas, per-date state groupings and per-state filters.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(ENV_FEED_BASE_URL, "MYVAX_FEED_BASE_URL");
        assert!(FEED_BASE_URL.ends_with('/'));
        assert!(USER_AGENT.contains("MyVax-Fetcher"));
    }

    #[test]
    fn test_error_types() {
        let view_error = errors::ViewError::InsufficientData {
            kind: app::DatasetKind::NationalVaccination,
            rows: 1,
        };
        let app_error = AppError::View(view_error);

        assert_eq!(app_error.category(), "view");
        assert_eq!(
            app_error.condition(),
            errors::ErrorCondition::BadUpstreamData
        );
    }
}
