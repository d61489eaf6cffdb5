//! Core application logic for myvax_fetcher
//!
//! This module contains the retrieval client, the tabular parser, region
//! resolution, record projection, aggregation and the service that composes
//! them into views.
//!
//! # Examples
//!
//! ```rust,no_run
//! use myvax_fetcher::app::{DatasetKind, FeedCatalog, FeedClient, FeedService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = FeedService::new(FeedClient::new()?, FeedCatalog::default());
//!
//! // Day-over-day change in the national vaccination counts
//! let latest = service.latest(DatasetKind::NationalVaccination).await?;
//! println!("{}", serde_json::to_string_pretty(&latest)?);
//!
//! // Every Kuala Lumpur row of the state registration feed
//! let kl = service.by_region(DatasetKind::StateRegistration, "kuala-lumpur").await?;
//! println!("{} rows", kl.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod client;
pub mod models;
pub mod projection;
pub mod region;
pub mod service;
pub mod table;

// Re-export main public API
pub use aggregate::{DateGroup, DeltaRecord, FieldCounts};
pub use client::{ClientConfig, FeedCatalog, FeedClient, StaticSource, TextSource};
pub use models::{Count, Coverage, DatasetKind, DeltaField, RecordShape, View};
pub use projection::{Record, Scope};
pub use region::{resolve, CanonicalRegion, REGION_COUNT};
pub use service::{FeedService, FeedSummary, RawText, ViewOutput};
pub use table::{RawRow, Table};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        let config = ClientConfig::default();
        assert!(config.rate_limit_rps > 0);
        assert_eq!(REGION_COUNT, CanonicalRegion::ALL.len());
    }
}
