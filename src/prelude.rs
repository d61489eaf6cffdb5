//! Prelude module for myvax_fetcher
//!
//! Re-exports the items most integrations need so that a single
//! `use myvax_fetcher::prelude::*;` is enough to compute views.
//!
//! # Usage
//!
//! ```rust,no_run
//! use myvax_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let service = FeedService::new(FeedClient::new()?, FeedCatalog::default());
//!     let output = service
//!         .run(DatasetKind::StateVaccination, View::LatestByRegion, Some("johor"))
//!         .await?;
//!     println!("{}", serde_json::to_string(&output)?);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, ErrorCondition, Result};

// Views and the types they return
pub use crate::app::{
    CanonicalRegion, ClientConfig, Count, DatasetKind, DateGroup, DeltaRecord, FeedCatalog,
    FeedClient, FeedService, Record, StaticSource, TextSource, View, ViewOutput, REGION_COUNT,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_RATE_LIMIT_RPS, FEED_BASE_URL, USER_AGENT};

pub use tokio;
