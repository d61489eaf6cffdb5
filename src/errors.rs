//! Error types for myvax_fetcher
//!
//! This module defines the error types for every stage of a request: retrieval
//! of the upstream text, tabular parsing, view computation and configuration.
//! Field-level coercion failures have no variant here: a value that does not
//! parse as an integer becomes a sentinel in the output.

use std::path::PathBuf;
use thiserror::Error;

use crate::app::models::{DatasetKind, View};

/// Upstream retrieval errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, DNS, body read failure)
    #[error("HTTP request failed for {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request to {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    /// Server returned a non-success status
    #[error("Upstream returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL provided or built from configuration
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// In-memory source has no text registered for the URL
    #[error("No feed registered for {url}")]
    NotFound { url: String },
}

/// Tabular text parsing errors
#[derive(Error, Debug)]
pub enum TableError {
    /// The text did not contain a header line
    #[error("Feed is empty: no header row found")]
    MissingHeader,

    /// A data line has a different number of fields than the header
    #[error("Line {line} has {found} fields, header declares {expected}")]
    FieldCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Any other reader failure (invalid UTF-8, I/O on the in-memory buffer)
    #[error("Malformed delimited text")]
    Malformed(#[from] csv::Error),
}

/// View computation errors
#[derive(Error, Debug)]
pub enum ViewError {
    /// The requested view does not exist for this dataset kind
    #[error("View '{view}' is not available for the {kind} dataset")]
    Unsupported { kind: DatasetKind, view: View },

    /// Delta computation needs at least two rows
    #[error("Not enough rows in the {kind} dataset to compute a delta: need 2, have {rows}")]
    InsufficientData { kind: DatasetKind, rows: usize },

    /// A region-scoped view was requested without a region
    #[error("View '{view}' requires a region")]
    MissingRegion { view: View },

    /// The latest view has nothing to return
    #[error("The {kind} dataset has no rows")]
    EmptyDataset { kind: DatasetKind },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Caller-facing condition an error maps to
///
/// A server front end would translate these into status codes
/// (503, 502, 400, 500); the CLI only reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCondition {
    /// Upstream fetch failed
    ServiceUnavailable,
    /// Upstream text could not be turned into the requested view
    BadUpstreamData,
    /// The request itself asked for something that does not exist
    BadRequest,
    /// Local misconfiguration or I/O
    Internal,
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Retrieval error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Parse error
    #[error(transparent)]
    Table(#[from] TableError),

    /// View error
    #[error(transparent)]
    View(#[from] ViewError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON output error
    #[error("Failed to serialize output")]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Map the error onto the condition the caller should report
    pub fn condition(&self) -> ErrorCondition {
        match self {
            AppError::Fetch(FetchError::InvalidUrl { .. })
            | AppError::Fetch(FetchError::ClientBuild(_)) => ErrorCondition::Internal,
            AppError::Fetch(_) => ErrorCondition::ServiceUnavailable,
            AppError::Table(_) => ErrorCondition::BadUpstreamData,
            AppError::View(ViewError::Unsupported { .. })
            | AppError::View(ViewError::MissingRegion { .. }) => ErrorCondition::BadRequest,
            AppError::View(_) => ErrorCondition::BadUpstreamData,
            AppError::Config(_) | AppError::Json(_) | AppError::Io(_) | AppError::Generic { .. } => {
                ErrorCondition::Internal
            }
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "retrieval",
            AppError::Table(_) => "parse",
            AppError::View(_) => "view",
            AppError::Config(_) => "config",
            AppError::Json(_) => "output",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Retrieval result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Table parsing result type alias
pub type TableResult<T> = std::result::Result<T, TableError>;

/// View result type alias
pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_errors_are_service_unavailable() {
        let error = AppError::from(FetchError::Status {
            url: "https://example.com/vax.csv".to_string(),
            status: 404,
        });
        assert_eq!(error.condition(), ErrorCondition::ServiceUnavailable);
        assert_eq!(error.category(), "retrieval");
        assert!(error.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_parse_errors_are_bad_upstream_data() {
        let error = AppError::from(TableError::FieldCountMismatch {
            line: 3,
            expected: 4,
            found: 2,
        });
        assert_eq!(error.condition(), ErrorCondition::BadUpstreamData);
        assert_eq!(
            error.to_string(),
            "Line 3 has 2 fields, header declares 4"
        );
    }

    #[test]
    fn test_view_error_conditions() {
        let unsupported = AppError::from(ViewError::Unsupported {
            kind: DatasetKind::Population,
            view: View::ByRegionAll,
        });
        assert_eq!(unsupported.condition(), ErrorCondition::BadRequest);

        let insufficient = AppError::from(ViewError::InsufficientData {
            kind: DatasetKind::NationalVaccination,
            rows: 1,
        });
        assert_eq!(insufficient.condition(), ErrorCondition::BadUpstreamData);
    }
}
