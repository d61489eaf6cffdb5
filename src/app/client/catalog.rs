//! Upstream locations of each dataset

use std::collections::HashMap;

use url::Url;

use crate::app::models::DatasetKind;
use crate::constants::feeds;
use crate::errors::{FetchError, FetchResult};

/// Maps dataset kinds to the URLs they are fetched from
#[derive(Debug, Clone)]
pub struct FeedCatalog {
    base_url: Url,
    paths: HashMap<DatasetKind, String>,
}

impl FeedCatalog {
    /// Catalog rooted at `base_url` using the default file paths
    ///
    /// A trailing slash is added to the base when missing so that paths are
    /// joined beneath it rather than replacing its last segment.
    pub fn new(base_url: &str) -> FetchResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let base_url = Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            error: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            paths: HashMap::new(),
        })
    }

    /// Replace the path used for one dataset
    pub fn with_path(mut self, kind: DatasetKind, path: impl Into<String>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Path of a dataset relative to the base URL
    pub fn path_for(&self, kind: DatasetKind) -> &str {
        self.paths
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_path())
    }

    /// Full URL of a dataset
    pub fn url_for(&self, kind: DatasetKind) -> FetchResult<Url> {
        let path = self.path_for(kind);
        self.base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                error: e.to_string(),
            })
    }
}

impl Default for FeedCatalog {
    fn default() -> Self {
        Self {
            base_url: Url::parse(feeds::BASE_URL).expect("Feed base URL constant should be valid"),
            paths: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let catalog = FeedCatalog::default();
        assert_eq!(
            catalog.url_for(DatasetKind::NationalVaccination).unwrap().as_str(),
            "https://raw.githubusercontent.com/CITF-Malaysia/citf-public/main/vaccination/vax_malaysia.csv"
        );
        assert_eq!(
            catalog.url_for(DatasetKind::Population).unwrap().as_str(),
            "https://raw.githubusercontent.com/CITF-Malaysia/citf-public/main/static/population.csv"
        );
    }

    #[test]
    fn test_base_without_trailing_slash_keeps_last_segment() {
        let catalog = FeedCatalog::new("https://mirror.example.com/citf").unwrap();
        assert_eq!(
            catalog.url_for(DatasetKind::StateRegistration).unwrap().as_str(),
            "https://mirror.example.com/citf/registration/vaxreg_state.csv"
        );
    }

    #[test]
    fn test_path_override() {
        let catalog = FeedCatalog::new("https://mirror.example.com/")
            .unwrap()
            .with_path(DatasetKind::Population, "static/population_v2.csv");
        assert_eq!(
            catalog.path_for(DatasetKind::Population),
            "static/population_v2.csv"
        );
        assert_eq!(
            catalog.path_for(DatasetKind::StateVaccination),
            "vaccination/vax_state.csv"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            FeedCatalog::new("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
