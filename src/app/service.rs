//! Feed views
//!
//! [`FeedService`] runs the whole pipeline for one logical operation: fetch
//! the dataset's text, parse it, resolve the region slug if one was given,
//! project and aggregate. Nothing is kept between calls; every operation
//! fetches afresh.

use serde::Serialize;
use tracing::{debug, info};

use crate::app::aggregate::{self, DateGroup, DeltaRecord};
use crate::app::client::{FeedCatalog, TextSource};
use crate::app::models::{Coverage, DatasetKind, View};
use crate::app::projection::{self, Record, Scope};
use crate::app::region::{self, REGION_COUNT};
use crate::app::table::{RawRow, Table};
use crate::constants::columns;
use crate::errors::{Result, ViewError, ViewResult};

/// Upstream text wrapped the way raw views are returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawText {
    pub data: String,
}

/// Result of any view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ViewOutput {
    Records(Vec<Record>),
    Groups(Vec<DateGroup>),
    Delta(DeltaRecord),
    Record(Record),
    Raw(RawText),
}

/// Shape summary of one fetched dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSummary {
    pub kind: DatasetKind,
    pub url: String,
    pub rows: usize,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<String>,
}

/// Computes views over the upstream datasets
#[derive(Debug)]
pub struct FeedService<S> {
    source: S,
    catalog: FeedCatalog,
}

impl<S: TextSource> FeedService<S> {
    pub fn new(source: S, catalog: FeedCatalog) -> Self {
        Self { source, catalog }
    }

    pub fn catalog(&self) -> &FeedCatalog {
        &self.catalog
    }

    /// Compute `view` over `kind`
    ///
    /// `region` is the slug for region-scoped views and ignored otherwise.
    pub async fn run(&self, kind: DatasetKind, view: View, region: Option<&str>) -> Result<ViewOutput> {
        let region = match (view.takes_region(), region) {
            (true, None) => return Err(ViewError::MissingRegion { view }.into()),
            (_, region) => region.unwrap_or_default(),
        };

        info!("Computing '{}' view of the {} dataset", view, kind);

        let output = match view {
            View::ListAll => ViewOutput::Records(self.list_all(kind).await?),
            View::Latest => self.latest(kind).await?,
            View::ByRegionAll => ViewOutput::Groups(self.by_region_all(kind).await?),
            View::ByRegion => ViewOutput::Records(self.by_region(kind, region).await?),
            View::LatestByRegionAll => {
                ViewOutput::Records(self.latest_by_region_all(kind).await?)
            }
            View::LatestByRegion => {
                ViewOutput::Records(self.latest_by_region(kind, region).await?)
            }
            View::Raw => ViewOutput::Raw(RawText {
                data: self.raw(kind).await?,
            }),
        };
        Ok(output)
    }

    /// Every row of the dataset, projected, in file order
    pub async fn list_all(&self, kind: DatasetKind) -> Result<Vec<Record>> {
        ensure_supported(kind, View::ListAll)?;
        let table = self.load(kind).await?;
        Ok(aggregate::flatten(&table, kind))
    }

    /// The most recent state of the dataset
    ///
    /// National kinds yield the delta between their final two rows, state
    /// kinds the latest `REGION_COUNT`-row window and population its final
    /// row.
    pub async fn latest(&self, kind: DatasetKind) -> Result<ViewOutput> {
        ensure_supported(kind, View::Latest)?;
        let table = self.load(kind).await?;

        let output = match kind.coverage() {
            Coverage::National => {
                ViewOutput::Delta(aggregate::delta_of(&table, kind, kind.delta_fields())?)
            }
            Coverage::State => ViewOutput::Records(aggregate::project_rows(
                aggregate::latest_window(&table, REGION_COUNT),
                kind,
            )),
            Coverage::Static => {
                let row = table
                    .rows()
                    .last()
                    .ok_or(ViewError::EmptyDataset { kind })?;
                ViewOutput::Record(projection::project(row, kind, Scope::Full))
            }
        };
        Ok(output)
    }

    /// Rows grouped by date, then region
    pub async fn by_region_all(&self, kind: DatasetKind) -> Result<Vec<DateGroup>> {
        ensure_supported(kind, View::ByRegionAll)?;
        let table = self.load(kind).await?;
        Ok(aggregate::group_by_date(&table, kind))
    }

    /// Rows of one region, in file order
    ///
    /// An unrecognized slug yields an empty result.
    pub async fn by_region(&self, kind: DatasetKind, slug: &str) -> Result<Vec<Record>> {
        ensure_supported(kind, View::ByRegion)?;
        let label = region::resolve(slug);
        debug!("Resolved region slug '{}' to '{}'", slug, label);

        let table = self.load(kind).await?;
        let records = aggregate::project_rows(aggregate::filter_region(&table, &label), kind);
        if records.is_empty() {
            debug!("No {} rows for region '{}'", kind, label);
        }
        Ok(records)
    }

    /// The last `REGION_COUNT` rows
    pub async fn latest_by_region_all(&self, kind: DatasetKind) -> Result<Vec<Record>> {
        ensure_supported(kind, View::LatestByRegionAll)?;
        let table = self.load(kind).await?;
        Ok(aggregate::project_rows(
            aggregate::latest_window(&table, REGION_COUNT),
            kind,
        ))
    }

    /// One region's rows within the last `REGION_COUNT` rows
    pub async fn latest_by_region(&self, kind: DatasetKind, slug: &str) -> Result<Vec<Record>> {
        ensure_supported(kind, View::LatestByRegion)?;
        let label = region::resolve(slug);
        debug!("Resolved region slug '{}' to '{}'", slug, label);

        let table = self.load(kind).await?;
        Ok(aggregate::project_rows(
            aggregate::latest_region_match(&table, REGION_COUNT, &label),
            kind,
        ))
    }

    /// The upstream text, unchanged
    pub async fn raw(&self, kind: DatasetKind) -> Result<String> {
        let url = self.catalog.url_for(kind)?;
        Ok(self.source.fetch_text(&url).await?)
    }

    /// Fetch and parse a dataset, reporting its size and date range
    pub async fn summarize(&self, kind: DatasetKind) -> Result<FeedSummary> {
        let url = self.catalog.url_for(kind)?;
        let table = self.load(kind).await?;

        let date_of = |row: Option<&RawRow>| {
            row.and_then(|row| row.get(columns::DATE)).map(str::to_string)
        };

        Ok(FeedSummary {
            kind,
            url: url.to_string(),
            rows: table.len(),
            columns: table.columns().to_vec(),
            first_date: date_of(table.rows().first()),
            last_date: date_of(table.rows().last()),
        })
    }

    async fn load(&self, kind: DatasetKind) -> Result<Table> {
        let url = self.catalog.url_for(kind)?;
        debug!("Fetching {} dataset from {}", kind, url);

        let text = self.source.fetch_text(&url).await?;
        let table = Table::parse(&text)?;

        debug!("Loaded {} rows of the {} dataset", table.len(), kind);
        Ok(table)
    }
}

fn ensure_supported(kind: DatasetKind, view: View) -> ViewResult<()> {
    if kind.supports(view) {
        Ok(())
    } else {
        Err(ViewError::Unsupported { kind, view })
    }
}
