//! Aggregations over a parsed feed
//!
//! All operations here are pure functions of an immutable [`Table`]: they
//! trust the feed's row order (date ascending, one row per region per date
//! for state-level files) and never re-sort.

use std::collections::{HashMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::app::models::{Count, DatasetKind, DeltaField};
use crate::app::projection::{count, project, Record, Scope};
use crate::app::table::{RawRow, Table};
use crate::constants::columns;
use crate::errors::{ViewError, ViewResult};

/// Every row of one date, projected without the date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: String,
    #[serde(rename = "stateData")]
    pub state_data: Vec<Record>,
}

/// Ordered field-name to count mapping
///
/// Serializes as a JSON object whose keys keep the delta field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldCounts(Vec<(&'static str, Count)>);

impl FieldCounts {
    /// Count for a field key
    pub fn get(&self, key: &str) -> Option<Count> {
        self.0
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| *value)
    }

    /// Field keys and counts, in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Count)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Change between the final two rows of a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaRecord {
    /// Date of the latest row
    pub date: String,
    /// Date of the row it was compared against
    pub previous_date: String,
    /// Latest minus previous, per field
    pub update: FieldCounts,
    /// Latest value, per field
    pub total: FieldCounts,
}

/// Project every row, keeping file order
pub fn flatten(table: &Table, kind: DatasetKind) -> Vec<Record> {
    project_rows(table.iter(), kind)
}

/// Project a selection of rows, keeping their order
pub fn project_rows<'a>(
    rows: impl IntoIterator<Item = &'a RawRow>,
    kind: DatasetKind,
) -> Vec<Record> {
    rows.into_iter()
        .map(|row| project(row, kind, Scope::Full))
        .collect()
}

/// Group rows by date, dates in first-occurrence order
///
/// Each group holds every row of that date in file order, projected with
/// region scope.
pub fn group_by_date(table: &Table, kind: DatasetKind) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    let mut index_by_date: HashMap<&str, usize> = HashMap::new();

    for row in table {
        let date = row.get(columns::DATE).unwrap_or_default();
        let index = *index_by_date.entry(date).or_insert_with(|| {
            groups.push(DateGroup {
                date: date.to_string(),
                state_data: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index]
            .state_data
            .push(project(row, kind, Scope::Region));
    }

    debug!(
        "Grouped {} rows into {} dates",
        table.len(),
        groups.len()
    );
    groups
}

/// Rows whose region column equals `label`, in file order
pub fn filter_region<'a>(table: &'a Table, label: &'a str) -> impl Iterator<Item = &'a RawRow> {
    table
        .iter()
        .filter(move |row| row.get(columns::REGION) == Some(label))
}

/// The last `n` rows in file order, or every row when there are fewer
///
/// Logs a warning when the window does not look like one snapshot of
/// distinct regions sharing a date; the window itself is returned unchanged.
pub fn latest_window(table: &Table, n: usize) -> &[RawRow] {
    let rows = table.rows();
    let window = &rows[rows.len().saturating_sub(n)..];

    let dates: HashSet<_> = window.iter().map(|row| row.get(columns::DATE)).collect();
    let regions: HashSet<_> = window.iter().map(|row| row.get(columns::REGION)).collect();
    if dates.len() > 1 || regions.len() != window.len() {
        warn!(
            "Latest {}-row window spans {} dates and {} distinct regions",
            window.len(),
            dates.len(),
            regions.len()
        );
    }

    window
}

/// Rows within the latest `n`-row window whose region equals `label`
pub fn latest_region_match<'a>(table: &'a Table, n: usize, label: &str) -> Vec<&'a RawRow> {
    latest_window(table, n)
        .iter()
        .filter(|row| row.get(columns::REGION) == Some(label))
        .collect()
}

/// Delta between the final two rows for each field
///
/// # Errors
///
/// Returns `ViewError::InsufficientData` when the table has fewer than two
/// rows.
pub fn delta_of(table: &Table, kind: DatasetKind, fields: &[DeltaField]) -> ViewResult<DeltaRecord> {
    let rows = table.rows();
    let [.., previous, latest] = rows else {
        return Err(ViewError::InsufficientData {
            kind,
            rows: rows.len(),
        });
    };

    let mut update = Vec::with_capacity(fields.len());
    let mut total = Vec::with_capacity(fields.len());
    for field in fields {
        let current = count(latest, field.column);
        update.push((field.key, current - count(previous, field.column)));
        total.push((field.key, current));
    }

    Ok(DeltaRecord {
        date: latest.get(columns::DATE).unwrap_or_default().to_string(),
        previous_date: previous.get(columns::DATE).unwrap_or_default().to_string(),
        update: FieldCounts(update),
        total: FieldCounts(total),
    })
}
