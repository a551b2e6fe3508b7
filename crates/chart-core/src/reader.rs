// File: crates/chart-core/src/reader.rs
// Summary: Data-reader contract (queries over named tables) and an in-memory implementation.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::config::{ChartConfig, TimeInterval};
use crate::error::{ChartError, Result};
use crate::format::FormatKind;
use crate::series::parse_time;

/// A row of a table, keyed by column name.
pub type Row = BTreeMap<String, String>;

/// Columns to return: key dimensions and measurement values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub key: Vec<String>,
    pub value: Vec<String>,
}

/// `{"$in": [...]}`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InSet {
    #[serde(rename = "$in")]
    pub values: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<InSet>,
    #[serde(skip_serializing_if = "unbounded")]
    pub time: TimeInterval,
}

fn unbounded(t: &TimeInterval) -> bool {
    t.start.is_none() && t.end.is_none()
}

impl Filter {
    /// Rows carry the geography either as `geo` or as `country`.
    /// A bounded time filter rejects rows whose time is missing or unreadable.
    pub fn matches(&self, row: &Row) -> bool {
        if let Some(set) = &self.geo {
            let geo = row.get("geo").or_else(|| row.get("country"));
            if !geo.is_some_and(|g| set.values.iter().any(|v| v == g)) {
                return false;
            }
        }
        if unbounded(&self.time) {
            return true;
        }
        row.get("time")
            .and_then(|t| parse_time(t).ok())
            .is_some_and(|t| self.time.contains(t.year()))
    }
}

/// `select ... where ... from <table>`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    pub select: Selection,
    #[serde(rename = "where")]
    pub filter: Filter,
    pub from: String,
}

impl Query {
    /// Datapoints of one indicator for one geography, restricted to the configured years.
    pub fn datapoints(config: &ChartConfig) -> Self {
        Self {
            select: Selection {
                key: vec!["geo".to_string(), "time".to_string()],
                value: vec![config.indicator.clone()],
            },
            filter: Filter {
                geo: Some(InSet { values: vec![config.geo_id.clone()] }),
                time: config.time_interval,
            },
            from: "datapoints".to_string(),
        }
    }

    /// The concept table: names and display formats of every measurement.
    pub fn concepts() -> Self {
        Self {
            select: Selection {
                key: vec!["concept".to_string()],
                value: vec!["name".to_string(), "name_short".to_string(), "format".to_string()],
            },
            filter: Filter::default(),
            from: "concepts".to_string(),
        }
    }

    /// Names of the selected columns, keys first.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.select.key.iter().chain(&self.select.value).map(String::as_str)
    }
}

/// Source of tabular rows. Implementations decide where tables live.
pub trait DataReader {
    fn read(&self, query: &Query) -> Result<Vec<Row>>;
}

/// Tables held in memory. Rows are filtered by the query and projected onto its columns.
#[derive(Clone, Debug, Default)]
pub struct MemoryReader {
    tables: BTreeMap<String, Vec<Row>>,
}

impl MemoryReader {
    pub fn new() -> Self { Self::default() }

    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert_table(name, rows);
        self
    }

    pub fn insert_table(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(name.into(), rows);
    }
}

impl DataReader for MemoryReader {
    fn read(&self, query: &Query) -> Result<Vec<Row>> {
        let rows = self
            .tables
            .get(&query.from)
            .ok_or_else(|| ChartError::Reader(format!("no table named {:?}", query.from)))?;
        let columns: Vec<&str> = query.columns().collect();
        Ok(rows
            .iter()
            .filter(|row| query.filter.matches(row))
            .map(|row| {
                row.iter()
                    .filter(|(k, _)| columns.is_empty() || columns.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .collect())
    }
}

/// Build a row from `(column, value)` pairs.
pub fn row<K: Into<String>, V: Into<String>>(cells: impl IntoIterator<Item = (K, V)>) -> Row {
    cells.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Descriptive record of a measurement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConceptMetadata {
    pub id: String,
    pub name: String,
    pub name_short: String,
    /// `"percent"` or `"share"` switch value labels to percentages.
    pub display_format: Option<String>,
}

impl ConceptMetadata {
    /// Read a concept-table row; `None` without a `concept` column.
    pub fn from_row(row: &Row) -> Option<Self> {
        let id = row.get("concept").filter(|c| !c.trim().is_empty())?;
        let cell = |k: &str| row.get(k).cloned().unwrap_or_default();
        Some(Self {
            id: id.trim().to_string(),
            name: cell("name"),
            name_short: cell("name_short"),
            display_format: row.get("format").map(|f| f.trim().to_string()).filter(|f| !f.is_empty()),
        })
    }

    pub fn kind(&self) -> FormatKind {
        FormatKind::from_display_format(self.display_format.as_deref())
    }
}
