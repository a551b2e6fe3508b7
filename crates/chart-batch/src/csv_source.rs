// File: crates/chart-batch/src/csv_source.rs
// Summary: CSV files behind the data-reader contract, plus instruction and option sheets.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chart_core::{ChartInstruction, DataReader, DataSource, DataSources, MemoryReader, Query, RenderOptions, Row};
use serde::Deserialize;
use tracing::{debug, warn};

/// Read a headed CSV file into rows keyed by (trimmed) column name.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for record in rdr.deserialize::<Row>() {
        rows.push(record.with_context(|| format!("reading {}", path.display()))?);
    }
    debug!(path = %path.display(), rows = rows.len(), "csv loaded");
    Ok(rows)
}

/// A dataset directory: `datapoints.csv` and (optionally) `concepts.csv`.
/// Tables are read once at open; queries run against the loaded rows.
#[derive(Debug)]
pub struct CsvReader {
    tables: MemoryReader,
}

impl CsvReader {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let datapoints = read_rows(&dir.join("datapoints.csv"))?;
        let concepts_path = dir.join("concepts.csv");
        let concepts = if concepts_path.exists() {
            read_rows(&concepts_path)?
        } else {
            warn!(dir = %dir.display(), "no concepts.csv, values will be shown as plain numbers");
            Vec::new()
        };
        let tables = MemoryReader::new().with_table("datapoints", datapoints).with_table("concepts", concepts);
        Ok(Self { tables })
    }
}

impl DataReader for CsvReader {
    fn read(&self, query: &Query) -> chart_core::Result<Vec<Row>> {
        self.tables.read(query)
    }
}

/// Open `<data_dir>/<dataset>` for each named dataset. Datasets that fail to load are
/// logged and left out, so charts using them fail individually later.
pub fn load_sources<'a>(data_dir: &Path, datasets: impl IntoIterator<Item = &'a str>) -> DataSources {
    let mut sources = DataSources::new();
    for name in datasets {
        if name.is_empty() || sources.get(name).is_some() {
            continue;
        }
        let loaded = CsvReader::open(data_dir.join(name))
            .and_then(|reader| DataSource::load(reader).map_err(anyhow::Error::from));
        match loaded {
            Ok(source) => sources.insert(name, source),
            Err(e) => warn!(dataset = name, "dataset not loaded: {e:#}"),
        }
    }
    sources
}

/// The instruction sheet: one chart per row.
pub fn read_instructions(path: &Path) -> Result<Vec<ChartInstruction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    rdr.deserialize()
        .collect::<std::result::Result<Vec<ChartInstruction>, _>>()
        .with_context(|| format!("reading {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct OptionRow {
    key: String,
    #[serde(default)]
    value: String,
}

/// A two-column `key,value` sheet of render options.
pub fn read_options(path: &Path) -> Result<RenderOptions> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut options = RenderOptions::new();
    for row in rdr.deserialize::<OptionRow>() {
        let row = row.with_context(|| format!("reading {}", path.display()))?;
        options.insert(row.key, row.value);
    }
    Ok(options)
}
