// File: crates/chart-core/src/source.rs
// Summary: Named data sources and the config → rows → series → chart pipeline.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::canvas::{Canvas, ChartHandle};
use crate::chart::render;
use crate::config::{ChartConfig, RenderOptions};
use crate::error::{ChartError, Result};
use crate::reader::{ConceptMetadata, DataReader, Query};
use crate::series::Series;

/// A reader together with its concept table, read once on load.
pub struct DataSource {
    reader: Box<dyn DataReader>,
    concepts: BTreeMap<String, ConceptMetadata>,
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource").field("concepts", &self.concepts.len()).finish_non_exhaustive()
    }
}

impl DataSource {
    pub fn load(reader: impl DataReader + 'static) -> Result<Self> {
        let rows = reader.read(&Query::concepts())?;
        let concepts: BTreeMap<_, _> = rows
            .iter()
            .filter_map(ConceptMetadata::from_row)
            .map(|c| (c.id.clone(), c))
            .collect();
        debug!(concepts = concepts.len(), "concept table loaded");
        Ok(Self { reader: Box::new(reader), concepts })
    }

    pub fn concept(&self, id: &str) -> Option<&ConceptMetadata> {
        self.concepts.get(id)
    }

    /// Samples of the configured indicator and geography.
    pub fn series(&self, config: &ChartConfig) -> Result<Series> {
        let rows = self.reader.read(&Query::datapoints(config))?;
        Series::from_rows(&rows, &config.indicator)
    }
}

/// Data sources by dataset name.
#[derive(Debug, Default)]
pub struct DataSources(BTreeMap<String, DataSource>);

impl DataSources {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, dataset: impl Into<String>, source: DataSource) {
        self.0.insert(dataset.into(), source);
    }

    pub fn get(&self, dataset: &str) -> Option<&DataSource> {
        self.0.get(dataset)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Read the configured series and render it onto `canvas`.
///
/// Fails before reading when the dataset is unknown or no indicator is set.
/// An empty result still renders (as the empty-data placeholder).
pub fn make_linechart(
    config: &ChartConfig,
    sources: &DataSources,
    options: &RenderOptions,
    canvas: &mut Canvas,
) -> Result<ChartHandle> {
    let source = sources
        .get(&config.dataset)
        .ok_or_else(|| ChartError::UnknownDataset(config.dataset.clone()))?;
    if config.indicator.trim().is_empty() {
        return Err(ChartError::MissingIndicator(config.id.clone()));
    }
    let series = source.series(config)?;
    info!(chart = %config.id, dataset = %config.dataset, samples = series.len(), "rendering line chart");
    Ok(render(&series, config, options, source.concept(&config.indicator), canvas))
}
