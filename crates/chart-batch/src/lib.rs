// File: crates/chart-batch/src/lib.rs
// Summary: Batch export library: CSV-backed data sources, instruction sheets and the export loop.

pub mod logging;
pub mod csv_source;
pub mod batch;

pub use batch::{run_batch, BatchReport, BatchSettings, ExportFormat};
pub use csv_source::{load_sources, read_instructions, read_options, CsvReader};
