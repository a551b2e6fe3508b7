// File: crates/chart-batch/src/main.rs
// Summary: CLI entry point; loads the instruction and option sheets and exports every chart.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chart_batch::logging::init_logging;
use chart_batch::{load_sources, read_instructions, read_options, run_batch, BatchSettings, ExportFormat};
use chart_core::RenderOptions;
use clap::Parser;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "chart-batch")]
#[command(about = "Render every line chart of an instruction sheet to SVG or PNG")]
struct Args {
    /// Instruction sheet, one chart per row
    #[arg(long, default_value = "graph_list.csv")]
    instructions: PathBuf,

    /// Two-column key,value sheet of render options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory holding one sub-directory per dataset (datapoints.csv, concepts.csv)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, value_enum, default_value = "svg")]
    format: ExportFormat,

    #[arg(long, default_value = "target/out")]
    out_dir: PathBuf,

    /// Raster scale factor for PNG output
    #[arg(long, default_value_t = chart_render_skia::DEFAULT_SCALE)]
    scale: f32,

    /// Pause between charts, in milliseconds
    #[arg(long, default_value_t = 300)]
    delay_ms: u64,

    /// Export only the chart with this id
    #[arg(long)]
    graph: Option<String>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let instructions = read_instructions(&args.instructions)?;
    let options = match &args.options {
        Some(path) => read_options(path)?,
        None => RenderOptions::new(),
    };
    let sources = load_sources(&args.data_dir, instructions.iter().map(|i| i.dataset.trim()));

    let settings = BatchSettings {
        out_dir: args.out_dir,
        format: args.format,
        scale: args.scale,
        delay: Duration::from_millis(args.delay_ms),
        only: args.graph,
    };
    let report = run_batch(&instructions, &sources, &options, &settings);
    if report.written.is_empty() && !report.failed.is_empty() {
        warn!("no chart was exported");
    }
    println!("Wrote {} chart(s), skipped {}", report.written.len(), report.failed.len());
    Ok(())
}
