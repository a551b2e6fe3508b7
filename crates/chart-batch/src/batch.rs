// File: crates/chart-batch/src/batch.rs
// Summary: Sequential export loop: render, export, tear down, pause, next.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chart_core::{make_linechart, Canvas, ChartConfig, ChartInstruction, DataSources, RenderOptions};
use chart_render_skia::{SkiaRasterizer, DEFAULT_SCALE};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BatchSettings {
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    /// Raster scale factor (PNG only).
    pub scale: f32,
    /// Pause between two charts.
    pub delay: Duration,
    /// Export only the chart with this id.
    pub only: Option<String>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("target/out"),
            format: ExportFormat::Svg,
            scale: DEFAULT_SCALE,
            delay: Duration::from_millis(300),
            only: None,
        }
    }
}

/// What a batch run produced.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    /// Chart id and error message of every skipped chart.
    pub failed: Vec<(String, String)>,
}

/// Export every selected instruction in order. A failing chart is logged and skipped.
pub fn run_batch(
    instructions: &[ChartInstruction],
    sources: &DataSources,
    options: &RenderOptions,
    settings: &BatchSettings,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut canvas = Canvas::new();
    let rasterizer = SkiaRasterizer::new();
    let selected: Vec<&ChartInstruction> = instructions
        .iter()
        .filter(|ins| settings.only.as_deref().map_or(true, |id| ins.id.trim() == id))
        .collect();
    info!(charts = selected.len(), format = settings.format.extension(), "batch export started");

    for (i, ins) in selected.iter().enumerate() {
        if i > 0 && !settings.delay.is_zero() {
            std::thread::sleep(settings.delay);
        }
        match export_one(ins, sources, options, settings, &rasterizer, &mut canvas) {
            Ok(path) => {
                info!(chart = %ins.id, path = %path.display(), "exported");
                report.written.push(path);
            }
            Err(e) => {
                error!(chart = %ins.id, "skipped: {e:#}");
                report.failed.push((ins.id.clone(), format!("{e:#}")));
            }
        }
    }
    info!(written = report.written.len(), failed = report.failed.len(), "batch export finished");
    report
}

fn export_one(
    ins: &ChartInstruction,
    sources: &DataSources,
    options: &RenderOptions,
    settings: &BatchSettings,
    rasterizer: &SkiaRasterizer,
    canvas: &mut Canvas,
) -> Result<PathBuf> {
    let config = ChartConfig::from_instruction(ins).context("invalid chart instruction")?;
    let handle = make_linechart(&config, sources, options, canvas).context("render failed")?;
    let path = settings.out_dir.join(config.export_file_name(settings.format.extension()));
    let written = write_chart(canvas, handle, &path, settings, rasterizer);
    canvas.remove(handle);
    written.map(|()| path)
}

fn write_chart(
    canvas: &Canvas,
    handle: chart_core::ChartHandle,
    path: &Path,
    settings: &BatchSettings,
    rasterizer: &SkiaRasterizer,
) -> Result<()> {
    let chart = canvas.chart(handle).context("chart vanished from the canvas")?;
    match settings.format {
        ExportFormat::Svg => chart
            .to_standalone_svg()?
            .write_to(path)
            .with_context(|| format!("writing {}", path.display())),
        ExportFormat::Png => rasterizer.rasterize(&chart, path, settings.scale),
    }
}
