// File: crates/chart-examples/src/bin/lines.rs
// Summary: Minimal example that renders a two-point yearly line chart to a standalone SVG.

use anyhow::{Context, Result};
use chart_core::{render, Canvas, ChartConfig, RenderOptions, Series};

fn main() -> Result<()> {
    // Two yearly samples
    let series = Series::from_years(&[(2000, 50.0), (2010, 80.0)]);

    let mut config = ChartConfig::new("y");
    config.title = "T".into();
    let opts = RenderOptions::new().with("y axis", "on");

    let mut canvas = Canvas::new();
    let handle = render(&series, &config, &opts, None, &mut canvas);
    let chart = canvas.chart(handle).context("chart was not mounted")?;

    let out = std::path::PathBuf::from("target/out/example_lines.svg");
    chart.to_standalone_svg()?.write_to(&out)?;
    println!("Wrote {}", out.display());
    Ok(())
}
