// File: crates/chart-render-skia/src/lib.rs
// Summary: Raster exporter; turns a rendered chart into PNG bytes on a CPU raster surface.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chart_core::RenderedChart;
use skia_safe as skia;
use tracing::debug;

pub use skia_safe::Color;

/// Scale factor used when none is given: twice the canvas size.
pub const DEFAULT_SCALE: f32 = 2.0;

/// Rasterises charts through their standalone SVG export, so the live chart is never touched.
pub struct SkiaRasterizer {
    font_mgr: skia::FontMgr,
    background: skia::Color,
}

impl Default for SkiaRasterizer {
    fn default() -> Self { Self::new() }
}

impl SkiaRasterizer {
    pub fn new() -> Self {
        Self { font_mgr: skia::FontMgr::default(), background: skia::Color::WHITE }
    }

    /// Colour the surface is cleared to before the chart is drawn.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// PNG bytes of `chart` at `scale` times its canvas size.
    pub fn rasterize_to_png_bytes(&self, chart: &RenderedChart<'_>, scale: f32) -> Result<Vec<u8>> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(anyhow!("scale must be a positive number, got {scale}"));
        }
        let svg = chart.to_standalone_svg().context("style inlining failed")?.to_svg_string();
        let (width, height) = (chart.width() as f32, chart.height() as f32);
        let size = ((width * scale).round() as i32, (height * scale).round() as i32);

        let mut dom = skia::svg::Dom::from_str(&svg, self.font_mgr.clone())
            .map_err(|e| anyhow!("skia could not load the exported SVG: {e:?}"))?;
        dom.set_container_size((width, height));

        // Create raster surface
        let mut surface = skia::surfaces::raster_n32_premul(size)
            .ok_or_else(|| anyhow!("failed to create raster surface {}x{}", size.0, size.1))?;
        let canvas = surface.canvas();
        canvas.clear(self.background);
        canvas.scale((scale, scale));
        dom.render(canvas);

        // Snapshot and encode PNG
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        debug!(width = size.0, height = size.1, bytes = data.as_bytes().len(), "rasterised chart");
        Ok(data.as_bytes().to_vec())
    }

    /// Rasterise `chart` and write the PNG to `path`, creating parent directories.
    pub fn rasterize(&self, chart: &RenderedChart<'_>, path: impl AsRef<Path>, scale: f32) -> Result<()> {
        let bytes = self.rasterize_to_png_bytes(chart, scale)?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
