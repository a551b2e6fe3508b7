// File: crates/chart-render-skia/tests/raster.rs
// Purpose: PNG export at a scale factor; the live chart stays untouched.

use chart_core::{render, Canvas, ChartConfig, RenderOptions, Series};
use chart_render_skia::{Color, SkiaRasterizer, DEFAULT_SCALE};

fn chart(canvas: &mut Canvas) -> chart_core::ChartHandle {
    let series = Series::from_years(&[(2000, 50.0), (2005, 65.0), (2010, 80.0)]);
    let mut config = ChartConfig::new("y");
    config.title = "Raster".into();
    render(&series, &config, &RenderOptions::new().with("area", "on"), None, canvas)
}

#[test]
fn png_is_scaled_canvas_size() {
    let mut canvas = Canvas::new();
    let handle = chart(&mut canvas);
    let view = canvas.chart(handle).expect("mounted");
    let before = view.element().to_xml();

    let bytes = SkiaRasterizer::new().rasterize_to_png_bytes(&view, DEFAULT_SCALE).expect("rasterise");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
    let img = image::load_from_memory(&bytes).expect("decode png").to_rgba8();
    assert_eq!(img.dimensions(), (1308, 924));
    // Top-left corner is margin, so it keeps the background colour.
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);

    assert_eq!(view.element().to_xml(), before);
}

#[test]
fn writes_png_file() {
    let mut canvas = Canvas::new();
    let handle = chart(&mut canvas);
    let out = std::path::PathBuf::from("target/test_out/raster.png");
    SkiaRasterizer::new().rasterize(&canvas.chart(handle).unwrap(), &out, 1.0).expect("write png");
    let img = image::open(&out).expect("decode written png");
    assert_eq!((img.width(), img.height()), (654, 462));
}

#[test]
fn rejects_bad_scale() {
    let mut canvas = Canvas::new();
    let handle = chart(&mut canvas);
    assert!(SkiaRasterizer::new().rasterize_to_png_bytes(&canvas.chart(handle).unwrap(), 0.0).is_err());
}

#[test]
fn background_colour_fills_the_margin() {
    let mut canvas = Canvas::new();
    let handle = chart(&mut canvas);
    let rasterizer = SkiaRasterizer::new().with_background(Color::from_rgb(0, 0, 255));
    let bytes = rasterizer.rasterize_to_png_bytes(&canvas.chart(handle).unwrap(), 1.0).expect("rasterise");
    let img = image::load_from_memory(&bytes).expect("decode png").to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
}
