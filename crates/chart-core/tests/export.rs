// File: crates/chart-core/tests/export.rs
// Purpose: Style-inlining exporter: allow-listed properties, original untouched, structure checks.

use chart_core::export::{export_standalone, inline_styles_into, style_properties};
use chart_core::style::StyleResolver;
use chart_core::{render, Canvas, ChartConfig, ChartError, Element, RenderOptions, Series, Stylesheet};

/// Answers every query with `<property>?` so tests can see exactly what was asked.
struct Echo;

impl StyleResolver for Echo {
    fn computed_value(&self, _: &Element, _: &[&Element], property: &str) -> String {
        format!("{property}?")
    }
}

fn sample_chart(canvas: &mut Canvas) -> chart_core::ChartHandle {
    let mut config = ChartConfig::new("y");
    config.title = "T".into();
    config.end_value.text = chart_core::CalloutText::Hidden;
    let series = Series::from_years(&[(2000, 50.0), (2010, 80.0)]);
    render(&series, &config, &RenderOptions::new().with("dots", "on"), None, canvas)
}

#[test]
fn property_table() {
    assert_eq!(style_properties("path"), Some(&["fill", "stroke", "stroke-width"][..]));
    assert_eq!(style_properties("line"), Some(&["stroke", "stroke-width"][..]));
    assert_eq!(style_properties("polygon"), Some(&["stroke", "fill"][..]));
    assert_eq!(
        style_properties("text"),
        Some(&["fill", "font-size", "text-anchor", "visibility", "font-family"][..])
    );
    assert_eq!(style_properties("foreignObject"), None);
}

#[test]
fn only_allow_listed_tags_and_properties_are_inlined() {
    let original = Element::new("svg").child(
        Element::new("g")
            .child(Element::new("rect"))
            .child(Element::new("line"))
            .child(Element::new("polygon"))
            .child(Element::new("text").text("hi"))
            .child(Element::new("foreignObject").child(Element::new("rect"))),
    );
    let doc = export_standalone(&original, &Echo).unwrap();
    let root = doc.root();
    assert_eq!(root.get_attr("xmlns"), Some("http://www.w3.org/2000/svg"));
    assert_eq!(root.get_attr("style"), None);

    let g = root.select("g", "")[0];
    assert_eq!(g.get_attr("style"), None);
    let styles: Vec<Option<&str>> = g.elements().map(|e| e.get_attr("style")).collect();
    assert_eq!(
        styles,
        [
            Some("fill:fill?; stroke:stroke?; stroke-width:stroke-width?;"),
            Some("stroke:stroke?; stroke-width:stroke-width?;"),
            Some("stroke:stroke?; fill:fill?;"),
            Some("fill:fill?; font-size:font-size?; text-anchor:text-anchor?; visibility:visibility?; font-family:font-family?;"),
            None,
        ]
    );
    // No recursion below tags outside the container list.
    let nested = g.select("foreignObject", "")[0].select("rect", "")[0];
    assert_eq!(nested.get_attr("style"), None);
}

#[test]
fn rendered_chart_round_trip_uses_computed_style() {
    let mut canvas = Canvas::new();
    let handle = sample_chart(&mut canvas);
    let chart = canvas.chart(handle).unwrap();
    let before = chart.element().to_xml();

    let doc = chart.to_standalone_svg().unwrap();
    assert_eq!(chart.element().to_xml(), before, "original must not change");
    assert!(chart.element().select("path", "line")[0].get_attr("style").is_none());

    let root = doc.root();
    assert_eq!(
        root.select("path", "line")[0].get_attr("style"),
        Some("fill:none; stroke:rgb(255, 127, 14); stroke-width:3px;")
    );
    let end = root.select("text", "endvalue")[0];
    assert_eq!(
        end.get_attr("style"),
        Some(r#"fill:rgb(255, 127, 14); font-size:16px; text-anchor:start; visibility:hidden; font-family:"Helvetica Neue", Arial, sans-serif;"#)
    );
    let start = root.select("text", "startvalue")[0];
    assert!(start.get_attr("style").unwrap().contains("visibility:visible;"));

    // Axis strokes come from `currentColor`, i.e. the axis group's colour.
    let domain = root.select("path", "domain")[0];
    assert_eq!(domain.get_attr("style"), Some("fill:none; stroke:rgb(153, 153, 153); stroke-width:1px;"));

    // Every original element maps onto a clone element with the same tag.
    let tags = |e: &Element| e.descendants().iter().map(|d| d.tag().to_string()).collect::<Vec<_>>();
    assert_eq!(tags(root), tags(chart.element()));
}

#[test]
fn exported_document_is_standalone_xml() {
    let mut canvas = Canvas::new();
    let handle = sample_chart(&mut canvas);
    let svg = canvas.chart(handle).unwrap().to_standalone_svg().unwrap().to_svg_string();
    assert!(svg.starts_with(r#"<svg class="linechart""#));
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn export_with_an_empty_stylesheet_falls_back_to_initial_values() {
    let mut canvas = Canvas::with_stylesheet(Stylesheet::new());
    let handle = sample_chart(&mut canvas);
    let doc = canvas.chart(handle).unwrap().to_standalone_svg().unwrap();
    let line = doc.root().select("path", "line")[0];
    assert_eq!(line.get_attr("style"), Some("fill:rgb(0, 0, 0); stroke:none; stroke-width:1px;"));
}

#[test]
fn diverging_trees_fail_fast() {
    let original = Element::new("svg").child(Element::new("g").child(Element::new("path")).child(Element::new("text")));

    let mut fewer = Element::new("svg").child(Element::new("g").child(Element::new("path")));
    let err = inline_styles_into(&mut fewer, &original, &Echo).unwrap_err();
    match err {
        ChartError::StructureMismatch { path, .. } => assert_eq!(path, "svg/g[0]"),
        other => panic!("unexpected error {other:?}"),
    }

    let mut renamed = Element::new("svg").child(Element::new("g").child(Element::new("path")).child(Element::new("circle")));
    assert!(matches!(
        inline_styles_into(&mut renamed, &original, &Echo),
        Err(ChartError::StructureMismatch { .. })
    ));

    let mut same = original.clone();
    inline_styles_into(&mut same, &original, &Echo).unwrap();
}
