// File: crates/chart-core/tests/style.rs
// Purpose: Stylesheet cascade: precedence, inheritance, normalisation, parsing errors.

use chart_core::style::{normalize_color, Selector, StyleResolver, DEFAULT_CSS};
use chart_core::{ChartError, Element, Stylesheet};

fn resolve(sheet: &Stylesheet, path: &[&Element], property: &str) -> String {
    let (element, ancestors) = path.split_last().unwrap();
    sheet.computed_value(element, ancestors, property)
}

#[test]
fn precedence_inline_then_rules_then_attribute() {
    let sheet = Stylesheet::parse("rect { fill: blue } .box { fill: #00ff00 }").unwrap();
    let root = Element::new("svg");

    let plain = Element::new("rect").attr("fill", "red");
    assert_eq!(resolve(&sheet, &[&root, &plain], "fill"), "rgb(0, 0, 255)");

    let classed = Element::new("rect").attr("class", "box").attr("fill", "red");
    assert_eq!(resolve(&sheet, &[&root, &classed], "fill"), "rgb(0, 255, 0)");

    let inline = classed.clone().attr("style", "fill: white");
    assert_eq!(resolve(&sheet, &[&root, &inline], "fill"), "rgb(255, 255, 255)");

    let circle = Element::new("circle").attr("fill", "red");
    assert_eq!(resolve(&sheet, &[&root, &circle], "fill"), "rgb(255, 0, 0)");
}

#[test]
fn later_rule_wins_equal_specificity() {
    let sheet = Stylesheet::parse(".a { stroke: red } .a { stroke: blue }").unwrap();
    let e = Element::new("path").attr("class", "a");
    assert_eq!(resolve(&sheet, &[&e], "stroke"), "rgb(0, 0, 255)");
}

#[test]
fn descendant_selectors_and_specificity() {
    let sheet = Stylesheet::parse("#chart text { font-size: 20px } .axis text { font-size: 9px }").unwrap();
    let svg = Element::new("svg").attr("id", "chart");
    let g = Element::new("g").attr("class", "axis");
    let text = Element::new("text");
    assert_eq!(resolve(&sheet, &[&svg, &g, &text], "font-size"), "20px");
    assert_eq!(resolve(&sheet, &[&g, &text], "font-size"), "9px");
    assert_eq!(resolve(&sheet, &[&text], "font-size"), "16px");

    let sel = Selector::parse(".linechart text.reference").unwrap();
    assert_eq!(sel.specificity(), (0, 2, 1));
    assert!(Selector::parse("a..b").is_none());
}

#[test]
fn inheritance_and_keywords() {
    let sheet = Stylesheet::parse(".axis { color: #999; font-family: serif } line { stroke: currentColor }").unwrap();
    let g = Element::new("g").attr("class", "axis").attr("visibility", "hidden");
    let line = Element::new("line");
    assert_eq!(resolve(&sheet, &[&g, &line], "stroke"), "rgb(153, 153, 153)");
    assert_eq!(resolve(&sheet, &[&g, &line], "visibility"), "hidden");
    assert_eq!(resolve(&sheet, &[&g, &line], "font-family"), "serif");

    let explicit = Element::new("text").attr("fill", "inherit");
    let parent = Element::new("g").attr("fill", "#ff0000");
    assert_eq!(resolve(&sheet, &[&parent, &explicit], "fill"), "rgb(255, 0, 0)");
}

#[test]
fn initial_values_when_nothing_applies() {
    let sheet = Stylesheet::new();
    let e = Element::new("path");
    assert_eq!(resolve(&sheet, &[&e], "fill"), "rgb(0, 0, 0)");
    assert_eq!(resolve(&sheet, &[&e], "stroke"), "none");
    assert_eq!(resolve(&sheet, &[&e], "stroke-width"), "1px");
    assert_eq!(resolve(&sheet, &[&e], "visibility"), "visible");
}

#[test]
fn bare_lengths_become_pixels() {
    let sheet = Stylesheet::new();
    let e = Element::new("text").attr("font-size", 10);
    assert_eq!(resolve(&sheet, &[&e], "font-size"), "10px");
}

#[test]
fn colour_normalisation() {
    assert_eq!(normalize_color("#abc"), "rgb(170, 187, 204)");
    assert_eq!(normalize_color("#FF7F0E"), "rgb(255, 127, 14)");
    assert_eq!(normalize_color("rgb(1,2,3)"), "rgb(1, 2, 3)");
    assert_eq!(normalize_color("steelblue"), "rgb(70, 130, 180)");
    assert_eq!(normalize_color("none"), "none");
}

#[test]
fn comments_and_selector_lists() {
    let sheet = Stylesheet::parse("/* x */ .a, .b { fill: red } /* trailing */").unwrap();
    assert_eq!(sheet.len(), 2);
}

#[test]
fn malformed_css_is_an_error() {
    assert!(matches!(Stylesheet::parse(".a { fill: red"), Err(ChartError::Stylesheet { .. })));
    assert!(matches!(Stylesheet::parse(".a { fill red }"), Err(ChartError::Stylesheet { .. })));
    assert!(matches!(Stylesheet::parse(".a { fill: red } stray"), Err(ChartError::Stylesheet { block: 1, .. })));
}

#[test]
fn default_stylesheet_parses() {
    let sheet = Stylesheet::parse(DEFAULT_CSS).unwrap();
    assert_eq!(sheet, Stylesheet::default_chart());
    assert!(!sheet.is_empty());
}
