// File: crates/chart-core/src/chart.rs
// Summary: Layout engine; composes the line chart as an SVG subtree and mounts it on a canvas.

use tracing::{debug, warn};

use crate::axis::Axis;
use crate::canvas::{Canvas, ChartHandle};
use crate::config::{Callout, CalloutText, ChartConfig, LayoutOptions, RenderOptions};
use crate::format::{FormatKind, Formatter};
use crate::reader::ConceptMetadata;
use crate::scale::{build_scales, Scales};
use crate::series::{Sample, Series};
use crate::svg::{fmt_num, px, Element};
use crate::types::PlotArea;

/// Radius of a reference annotation circle.
const REFERENCE_RADIUS: f64 = 10.0;
/// Label offset above a reference circle.
const REFERENCE_LABEL_DY: f64 = -20.0;
/// Callout offset when the point sits in the upper half (label goes below).
const CALLOUT_BELOW: f64 = 50.0;
/// Callout offset when the point sits in the lower half (label goes above).
const CALLOUT_ABOVE: f64 = -30.0;
/// Radius of per-sample dots.
const DOT_RADIUS: f64 = 3.0;

/// Render `series` into a new chart mounted on `canvas`.
///
/// An empty series yields a single diagnostic text node. `concept` decides the
/// display kind (`percent`/`share`); without it values are plain.
pub fn render(
    series: &Series,
    config: &ChartConfig,
    options: &RenderOptions,
    concept: Option<&ConceptMetadata>,
    canvas: &mut Canvas,
) -> ChartHandle {
    let opts = options.resolve();
    let insets = opts.insets;
    let plot = insets.plot_area();
    let width = plot.width + insets.hsum() as f64;
    let height = plot.height + insets.vsum() as f64;

    let svg = Element::new("svg")
        .attr("class", "linechart")
        .attr("width", px(width))
        .attr("height", px(height));

    let kind = FormatKind::from_display_format(concept.and_then(|c| c.display_format.as_deref()));
    let Some(scales) = build_scales(series, config, kind, plot, opts.time_padding) else {
        warn!(chart = %config.id, geo = %config.geo_id, "empty series, rendering placeholder");
        let placeholder = Element::new("text")
            .attr("class", "empty-data")
            .attr("dy", "20px")
            .attr("style", "fill: red")
            .text(format!("EMPTY DATA for {} and {}", config.title, config.geo_id));
        return canvas.mount(svg.child(placeholder), width, height);
    };
    let formatter = Formatter::new(kind, config.multiplier);
    let layout = Layout { series, config, opts: &opts, plot, scales, formatter };

    let svg = svg.child(arrow_marker()).child(circle_marker()).child(layout.plot_group());
    debug!(chart = %config.id, samples = series.len(), "chart rendered");
    canvas.mount(svg, width, height)
}

struct Layout<'a> {
    series: &'a Series,
    config: &'a ChartConfig,
    opts: &'a LayoutOptions,
    plot: PlotArea,
    scales: Scales,
    formatter: Formatter,
}

impl Layout<'_> {
    fn plot_group(&self) -> Element {
        let insets = self.opts.insets;
        let mut g = Element::new("g").attr("transform", format!("translate({},{})", insets.left, insets.top));

        if self.opts.show_title {
            g.push(
                Element::new("text")
                    .attr("dy", "-30px")
                    .attr("dx", px(-(insets.left as f64)))
                    .attr("class", "title")
                    .text(self.config.title.clone()),
            );
        }
        if self.opts.show_source {
            g.push(
                Element::new("text")
                    .attr("dy", px(self.plot.height + insets.bottom as f64 - 10.0))
                    .attr("dx", px(-(insets.left as f64)))
                    .attr("class", "source")
                    .text(self.config.source.clone()),
            );
        }

        if self.opts.area {
            let mut area = Element::new("path").attr("class", "area").attr("d", self.area_path());
            if let Some(color) = &self.opts.area_color {
                area.set_attr("style", format!("fill: {color}"));
            }
            g.push(area);
        }
        let mut line = Element::new("path")
            .attr("marker-start", "url(#cicle)")
            .attr("marker-end", "url(#arrow)")
            .attr("class", "line")
            .attr("d", self.line_path());
        if let Some(color) = &self.opts.line_color {
            line.set_attr("style", format!("stroke: {color}"));
        }
        g.push(line);

        g.push(self.time_axis());
        if self.opts.show_y_axis {
            let axis = Axis::value(&self.scales.value, &self.formatter, self.plot.height);
            g.push(axis.to_element(None));
        }

        if self.opts.dots {
            let mut dots = Element::new("g").attr("class", "dots");
            for (x, y) in self.points() {
                dots.push(Element::new("circle").attr("cx", fmt_num(x)).attr("cy", fmt_num(y)).attr("r", DOT_RADIUS));
            }
            g.push(dots);
        }

        for reference in &self.config.references {
            let x = self.scales.time.to_px(reference.time);
            let y = self.scales.value.to_px(reference.value);
            let class = format!("option {}", reference.style_class);
            g.push(
                Element::new("circle")
                    .attr("class", &class)
                    .attr("cx", fmt_num(x))
                    .attr("cy", fmt_num(y))
                    .attr("r", REFERENCE_RADIUS),
            );
            g.push(
                Element::new("text")
                    .attr("class", &class)
                    .attr("text-anchor", "middle")
                    .attr("dy", px(REFERENCE_LABEL_DY + reference.offset_y))
                    .attr("dx", px(reference.offset_x))
                    .attr("x", fmt_num(x))
                    .attr("y", fmt_num(y))
                    .text(reference.label.clone()),
            );
        }

        if let Some(end) = self.series.end() {
            g.push(self.callout("endvalue", end, &self.config.end_value));
        }
        if let Some(start) = self.series.start() {
            g.push(self.callout("startvalue", start, &self.config.start_value));
        }

        g.push(
            Element::new("text")
                .attr("class", "multiplier")
                .attr("text-anchor", "start")
                .attr("dy", "10px")
                .attr("dx", "10px")
                .attr("x", 0)
                .attr("y", 0)
                .text(self.config.unit_caption()),
        );
        g
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series
            .samples()
            .iter()
            .map(|s| (self.scales.time.to_px(s.time), self.scales.value.to_px(s.value)))
    }

    /// Straight segments between consecutive samples.
    fn line_path(&self) -> String {
        let mut d = String::new();
        for (i, (x, y)) in self.points().enumerate() {
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&format!("{},{}", fmt_num(x), fmt_num(y)));
        }
        d
    }

    /// The line closed down to the bottom of the value domain.
    fn area_path(&self) -> String {
        let base = fmt_num(self.scales.value.to_px(self.scales.value.vmin));
        let xs: Vec<f64> = self.points().map(|(x, _)| x).collect();
        match (xs.first(), xs.last()) {
            (Some(first), Some(last)) => {
                format!("{}L{},{}L{},{}Z", self.line_path(), fmt_num(*last), base, fmt_num(*first), base)
            }
            _ => String::new(),
        }
    }

    fn time_axis(&self) -> Element {
        let (first, last) = match self.series.time_extent() {
            Some(extent) => extent,
            None => self.scales.time.domain(),
        };
        let axis = Axis::time(&self.scales.time, first, last, self.plot.width);
        let mut el = axis
            .to_element(self.opts.x_label_dy)
            .attr("transform", format!("translate(0,{})", fmt_num(self.plot.height)));
        if !self.opts.show_x_axis {
            el.set_attr("visibility", "hidden");
        }
        el
    }

    /// Value label at a series end point, flipped below the point in the upper half of the plot.
    fn callout(&self, class: &str, sample: &Sample, callout: &Callout) -> Element {
        let x = self.scales.time.to_px(sample.time);
        let y = self.scales.value.to_px(sample.value);
        let upper_half = y < self.plot.height / 2.0;
        let shift = if upper_half { CALLOUT_BELOW } else { CALLOUT_ABOVE };
        debug!(class, y, upper_half, "callout placement");

        let text = match &callout.text {
            CalloutText::Fixed(s) => s.clone(),
            CalloutText::Auto | CalloutText::Hidden => self.formatter.format(sample.value),
        };
        let mut el = Element::new("text")
            .attr("class", class)
            .attr("text-anchor", "start")
            .attr("dy", px(callout.dy))
            .attr("dx", px(callout.dx))
            .attr("x", fmt_num(x))
            .attr("y", px(y + shift));
        if callout.text == CalloutText::Hidden {
            el.set_attr("style", "visibility: hidden");
        }
        el.text(text)
    }
}

fn arrow_marker() -> Element {
    Element::new("defs").child(
        Element::new("marker")
            .attr("id", "arrow")
            .attr("viewBox", "-8 -7 12 12")
            .attr("refX", "-7px")
            .attr("markerWidth", 5)
            .attr("markerHeight", 5)
            .attr("orient", "auto")
            .attr("style", "stroke-linejoin: round; stroke-width: 3px")
            .child(Element::new("path").attr("d", "M-6,-3L1,0L-6,3Z")),
    )
}

fn circle_marker() -> Element {
    Element::new("defs").child(
        Element::new("marker")
            .attr("id", "cicle")
            .attr("viewBox", "-5 -5 12 12")
            .attr("markerWidth", 5)
            .attr("markerHeight", 5)
            .attr("orient", "auto")
            .child(Element::new("circle").attr("r", 3)),
    )
}
