// File: crates/chart-core/src/axis.rs
// Summary: Axis model (ticks with labels) and its SVG rendering.

use crate::format::Formatter;
use crate::grid::linspace;
use crate::scale::{day_number, from_day_number, TimeScale, ValueScale};
use crate::series::year_label;
use crate::svg::{fmt_num, px, Element};

/// Length of tick marks in px.
const TICK_SIZE: f64 = 6.0;
/// Gap between tick mark and label in px.
const TICK_PADDING: f64 = 3.0;
/// Ticks requested from the value scale.
pub const VALUE_TICKS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Position along the axis in px.
    pub offset: f64,
    pub label: String,
    /// Explicit `text-anchor` for the label.
    pub anchor: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub orient: Orient,
    /// Extent of the domain line in px.
    pub length: f64,
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Three ticks at the first, middle and last sample time, labelled by year.
    /// The outer labels are anchored inwards so they stay within the plotting box.
    pub fn time(scale: &TimeScale, first: chrono::NaiveDate, last: chrono::NaiveDate, length: f64) -> Self {
        let days = linspace(day_number(first), day_number(last), 3);
        let anchors = ["start", "middle", "end"];
        let ticks = days
            .iter()
            .zip(anchors)
            .map(|(&d, anchor)| {
                let t = from_day_number(d, first);
                Tick { offset: scale.to_px(t), label: year_label(t), anchor }
            })
            .collect();
        Self { orient: Orient::Bottom, length, ticks }
    }

    /// About five round values formatted with `formatter`.
    pub fn value(scale: &ValueScale, formatter: &Formatter, length: f64) -> Self {
        let ticks = scale
            .ticks(VALUE_TICKS)
            .into_iter()
            .map(|v| Tick { offset: scale.to_px(v), label: formatter.format(v), anchor: "end" })
            .collect();
        Self { orient: Orient::Left, length, ticks }
    }

    /// `<g class="x axis">` / `<g class="y axis">` with a domain path and one group per tick.
    /// `label_dy` overrides the vertical label offset (px) of a bottom axis.
    pub fn to_element(&self, label_dy: Option<f64>) -> Element {
        let (class, anchor) = match self.orient {
            Orient::Bottom => ("x axis", "middle"),
            Orient::Left => ("y axis", "end"),
        };
        let mut g = Element::new("g")
            .attr("class", class)
            .attr("fill", "none")
            .attr("font-size", 10)
            .attr("font-family", "sans-serif")
            .attr("text-anchor", anchor);

        let domain = match self.orient {
            Orient::Bottom => format!("M0,0H{}", fmt_num(self.length)),
            Orient::Left => format!("M0,{}V0", fmt_num(self.length)),
        };
        g.push(Element::new("path").attr("class", "domain").attr("stroke", "currentColor").attr("d", domain));

        for tick in &self.ticks {
            let (transform, line, text) = match self.orient {
                Orient::Bottom => (
                    format!("translate({},0)", fmt_num(tick.offset)),
                    Element::new("line").attr("stroke", "currentColor").attr("y2", TICK_SIZE),
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("y", TICK_SIZE + TICK_PADDING)
                        .attr("dy", label_dy.map_or_else(|| "0.71em".to_string(), px)),
                ),
                Orient::Left => (
                    format!("translate(0,{})", fmt_num(tick.offset)),
                    Element::new("line").attr("stroke", "currentColor").attr("x2", -TICK_SIZE),
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("x", -(TICK_SIZE + TICK_PADDING))
                        .attr("dy", "0.32em"),
                ),
            };
            g.push(
                Element::new("g")
                    .attr("class", "tick")
                    .attr("opacity", 1)
                    .attr("transform", transform)
                    .child(line)
                    .child(text.attr("text-anchor", tick.anchor).text(tick.label.clone())),
            );
        }
        g
    }
}
