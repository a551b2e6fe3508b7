// File: crates/chart-core/src/canvas.rs
// Summary: Caller-owned container: page stylesheet plus the chart subtrees mounted on it.

use crate::error::Result;
use crate::export::{export_standalone, VectorDocument};
use crate::style::Stylesheet;
use crate::svg::Element;

/// Identifies a chart mounted on a [`Canvas`]. Handles are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(u64);

#[derive(Clone, Debug)]
struct Mounted {
    handle: ChartHandle,
    element: Element,
    width: f64,
    height: f64,
}

/// Destination for rendered charts. It owns every subtree mounted on it;
/// the layout engine keeps nothing once `render` returns.
#[derive(Clone, Debug)]
pub struct Canvas {
    stylesheet: Stylesheet,
    charts: Vec<Mounted>,
    next: u64,
}

impl Default for Canvas {
    fn default() -> Self { Self::new() }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_stylesheet(Stylesheet::default_chart())
    }

    pub fn with_stylesheet(stylesheet: Stylesheet) -> Self {
        Self { stylesheet, charts: Vec::new(), next: 0 }
    }

    pub fn stylesheet(&self) -> &Stylesheet { &self.stylesheet }

    pub(crate) fn mount(&mut self, element: Element, width: f64, height: f64) -> ChartHandle {
        let handle = ChartHandle(self.next);
        self.next += 1;
        self.charts.push(Mounted { handle, element, width, height });
        handle
    }

    /// Borrow a mounted chart for reading or export.
    pub fn chart(&self, handle: ChartHandle) -> Option<RenderedChart<'_>> {
        self.charts.iter().find(|m| m.handle == handle).map(|m| RenderedChart {
            element: &m.element,
            stylesheet: &self.stylesheet,
            width: m.width,
            height: m.height,
        })
    }

    /// Tear a chart down, returning its subtree.
    pub fn remove(&mut self, handle: ChartHandle) -> Option<Element> {
        let idx = self.charts.iter().position(|m| m.handle == handle)?;
        Some(self.charts.remove(idx).element)
    }

    pub fn len(&self) -> usize { self.charts.len() }
    pub fn is_empty(&self) -> bool { self.charts.is_empty() }
}

/// Read-only view of a mounted chart together with the page style that applies to it.
#[derive(Clone, Copy, Debug)]
pub struct RenderedChart<'a> {
    element: &'a Element,
    stylesheet: &'a Stylesheet,
    width: f64,
    height: f64,
}

impl<'a> RenderedChart<'a> {
    /// The live `<svg>` root.
    pub fn element(&self) -> &'a Element { self.element }
    pub fn stylesheet(&self) -> &'a Stylesheet { self.stylesheet }
    /// Canvas width in px.
    pub fn width(&self) -> f64 { self.width }
    /// Canvas height in px.
    pub fn height(&self) -> f64 { self.height }

    /// Standalone vector document with every effective style inlined.
    pub fn to_standalone_svg(&self) -> Result<VectorDocument> {
        export_standalone(self.element, self.stylesheet)
    }
}
