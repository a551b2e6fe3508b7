// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports public API for chart layout, styling and export.

pub mod error;
pub mod types;
pub mod grid;
pub mod format;
pub mod series;
pub mod config;
pub mod scale;
pub mod axis;
pub mod svg;
pub mod style;
pub mod canvas;
pub mod chart;
pub mod export;
pub mod reader;
pub mod source;

pub use error::{ChartError, Result};
pub use types::{Insets, PlotArea, HEIGHT, WIDTH};
pub use format::{format, FormatKind, Formatter, Multiplier};
pub use series::{Sample, Series};
pub use config::{Callout, CalloutText, ChartConfig, ChartInstruction, LayoutOptions, Reference, RenderOptions, TimeInterval};
pub use scale::{build_scales, Scales, TimeScale, ValueScale};
pub use axis::Axis;
pub use svg::{Element, Node};
pub use style::{StyleResolver, Stylesheet};
pub use canvas::{Canvas, ChartHandle, RenderedChart};
pub use chart::render;
pub use export::{export_standalone, VectorDocument};
pub use reader::{ConceptMetadata, DataReader, MemoryReader, Query, Row};
pub use source::{make_linechart, DataSource, DataSources};
