// File: crates/chart-core/src/config.rs
// Summary: Chart instruction records, the typed ChartConfig resolved from them, and render toggles.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{ChartError, Result};
use crate::format::Multiplier;
use crate::scale::DEFAULT_PADDING;
use crate::series::parse_time;
use crate::types::Insets;

/// One raw chart instruction as it appears in an instruction sheet.
/// Every field is text; missing columns default to empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartInstruction {
    pub id: String,
    pub dataset: String,
    pub indicator: String,
    #[serde(alias = "geo")]
    pub geo_id: String,
    pub time_interval: String,
    pub title: String,
    pub source: String,
    pub subtitle: String,
    pub y_domain: String,
    pub reference_values: String,
    pub multiplier: String,
    pub startvalue: String,
    pub endvalue: String,
    pub startvalue_dx: String,
    pub startvalue_dy: String,
    pub endvalue_dx: String,
    pub endvalue_dy: String,
}

/// Inclusive year bounds used to filter datapoints; either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    #[serde(rename = "$gte", skip_serializing_if = "Option::is_none")]
    pub start: Option<i32>,
    #[serde(rename = "$lte", skip_serializing_if = "Option::is_none")]
    pub end: Option<i32>,
}

impl TimeInterval {
    pub fn contains(&self, year: i32) -> bool {
        self.start.map_or(true, |s| year >= s) && self.end.map_or(true, |e| year <= e)
    }
}

impl FromStr for TimeInterval {
    type Err = ChartError;

    /// `"1990-2020"`, `"1990-"`, `"-2020"`, `"1990"` or empty.
    fn from_str(s: &str) -> Result<Self> {
        let (lo, hi) = s.split_once('-').unwrap_or((s, ""));
        let bound = |part: &str| -> Result<Option<i32>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<i32>()
                .map(Some)
                .map_err(|e| ChartError::invalid("time_interval", s, e.to_string()))
        };
        Ok(Self { start: bound(lo)?, end: bound(hi)? })
    }
}

/// A caller-supplied marker drawn at an arbitrary (time, value) point.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Reference {
    #[serde(deserialize_with = "loose_time")]
    pub time: NaiveDate,
    #[serde(deserialize_with = "loose_f64")]
    pub value: f64,
    #[serde(default, alias = "text")]
    pub label: String,
    #[serde(default, alias = "dx", alias = "offsetX", deserialize_with = "loose_f64")]
    pub offset_x: f64,
    #[serde(default, alias = "dy", alias = "offsetY", deserialize_with = "loose_f64")]
    pub offset_y: f64,
    #[serde(default = "default_reference_class", alias = "cssClass", alias = "styleClass")]
    pub style_class: String,
}

impl Reference {
    pub fn new(time: NaiveDate, value: f64, label: impl Into<String>) -> Self {
        Self {
            time,
            value,
            label: label.into(),
            offset_x: 0.0,
            offset_y: 0.0,
            style_class: default_reference_class(),
        }
    }
}

fn default_reference_class() -> String {
    "reference".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Num(f64),
    Str(String),
}

/// A number or numeric string; blank strings read as zero and non-finite values are rejected.
fn loose_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    let value = match Loose::deserialize(d)? {
        Loose::Num(n) => n,
        Loose::Str(s) if s.trim().is_empty() => 0.0,
        Loose::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom)?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!("expected a finite number, got {value}")));
    }
    Ok(value)
}

fn loose_time<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<NaiveDate, D::Error> {
    let raw = match Loose::deserialize(d)? {
        Loose::Num(n) => format!("{}", n.trunc() as i64),
        Loose::Str(s) => s,
    };
    parse_time(&raw).map_err(serde::de::Error::custom)
}

/// Text of a start/end value callout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CalloutText {
    /// The formatted sample value.
    #[default]
    Auto,
    /// Laid out but not visible (the `"off"` sentinel).
    Hidden,
    Fixed(String),
}

impl CalloutText {
    fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" => CalloutText::Auto,
            "off" => CalloutText::Hidden,
            other => CalloutText::Fixed(other.to_string()),
        }
    }
}

/// Start or end value callout settings; offsets are in pixels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Callout {
    pub text: CalloutText,
    pub dx: f64,
    pub dy: f64,
}

/// Typed rendering intent for one chart. Built once, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartConfig {
    pub id: String,
    pub dataset: String,
    pub indicator: String,
    pub geo_id: String,
    pub time_interval: TimeInterval,
    pub title: String,
    pub source: String,
    pub subtitle: String,
    /// Explicit value domain, used verbatim.
    pub y_domain: Option<(f64, f64)>,
    pub multiplier: Multiplier,
    pub start_value: Callout,
    pub end_value: Callout,
    pub references: Vec<Reference>,
}

impl ChartConfig {
    pub fn new(indicator: impl Into<String>) -> Self {
        Self { indicator: indicator.into(), ..Self::default() }
    }

    /// Resolve a raw instruction. Any malformed field is an error; nothing is silently defaulted.
    pub fn from_instruction(ins: &ChartInstruction) -> Result<Self> {
        Ok(Self {
            id: ins.id.trim().to_string(),
            dataset: ins.dataset.trim().to_string(),
            indicator: ins.indicator.trim().to_string(),
            geo_id: ins.geo_id.trim().to_string(),
            time_interval: ins.time_interval.parse()?,
            title: ins.title.clone(),
            source: ins.source.clone(),
            subtitle: ins.subtitle.clone(),
            y_domain: parse_y_domain(&ins.y_domain)?,
            multiplier: ins.multiplier.parse()?,
            start_value: Callout {
                text: CalloutText::parse(&ins.startvalue),
                dx: parse_offset("startvalue_dx", &ins.startvalue_dx)?,
                dy: parse_offset("startvalue_dy", &ins.startvalue_dy)?,
            },
            end_value: Callout {
                text: CalloutText::parse(&ins.endvalue),
                dx: parse_offset("endvalue_dx", &ins.endvalue_dx)?,
                dy: parse_offset("endvalue_dy", &ins.endvalue_dy)?,
            },
            references: parse_references(&ins.reference_values)?,
        })
    }

    /// Subtitle and multiplier label, comma-joined when both are present.
    pub fn unit_caption(&self) -> String {
        [self.subtitle.trim(), self.multiplier.label()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `"<id> - <title>.<ext>"` with path separators replaced.
    pub fn export_file_name(&self, ext: &str) -> String {
        format!("{} - {}.{}", self.id, self.title, ext).replace(['/', '\\'], "_")
    }
}

fn parse_y_domain(raw: &str) -> Result<Option<(f64, f64)>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let values: Vec<f64> = serde_json::from_str(raw)
        .map_err(|source| ChartError::MalformedJson { field: "y_domain", source })?;
    match values.as_slice() {
        [lo, hi] => Ok(Some((*lo, *hi))),
        _ => Err(ChartError::invalid("y_domain", raw, "expected exactly two numbers")),
    }
}

fn parse_references(raw: &str) -> Result<Vec<Reference>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|source| ChartError::MalformedJson { field: "reference_values", source })
}

fn parse_offset(field: &'static str, raw: &str) -> Result<f64> {
    let s = raw.trim().trim_end_matches("px");
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ChartError::invalid(field, raw, "expected a pixel offset"))
}

const MAX_TIME_PADDING: f64 = 1.0;

/// Open set of visual toggles keyed by name. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderOptions(BTreeMap<String, String>);

impl RenderOptions {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Resolve the recognised keys into typed settings.
    pub fn resolve(&self) -> LayoutOptions {
        let d = LayoutOptions::default();
        let defaults = d.insets;
        LayoutOptions {
            show_title: self.flag("chart title", d.show_title),
            show_source: self.flag("source text", d.show_source),
            show_x_axis: self.flag("x axis", d.show_x_axis),
            show_y_axis: self.flag("y axis", d.show_y_axis),
            area: self.flag("area", d.area),
            dots: self.flag("dots", d.dots),
            insets: Insets {
                top: self.number("margin top", defaults.top),
                bottom: self.number("margin bottom", defaults.bottom),
                left: self.number("margin left", defaults.left),
                right: self.number("margin right", defaults.right),
            },
            line_color: self.text("line color"),
            area_color: self.text("area color"),
            x_label_dy: self.get("x label dy").and_then(|v| self.parsed("x label dy", v)),
            time_padding: self.time_padding(d.time_padding),
        }
    }

    /// Fraction of the time span added per side; accepted within `[0, 1]`.
    fn time_padding(&self, default: f64) -> f64 {
        let Some(raw) = self.get("time padding") else {
            return default;
        };
        match self.parsed::<f64>("time padding", raw) {
            Some(p) if p.is_finite() && (0.0..=MAX_TIME_PADDING).contains(&p) => p,
            Some(p) => {
                warn!(value = p, "time padding out of range, using default");
                default
            }
            None => default,
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => default,
            Some(v) if v == "on" || v == "true" => true,
            Some(v) if v == "off" || v == "false" => false,
            Some(v) if v.is_empty() => default,
            Some(v) => {
                warn!(key, value = %v, "unrecognised toggle value, using default");
                default
            }
        }
    }

    fn number<T: FromStr + Copy>(&self, key: &str, default: T) -> T {
        self.get(key).and_then(|v| self.parsed(key, v)).unwrap_or(default)
    }

    fn parsed<T: FromStr>(&self, key: &str, raw: &str) -> Option<T> {
        let s = raw.trim().trim_end_matches("px");
        if s.is_empty() {
            return None;
        }
        let parsed = s.parse::<T>().ok();
        if parsed.is_none() {
            warn!(key, value = raw, "unparsable render option, using default");
        }
        parsed
    }

    fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Render toggles after resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    pub show_title: bool,
    pub show_source: bool,
    pub show_x_axis: bool,
    pub show_y_axis: bool,
    pub area: bool,
    pub dots: bool,
    pub insets: Insets,
    pub line_color: Option<String>,
    pub area_color: Option<String>,
    /// Vertical offset of time-axis labels in px; `None` keeps the default `0.71em`.
    pub x_label_dy: Option<f64>,
    pub time_padding: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            show_title: false,
            show_source: false,
            show_x_axis: true,
            show_y_axis: true,
            area: false,
            dots: false,
            insets: Insets::default(),
            line_color: None,
            area_color: None,
            x_label_dy: None,
            time_padding: DEFAULT_PADDING,
        }
    }
}
