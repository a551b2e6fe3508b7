// File: crates/chart-core/src/scale.rs
// Summary: Time (X) and value (Y) scales plus the domain-padding policies that build them.

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::config::ChartConfig;
use crate::format::FormatKind;
use crate::grid::nice_ticks;
use crate::series::Series;
use crate::types::PlotArea;

/// Fraction of the span added on each side of a data-driven domain.
pub const DEFAULT_PADDING: f64 = 0.1;
/// Domains narrower than this are widened before mapping.
const MIN_SPAN: f64 = 1e-9;

/// Horizontal time scale mapping `[start, end]` onto `[left_px, right_px]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub left_px: f64,
    pub right_px: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeScale {
    /// A zero-length domain is widened by one year on each side.
    pub fn new(left_px: f64, right_px: f64, start: NaiveDate, end: NaiveDate) -> Self {
        let (mut start, mut end) = if end < start { (end, start) } else { (start, end) };
        if start == end {
            start = shift_years(start, -1);
            end = shift_years(end, 1);
        }
        Self { left_px, right_px, start, end }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) { (self.start, self.end) }

    #[inline]
    pub fn to_px(&self, t: NaiveDate) -> f64 {
        let span = (day_number(self.end) - day_number(self.start)).max(MIN_SPAN);
        self.left_px + (day_number(t) - day_number(self.start)) / span * (self.right_px - self.left_px)
    }
}

/// Vertical value scale mapping `[vmin, vmax]` onto `[bottom_px, top_px]` (up is more).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub top_px: f64,
    pub bottom_px: f64,
    pub vmin: f64,
    pub vmax: f64,
}

impl ValueScale {
    /// A zero-span domain is widened by 0.5 on each side so the point sits mid-height.
    pub fn new_linear(top_px: f64, bottom_px: f64, mut vmin: f64, mut vmax: f64) -> Self {
        if (vmax - vmin).abs() < MIN_SPAN {
            vmin -= 0.5;
            vmax += 0.5;
        }
        Self { top_px, bottom_px, vmin, vmax }
    }

    pub fn domain(&self) -> (f64, f64) { (self.vmin, self.vmax) }

    #[inline]
    pub fn to_px(&self, y: f64) -> f64 {
        self.bottom_px - (y - self.vmin) / (self.vmax - self.vmin) * (self.bottom_px - self.top_px)
    }

    /// Roughly `count` round values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.vmin, self.vmax, count)
    }
}

/// Both scales of one chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scales {
    pub time: TimeScale,
    pub value: ValueScale,
}

/// Build the time and value scales for a non-empty series; `None` when the series is empty.
pub fn build_scales(
    series: &Series,
    config: &ChartConfig,
    kind: FormatKind,
    plot: PlotArea,
    time_padding: f64,
) -> Option<Scales> {
    let (t0, t1) = series.time_extent()?;
    let (start, end) = pad_time_domain(t0, t1, time_padding);
    let (vmin, vmax) = value_domain(series, config, kind)?;
    debug!(%start, %end, vmin, vmax, "scale domains");
    Some(Scales {
        time: TimeScale::new(0.0, plot.width, start, end),
        value: ValueScale::new_linear(0.0, plot.height, vmin, vmax),
    })
}

/// Explicit override first, then the fixed percent range, then padded data extent.
pub fn value_domain(series: &Series, config: &ChartConfig, kind: FormatKind) -> Option<(f64, f64)> {
    if let Some(domain) = config.y_domain {
        return Some(domain);
    }
    if kind == FormatKind::Percent {
        return Some((0.0, 100.0));
    }
    let (lo, hi) = series.value_extent()?;
    Some(pad_linear_domain(lo, hi, DEFAULT_PADDING))
}

/// Extend `[lo, hi]` by `fraction` of its span on each side.
pub fn pad_linear_domain(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    let bump = (lo - hi).abs() * fraction;
    (lo - bump, hi + bump)
}

/// Extend the domain by `fraction` of its length in whole years (truncated) on each side.
/// A non-empty domain always gains at least one year per side while `fraction` is positive.
pub fn pad_time_domain(start: NaiveDate, end: NaiveDate, fraction: f64) -> (NaiveDate, NaiveDate) {
    if start >= end || fraction.is_nan() || fraction <= 0.0 {
        return (start, end);
    }
    let years = (end.year() - start.year()).max(0) as f64;
    let bump = ((years * fraction).trunc() as i32).max(1);
    (shift_years(start, -bump), shift_years(end, bump))
}

/// Out-of-range shifts leave `t` unchanged.
fn shift_years(t: NaiveDate, years: i32) -> NaiveDate {
    let Some(months) = years.unsigned_abs().checked_mul(12).map(Months::new) else {
        return t;
    };
    let shifted = if years < 0 { t.checked_sub_months(months) } else { t.checked_add_months(months) };
    shifted.unwrap_or(t)
}

pub(crate) fn day_number(t: NaiveDate) -> f64 {
    t.num_days_from_ce() as f64
}

pub(crate) fn from_day_number(days: f64, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32).unwrap_or(fallback)
}
