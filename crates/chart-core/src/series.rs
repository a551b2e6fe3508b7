// File: crates/chart-core/src/series.rs
// Summary: Time-stamped samples for one measurement and one geography.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{ChartError, Result};
use crate::reader::Row;

/// One observation. Missing values never reach a `Sample`; they are dropped while reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub time: NaiveDate,
    pub value: f64,
}

impl Sample {
    pub const fn new(time: NaiveDate, value: f64) -> Self {
        Self { time, value }
    }
}

/// Samples ordered by time. Either empty or every sample has a defined time and a finite value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Build a series, dropping non-finite values and sorting by time (stable).
    pub fn new(mut samples: Vec<Sample>) -> Self {
        let before = samples.len();
        samples.retain(|s| s.value.is_finite());
        if samples.len() != before {
            debug!(dropped = before - samples.len(), "dropped samples without a value");
        }
        samples.sort_by_key(|s| s.time);
        Self { samples }
    }

    /// Convenience for yearly data: each pair is (year, value), dated January 1st.
    pub fn from_years(points: &[(i32, f64)]) -> Self {
        Self::new(
            points
                .iter()
                .filter_map(|&(y, v)| NaiveDate::from_ymd_opt(y, 1, 1).map(|t| Sample::new(t, v)))
                .collect(),
        )
    }

    /// Read rows keyed by column name: `time` plus the indicator column.
    /// Rows whose indicator value is empty or not numeric count as missing and are skipped.
    pub fn from_rows(rows: &[Row], indicator: &str) -> Result<Self> {
        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            let raw_time = row.get("time").map(String::as_str).unwrap_or("");
            let time = parse_time(raw_time)?;
            if let Some(value) = row.get(indicator).and_then(|v| parse_value(v)) {
                samples.push(Sample::new(time, value));
            }
        }
        Ok(Self::new(samples))
    }

    /// Spreadsheet-style records: the first column is the time, the second the value.
    /// Records with fewer than two cells or an empty value are skipped.
    pub fn from_positional<S: AsRef<str>>(records: &[Vec<S>]) -> Result<Self> {
        let mut samples = Vec::with_capacity(records.len());
        for rec in records {
            let (Some(t), Some(v)) = (rec.first(), rec.get(1)) else { continue };
            if let Some(value) = parse_value(v.as_ref()) {
                samples.push(Sample::new(parse_time(t.as_ref())?, value));
            }
        }
        Ok(Self::new(samples))
    }

    pub fn samples(&self) -> &[Sample] { &self.samples }
    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    pub fn time_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some((first.time, last.time))
    }

    pub fn value_extent(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, s| match acc {
            None => Some((s.value, s.value)),
            Some((lo, hi)) => Some((lo.min(s.value), hi.max(s.value))),
        })
    }

    /// First sample at the earliest time.
    pub fn start(&self) -> Option<&Sample> {
        let (t0, _) = self.time_extent()?;
        self.samples.iter().find(|s| s.time == t0)
    }

    /// First sample at the latest time.
    pub fn end(&self) -> Option<&Sample> {
        let (_, t1) = self.time_extent()?;
        self.samples.iter().find(|s| s.time == t1)
    }
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Accepts a bare year (`"2010"`), `YYYY-MM`, `YYYY-MM-DD`, or an RFC 3339 / ISO date-time.
pub fn parse_time(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    if let Ok(year) = s.parse::<i32>() {
        return NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| ChartError::InvalidTime(raw.to_string()));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    Err(ChartError::InvalidTime(raw.to_string()))
}

/// Year of a time label (`2010-01-01` → `"2010"`).
pub fn year_label(t: NaiveDate) -> String {
    t.year().to_string()
}
