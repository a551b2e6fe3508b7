// File: crates/chart-core/tests/scales.rs
// Purpose: Domain padding, overrides and degenerate series for the time/value scales.

use chart_core::grid::nice_ticks;
use chart_core::scale::{pad_time_domain, value_domain};
use chart_core::{build_scales, ChartConfig, FormatKind, Insets, Series};
use chrono::{Datelike, NaiveDate};

fn ymd(y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
}

#[test]
fn time_domain_is_padded_in_whole_years() {
    let series = Series::from_years(&[(2000, 50.0), (2010, 80.0)]);
    let plot = Insets::default().plot_area();
    let scales = build_scales(&series, &ChartConfig::new("y"), FormatKind::Plain, plot, 0.1).unwrap();
    let (start, end) = scales.time.domain();
    assert_eq!((start.year(), end.year()), (1999, 2011));
    assert!(start < ymd(2000) && end > ymd(2010));
    assert!((scales.time.to_px(start) - 0.0).abs() < 1e-9);
    assert!((scales.time.to_px(end) - plot.width).abs() < 1e-9);
}

#[test]
fn padded_time_domain_strictly_contains_the_data() {
    let month = |y: i32, m: u32| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
    for (start, end) in [
        (ymd(2000), ymd(2001)),
        (ymd(2000), ymd(2005)),
        (ymd(2000), ymd(2009)),
        (ymd(1960), ymd(2020)),
        (month(2000, 1), month(2000, 11)),
    ] {
        let (a, b) = pad_time_domain(start, end, 0.1);
        assert!(a < start && b > end, "{start}..{end} padded to {a}..{b}");
    }
    // Short spans get one year per side; longer ones a truncated tenth.
    assert_eq!(pad_time_domain(ymd(2000), ymd(2005), 0.1), (ymd(1999), ymd(2006)));
    assert_eq!(pad_time_domain(ymd(1960), ymd(2020), 0.1), (ymd(1954), ymd(2026)));
    assert_eq!(pad_time_domain(ymd(2000), ymd(2020), 0.25), (ymd(1995), ymd(2025)));
}

#[test]
fn zero_padding_and_single_instants_leave_time_domain_alone() {
    assert_eq!(pad_time_domain(ymd(2000), ymd(2020), 0.0), (ymd(2000), ymd(2020)));
    assert_eq!(pad_time_domain(ymd(2005), ymd(2005), 0.1), (ymd(2005), ymd(2005)));
}

#[test]
fn oversized_padding_does_not_overflow() {
    let (a, b) = pad_time_domain(ymd(2000), ymd(2010), 1e12);
    assert!(a <= ymd(2000) && b >= ymd(2010));
    let (a, b) = pad_time_domain(ymd(2000), ymd(2010), f64::INFINITY);
    assert!(a <= ymd(2000) && b >= ymd(2010));
}

#[test]
fn value_domain_padded_by_a_tenth() {
    let series = Series::from_years(&[(2000, 50.0), (2010, 80.0)]);
    let (lo, hi) = value_domain(&series, &ChartConfig::new("y"), FormatKind::Plain).unwrap();
    assert!((lo - 47.0).abs() < 1e-9, "lo = {lo}");
    assert!((hi - 83.0).abs() < 1e-9, "hi = {hi}");
}

#[test]
fn value_scale_is_inverted() {
    let series = Series::from_years(&[(2000, 50.0), (2010, 80.0)]);
    let plot = Insets::default().plot_area();
    let scales = build_scales(&series, &ChartConfig::new("y"), FormatKind::Plain, plot, 0.1).unwrap();
    let (lo, hi) = scales.value.domain();
    assert!((scales.value.to_px(lo) - plot.height).abs() < 1e-9);
    assert!(scales.value.to_px(hi).abs() < 1e-9);
    assert_eq!(scales.value.ticks(5), vec![50.0, 60.0, 70.0, 80.0]);
}

#[test]
fn explicit_override_is_used_verbatim() {
    let series = Series::from_years(&[(2000, 50.0), (2010, 80.0)]);
    let mut config = ChartConfig::new("y");
    config.y_domain = Some((0.0, 200.0));
    assert_eq!(value_domain(&series, &config, FormatKind::Percent), Some((0.0, 200.0)));
}

#[test]
fn percent_measurements_span_zero_to_hundred() {
    let series = Series::from_years(&[(2000, 12.0), (2010, 18.0)]);
    assert_eq!(value_domain(&series, &ChartConfig::new("y"), FormatKind::Percent), Some((0.0, 100.0)));
    // Shares are fractions and stay data-driven.
    let (lo, hi) = value_domain(&series, &ChartConfig::new("y"), FormatKind::Share).unwrap();
    assert!(lo < 12.0 && hi > 18.0);
}

#[test]
fn single_point_series_maps_to_finite_pixels() {
    let series = Series::from_years(&[(2005, 7.0)]);
    let plot = Insets::default().plot_area();
    let scales = build_scales(&series, &ChartConfig::new("y"), FormatKind::Plain, plot, 0.1).unwrap();
    let x = scales.time.to_px(ymd(2005));
    let y = scales.value.to_px(7.0);
    assert!(x.is_finite() && y.is_finite());
    assert!((y - plot.height / 2.0).abs() < 1e-9);
    assert!((x - plot.width / 2.0).abs() < 1.0);
}

#[test]
fn empty_series_has_no_scales() {
    let plot = Insets::default().plot_area();
    assert!(build_scales(&Series::default(), &ChartConfig::new("y"), FormatKind::Plain, plot, 0.1).is_none());
}

#[test]
fn nice_ticks_steps() {
    assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(nice_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    assert_eq!(nice_ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
    // Magnitude far beyond the span: ticks never leave the domain.
    for ticks in [nice_ticks(1e20, 1e20 + 4e4, 5), nice_ticks(1e20, 1.000_000_1e20, 5)] {
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| (1e20..=1.000_000_1e20).contains(t)), "{ticks:?}");
    }
    assert_eq!(nice_ticks(3.0, 3.0, 5), vec![3.0]);
}
