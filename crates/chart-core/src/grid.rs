// File: crates/chart-core/src/grid.rs
// Summary: Tick layout helpers (even spacing and "nice" 1/2/5 steps).

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Roughly `count` round tick values covering `[start, stop]`, on steps of 1, 2 or 5 × 10^k.
/// Order follows the input (descending when `stop < start`).
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() { return Vec::new(); }
    if start == stop { return vec![start]; }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let step = (hi - lo) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // For sub-unit steps divide by the inverse increment to keep values like 0.3 exact.
    let (first, last, to_value): (f64, f64, Box<dyn Fn(i64) -> f64>) = if power >= 0.0 {
        let inc = factor * 10f64.powf(power);
        ((lo / inc).ceil(), (hi / inc).floor(), Box::new(move |i| i as f64 * inc))
    } else {
        let inv = 10f64.powf(-power) / factor;
        ((lo * inv).ceil(), (hi * inv).floor(), Box::new(move |i| i as f64 / inv))
    };
    // Tick indices past f64's exact integer range cannot be stepped; use the endpoints.
    let mut out: Vec<f64> = if first.abs() > MAX_EXACT_INDEX || last.abs() > MAX_EXACT_INDEX {
        vec![lo, hi]
    } else {
        (first as i64..=last as i64).map(to_value).filter(|v| (lo..=hi).contains(v)).collect()
    };
    if reverse { out.reverse(); }
    out
}
