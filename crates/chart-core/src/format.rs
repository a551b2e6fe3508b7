// File: crates/chart-core/src/format.rs
// Summary: Value → label formatting: SI prefix with 2 significant digits, unit class and multiplier.

use std::str::FromStr;

use crate::error::ChartError;

/// Unit class of a measurement, as far as labels are concerned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatKind {
    #[default]
    Plain,
    /// Value already expressed in percent; only a `%` suffix is added.
    Percent,
    /// Ratio stored as a fraction; scaled by 100 and suffixed with `%`.
    Share,
}

impl FormatKind {
    /// Resolve the kind from a concept's `format` field.
    pub fn from_display_format(format: Option<&str>) -> Self {
        match format.map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("percent") => FormatKind::Percent,
            Some(f) if f.eq_ignore_ascii_case("share") => FormatKind::Share,
            _ => FormatKind::Plain,
        }
    }
}

/// Display multiplier; values are divided by it before formatting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Multiplier {
    #[default]
    None,
    Thousand,
    Million,
    Billion,
}

impl Multiplier {
    pub const fn divisor(self) -> f64 {
        match self {
            Multiplier::None => 1.0,
            Multiplier::Thousand => 1e3,
            Multiplier::Million => 1e6,
            Multiplier::Billion => 1e9,
        }
    }

    /// Caption text shown next to the value axis (empty for `None`).
    pub const fn label(self) -> &'static str {
        match self {
            Multiplier::None => "",
            Multiplier::Thousand => "thousands",
            Multiplier::Million => "millions",
            Multiplier::Billion => "billions",
        }
    }
}

impl FromStr for Multiplier {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Multiplier::None),
            "thousand" | "thousands" => Ok(Multiplier::Thousand),
            "million" | "millions" => Ok(Multiplier::Million),
            "billion" | "billions" => Ok(Multiplier::Billion),
            _ => Err(ChartError::invalid(
                "multiplier",
                s,
                "expected one of none, thousands, millions, billions",
            )),
        }
    }
}

/// Formats numbers for axis ticks and callouts.
///
/// Total over all inputs: NaN and infinities are passed through as their
/// plain textual form so placeholder values can be formatted safely.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    pub kind: FormatKind,
    pub multiplier: Multiplier,
}

impl Formatter {
    pub const fn new(kind: FormatKind, multiplier: Multiplier) -> Self {
        Self { kind, multiplier }
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let (scaled, suffix) = match self.kind {
            FormatKind::Plain => (value, ""),
            FormatKind::Percent => (value, "%"),
            FormatKind::Share => (value * 100.0, "%"),
        };
        let scaled = scaled / self.multiplier.divisor();
        format!("{}{}", si_format(scaled, 2).replace('G', "B"), suffix)
    }

    /// Format a raw textual value; anything that is not a number comes back unchanged.
    pub fn format_text(&self, raw: &str) -> String {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => self.format(v),
            _ => raw.to_string(),
        }
    }
}

/// Closure form: `format(kind, multiplier)(value)`.
pub fn format(kind: FormatKind, multiplier: Multiplier) -> impl Fn(f64) -> String + Copy {
    let f = Formatter::new(kind, multiplier);
    move |v| f.format(v)
}

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// SI-prefixed rendering with `precision` significant digits and trailing zeros trimmed
/// (1200 → "1.2k", 530 → "530", 0.0123 → "12m").
pub fn si_format(x: f64, precision: usize) -> String {
    if x == 0.0 || !x.is_finite() {
        return if x == 0.0 { "0".to_string() } else { x.to_string() };
    }
    let sign = if x < 0.0 { "-" } else { "" };
    let x = x.abs();
    let precision = precision.max(1);

    // Exponent is taken after rounding, so 999.9 lands in the "k" bucket.
    let (digits, exponent) = decimal_parts(x, precision);
    let prefix_exponent = exponent.div_euclid(3).clamp(-8, 8) * 3;
    let i = exponent - prefix_exponent + 1;
    let n = digits.len() as i32;

    let body = if i == n {
        digits
    } else if i > n {
        format!("{digits}{}", "0".repeat((i - n) as usize))
    } else if i > 0 {
        let (head, tail) = digits.split_at(i as usize);
        format!("{head}.{tail}")
    } else {
        let scaled = x / 10f64.powi(prefix_exponent);
        let more = (precision as i32 + i - 1).max(0) as usize;
        format!("0.{}{}", "0".repeat((1 - i) as usize), decimal_parts(scaled, more).0)
    };

    let prefix = SI_PREFIXES[(8 + prefix_exponent / 3) as usize];
    format!("{sign}{}{prefix}", trim_insignificant(&body))
}

/// Significant digits (no decimal point) and decimal exponent of `x` rounded to `precision` digits.
fn decimal_parts(x: f64, precision: usize) -> (String, i32) {
    let repr = if precision == 0 { format!("{x:e}") } else { format!("{:.*e}", precision - 1, x) };
    match repr.split_once('e') {
        Some((mantissa, exp)) => (mantissa.replace('.', ""), exp.parse().unwrap_or(0)),
        None => (repr, 0),
    }
}

fn trim_insignificant(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
