// File: crates/chart-core/src/types.rs
// Summary: Shared types and constants (canvas size, margins, plotting area).

/// Baseline canvas width in pixels; margins are carved out of it.
pub const WIDTH: u32 = 654;
/// Baseline canvas height in pixels.
pub const HEIGHT: u32 = 462;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }

    /// Plotting area left inside the baseline box.
    pub fn plot_area(&self) -> PlotArea {
        PlotArea {
            width: (WIDTH.saturating_sub(self.hsum()) as f64).max(1.0),
            height: (HEIGHT.saturating_sub(self.vsum()) as f64).max(1.0),
        }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(80, 65, 20, 35)
    }
}

/// Size of the plotting area; the origin is its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}
