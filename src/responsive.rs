use std::ops::{Range, RangeFrom, RangeTo};

use crate::breakpoint::{Breakpoint, Breakpoints};

/// Upper bounds are exclusive. Media queries only offer inclusive
/// `max-width`, so they are rendered this much below the bound.
const EXCLUSIVE_OFFSET: f64 = 0.02;

/// Width breakpoints in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct GridBreakpoints {
    pub xs: RangeTo<f64>,
    pub sm: Range<f64>,
    pub md: Range<f64>,
    pub lg: Range<f64>,
    pub xl: Range<f64>,
    pub xxl: RangeFrom<f64>,
}

impl Default for GridBreakpoints {
    fn default() -> Self {
        Self {
            xs: ..576.0,
            sm: 576.0..768.0,
            md: 768.0..992.0,
            lg: 992.0..1200.0,
            xl: 1200.0..1400.0,
            xxl: 1400.0..,
        }
    }
}

impl GridBreakpoints {
    /// Name of the bucket `width` falls into, `None` if the ranges leave a
    /// gap there.
    pub fn screen_size(&self, width: f64) -> Option<&'static str> {
        if self.xs.contains(&width) {
            return Some("xs");
        }
        if self.sm.contains(&width) {
            return Some("sm");
        }
        if self.md.contains(&width) {
            return Some("md");
        }
        if self.lg.contains(&width) {
            return Some("lg");
        }
        if self.xl.contains(&width) {
            return Some("xl");
        }
        if self.xxl.contains(&width) {
            return Some("xxl");
        }
        None
    }

    /// One breakpoint per bucket, named `xs` through `xxl`.
    pub fn to_breakpoints(&self) -> Breakpoints {
        let below = |end: f64| end - EXCLUSIVE_OFFSET;
        let between = |range: &Range<f64>| Breakpoint::range(range.start, below(range.end));
        Breakpoints::new()
            .breakpoint("xs", Breakpoint::max(below(self.xs.end)))
            .breakpoint("sm", between(&self.sm))
            .breakpoint("md", between(&self.md))
            .breakpoint("lg", between(&self.lg))
            .breakpoint("xl", between(&self.xl))
            .breakpoint("xxl", Breakpoint::min(self.xxl.start))
    }
}

impl From<GridBreakpoints> for Breakpoints {
    fn from(grid: GridBreakpoints) -> Self {
        grid.to_breakpoints()
    }
}
