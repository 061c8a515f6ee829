//! Value to angle / arc-length mapping.

use crate::error::GaugeError;

/// A value range with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Result<Self, GaugeError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GaugeError::Configuration(format!(
                "value range {min}..{max} is not finite"
            )));
        }
        if min >= max {
            return Err(GaugeError::Configuration(format!(
                "value range {min}..{max} has no span"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Needle rotation in degrees at the two ends of a value range.
///
/// `start` maps to `Range::min` and `end` to `Range::max`. A decreasing pair
/// (right dial) simply turns the needle the other way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeRange {
    pub start: f64,
    pub end: f64,
}

impl DegreeRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

/// Linear interpolation of `value` into `degrees`.
pub fn value_to_angle(value: f64, values: &Range, degrees: &DegreeRange) -> f64 {
    degrees.start + degrees.sweep() * (value - values.min) / values.span()
}

/// Share of the arc covered by `value`, anchored at zero rather than `min`.
pub fn value_to_arc_fraction(value: f64, values: &Range) -> f64 {
    value / values.max
}
