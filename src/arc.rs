//! Partial arcs drawn with stroke-dash windowing.
//!
//! A path of length `L` dashed as `[L, L]` shows exactly `L - offset` units
//! from its origin, so moving the offset reveals any prefix of the path.

use crate::drawable::Drawable;
use crate::error::GaugeError;

pub struct ArcWindow {
    path: Box<dyn Drawable>,
    length: f64,
    drawn: f64,
}

impl ArcWindow {
    /// Measure `path` once. `id` is only used for the error message.
    pub fn measure(id: &str, path: Box<dyn Drawable>) -> Result<Self, GaugeError> {
        let length = path
            .total_length()
            .filter(|l| l.is_finite() && *l > 0.0)
            .ok_or_else(|| GaugeError::NotMeasurable(id.to_string()))?;
        Ok(Self {
            path,
            length,
            drawn: 0.0,
        })
    }

    /// Dash the path by its own length and hide it.
    pub fn prime(&mut self) {
        self.path.set_dash_window((self.length, self.length), self.length);
        self.drawn = 0.0;
    }

    /// Show the first `length` units. Callers keep `length` within `0..=L`.
    pub fn reveal(&mut self, length: f64) {
        self.path
            .set_dash_window((self.length, self.length), self.length - length);
        self.drawn = length;
    }

    pub fn rotate(&mut self, degrees: f64) {
        self.path.rotate(degrees);
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn drawn(&self) -> f64 {
        self.drawn
    }

    pub fn rotation(&self) -> f64 {
        self.path.rotation()
    }
}

impl std::fmt::Debug for ArcWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcWindow")
            .field("length", &self.length)
            .field("drawn", &self.drawn)
            .field("rotation", &self.path.rotation())
            .finish()
    }
}
