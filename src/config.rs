use std::time::Duration;

use bon::Builder;

use crate::animate::Easing;
use crate::dial::{Side, Strictness};
use crate::mapper::DegreeRange;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Behaviour of one dial: ranges, needle motion and the startup reading.
#[derive(Debug, Clone, Builder)]
pub struct DialConfig {
    #[builder(default = (0.0, 4000.0))]
    pub value_range: (f64, f64),
    #[builder(default = DegreeRange::new(-240.0, -120.0))]
    pub degree_range: DegreeRange,
    #[builder(default = Duration::from_millis(1000))]
    pub move_duration: Duration,
    #[builder(default)]
    pub move_easing: Easing,
    #[builder(default = 0.0)]
    pub initial_value: f64,
    /// `(range, offset)` in value units.
    #[builder(default = (0.0, 0.0))]
    pub redzone: (f64, f64),
    #[builder(default = 0.0)]
    pub marker: f64,
}

impl DialConfig {
    /// Tachometer on the left: 0-4000, sweeping -240° to -120°.
    pub fn left() -> Self {
        Self::builder()
            .redzone((1000.0, 250.0))
            .marker(2000.0)
            .initial_value(1500.0)
            .build()
    }

    /// Speedometer on the right: 0-400, sweeping 60° to -60°.
    pub fn right() -> Self {
        Self::builder()
            .value_range((0.0, 400.0))
            .degree_range(DegreeRange::new(60.0, -60.0))
            .redzone((50.0, 50.0))
            .marker(350.0)
            .initial_value(250.0)
            .build()
    }
}

/// Gauge-wide settings, including the calibration constants of the artwork.
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = DialConfig::left())]
    pub left: DialConfig,
    #[builder(default = DialConfig::right())]
    pub right: DialConfig,

    /// Angular sweep of a dial, in degrees.
    #[builder(default = 120.0)]
    pub sweep_degrees: f64,
    /// Rotation that brings an authored arc path to the zero of its dial.
    #[builder(default = 30.0)]
    pub arc_origin_degrees: f64,
    /// Ratio between an arc path's full length and one dial sweep.
    #[builder(default = 3.0)]
    pub redzone_length_divisor: f64,
    #[builder(default = 2.0)]
    pub marker_draw_length: f64,

    /// Whether the artwork carries `text-<n>` tick labels.
    #[builder(default = false)]
    pub numbered: bool,
    #[builder(default = true)]
    pub ignite_on_init: bool,
    #[builder(default)]
    pub strictness: Strictness,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    pub fn dial(&self, side: Side) -> &DialConfig {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Geometry and colours of the rendered artwork
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub margin: i32,
    pub scale_thickness: i32,
    pub band_width: i32,
    pub marker_width: i32,
    pub needle_length_factor: f64,
    pub needle_back_length: f64,
    pub needle_width: f32,
    pub hub_radius: i32,
    pub label_inset: f64,
    pub label_font_size: f32,
    pub background_color: Color,
    pub scale_color: Color,
    pub redzone_color: Color,
    pub marker_color: Color,
    pub needle_color: Color,
    pub text_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 30,
            scale_thickness: 4,
            band_width: 12,
            marker_width: 18,
            needle_length_factor: 0.95,
            needle_back_length: 20.0,
            needle_width: 4.0,
            hub_radius: 8,
            label_inset: 40.0,
            label_font_size: 16.0,
            background_color: Color::new(0xff, 0xff, 0xff),
            scale_color: Color::new(0x00, 0x00, 0x00),
            redzone_color: Color::new(0xff, 0x00, 0x00),
            marker_color: Color::new(0x00, 0x7f, 0xff),
            needle_color: Color::new(0x00, 0x00, 0x00),
            text_color: Color::new(0x00, 0x00, 0x00),
        }
    }
}

/// Configuration for application window
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub max_framerate: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gauge".to_string(),
            width: 400,
            height: 400,
            max_framerate: 60.0,
        }
    }
}
