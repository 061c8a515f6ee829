//! One half of the gauge: needle, marker, redzone and tick labels.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::animate::{Easing, RotationAnimator};
use crate::arc::ArcWindow;
use crate::config::{DialConfig, GaugeConfig};
use crate::drawable::{Document, Drawable, ShapeKind, TextNode};
use crate::error::GaugeError;
use crate::mapper::{value_to_angle, value_to_arc_fraction, DegreeRange, Range};
use crate::ticks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn needle_id(self) -> &'static str {
        match self {
            Side::Left => "left-hand-wrapper",
            Side::Right => "right-hand-wrapper",
        }
    }

    pub fn marker_id(self) -> &'static str {
        match self {
            Side::Left => "marker-left",
            Side::Right => "marker-right",
        }
    }

    pub fn redzone_id(self) -> &'static str {
        match self {
            Side::Left => "redzone-left",
            Side::Right => "redzone-right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Side {
    type Err = GaugeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(GaugeError::Configuration(format!("unknown side '{other}'"))),
        }
    }
}

/// What a setter does with an argument outside the dial's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Ignore the call and keep the previous state.
    #[default]
    Lenient,
    /// Keep the previous state and report [`GaugeError::ValueOutOfRange`].
    Strict,
}

/// Calibration of the authored arc paths, shared by both dials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub sweep: f64,
    pub origin: f64,
    pub redzone_divisor: f64,
    pub marker_length: f64,
}

impl From<&GaugeConfig> for ArcGeometry {
    fn from(config: &GaugeConfig) -> Self {
        Self {
            sweep: config.sweep_degrees,
            origin: config.arc_origin_degrees,
            redzone_divisor: config.redzone_length_divisor,
            marker_length: config.marker_draw_length,
        }
    }
}

/// The host nodes a dial draws with.
pub struct DialParts {
    pub needle: Box<dyn Drawable>,
    pub marker: Box<dyn Drawable>,
    pub redzone: Box<dyn Drawable>,
    /// Label slots, lowest value first. Empty for unnumbered artwork.
    pub labels: Vec<Box<dyn TextNode>>,
}

impl DialParts {
    pub fn from_document<D: Document + ?Sized>(
        document: &D,
        side: Side,
        numbered: bool,
    ) -> Result<Self, GaugeError> {
        let labels = if numbered {
            ticks::label_ids(side)
                .iter()
                .map(|id| document.text(id))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };
        Ok(Self {
            needle: document.wrap(side.needle_id(), ShapeKind::Group)?,
            marker: document.wrap(side.marker_id(), ShapeKind::Path)?,
            redzone: document.wrap(side.redzone_id(), ShapeKind::Path)?,
            labels,
        })
    }
}

#[derive(Debug)]
pub struct Redzone {
    range: f64,
    offset: f64,
    window: ArcWindow,
}

#[derive(Debug)]
pub struct Marker {
    value: f64,
    window: ArcWindow,
}

pub struct Dial {
    side: Side,
    value_range: Range,
    degree_range: DegreeRange,
    current_value: f64,
    move_duration: Duration,
    move_easing: Easing,
    strictness: Strictness,
    geometry: ArcGeometry,
    needle: RotationAnimator,
    redzone: Redzone,
    marker: Marker,
    labels: Vec<Box<dyn TextNode>>,
}

impl Dial {
    pub fn new(
        side: Side,
        config: &DialConfig,
        geometry: ArcGeometry,
        strictness: Strictness,
        parts: DialParts,
    ) -> Result<Self, GaugeError> {
        let value_range = Range::new(config.value_range.0, config.value_range.1)?;
        let redzone = ArcWindow::measure(side.redzone_id(), parts.redzone)?;
        let marker = ArcWindow::measure(side.marker_id(), parts.marker)?;

        let mut dial = Self {
            side,
            value_range,
            degree_range: config.degree_range,
            current_value: value_range.min(),
            move_duration: config.move_duration,
            move_easing: config.move_easing,
            strictness,
            geometry,
            needle: RotationAnimator::new(parts.needle),
            redzone: Redzone {
                range: 0.0,
                offset: 0.0,
                window: redzone,
            },
            marker: Marker {
                value: 0.0,
                window: marker,
            },
            labels: parts.labels,
        };
        if !dial.labels.is_empty() {
            let values = ticks::label_values(value_range.max(), dial.labels.len())?;
            dial.write_labels(&values);
        }
        dial.needle.jump_to(dial.angle_of(dial.current_value));
        Ok(dial)
    }

    /// Move the needle to `value`. Returns the dial's value afterwards.
    pub fn set_value(&mut self, value: f64) -> Result<f64, GaugeError> {
        if !self.value_range.contains(value) {
            self.reject("value", value, self.value_range.min())?;
            return Ok(self.current_value);
        }
        self.current_value = value;
        self.animate_needle(value);
        Ok(value)
    }

    /// Highlight `range` value units starting at `offset`.
    ///
    /// Returns the `(range, offset)` in effect afterwards, whether or not the
    /// call changed anything.
    pub fn set_redzone(&mut self, range: f64, offset: f64) -> Result<(f64, f64), GaugeError> {
        let fits = range >= 0.0 && offset >= 0.0 && range + offset <= self.value_range.max();
        if !fits {
            self.reject("redzone end", range + offset, 0.0)?;
            return Ok(self.redzone());
        }
        self.redzone.range = range;
        self.redzone.offset = offset;
        self.render_redzone();
        Ok(self.redzone())
    }

    pub fn set_marker(&mut self, value: f64) -> Result<f64, GaugeError> {
        if !(0.0..=self.value_range.max()).contains(&value) {
            self.reject("marker", value, 0.0)?;
            return Ok(self.marker());
        }
        self.marker.value = value;
        self.render_marker();
        Ok(value)
    }

    /// Rescale the dial to `0..=max`.
    ///
    /// Labels are renumbered, and the value, marker and redzone are clamped
    /// into the new range if needed and redrawn against it. Nothing changes
    /// when the new range is rejected.
    pub fn set_value_range(&mut self, max: f64) -> Result<(), GaugeError> {
        let value_range = Range::new(0.0, max)?;
        let values = if self.labels.is_empty() {
            Vec::new()
        } else {
            ticks::label_values(max, self.labels.len())?
        };

        info!(side = %self.side, max, "value range changed");
        self.value_range = value_range;
        self.write_labels(&values);

        self.current_value = self.current_value.clamp(value_range.min(), max);
        self.animate_needle(self.current_value);

        self.marker.value = self.marker.value.min(max);
        self.render_marker();

        self.redzone.offset = self.redzone.offset.min(max);
        self.redzone.range = self.redzone.range.min(max - self.redzone.offset);
        self.render_redzone();
        Ok(())
    }

    /// Sweep the needle to full scale and back to zero.
    ///
    /// The sweep plays to completion; values set meanwhile take over once it
    /// has finished.
    pub fn ignite(&mut self) {
        let top = self.angle_of(self.value_range.max());
        let bottom = self.angle_of(self.value_range.min());
        self.needle
            .queue_to(top, self.move_duration, self.move_easing);
        self.needle
            .queue_to(bottom, self.move_duration, self.move_easing);
        if self.current_value != self.value_range.min() {
            self.animate_needle(self.current_value);
        }
    }

    /// Dash the redzone path and hide it. The path must be mounted.
    pub fn prime_redzone(&mut self) {
        self.redzone.window.prime();
    }

    /// Dash the marker path and hide it. The path must be mounted.
    pub fn prime_marker(&mut self) {
        self.marker.window.prime();
    }

    /// Step the needle animation; `true` while it is still moving.
    pub fn advance(&mut self, now: Instant) -> bool {
        self.needle.advance(now)
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn value(&self) -> f64 {
        self.current_value
    }

    pub fn value_range(&self) -> Range {
        self.value_range
    }

    pub fn degree_range(&self) -> DegreeRange {
        self.degree_range
    }

    pub fn redzone(&self) -> (f64, f64) {
        (self.redzone.range, self.redzone.offset)
    }

    pub fn marker(&self) -> f64 {
        self.marker.value
    }

    /// Needle angle currently displayed.
    pub fn needle_angle(&self) -> f64 {
        self.needle.angle()
    }

    /// Angle the needle settles at.
    pub fn needle_target(&self) -> f64 {
        self.needle.target()
    }

    pub fn is_moving(&self) -> bool {
        self.needle.is_animating()
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.iter().map(|label| label.text()).collect()
    }

    pub fn angle_of(&self, value: f64) -> f64 {
        value_to_angle(value, &self.value_range, &self.degree_range)
    }

    fn animate_needle(&mut self, value: f64) {
        let angle = self.angle_of(value);
        self.needle
            .animate_to(angle, self.move_duration, self.move_easing);
    }

    fn render_redzone(&mut self) {
        let geometry = self.geometry;
        let range_share = value_to_arc_fraction(self.redzone.range, &self.value_range);
        let offset_share = value_to_arc_fraction(self.redzone.offset, &self.value_range);
        let window = &mut self.redzone.window;

        let length = (window.length() * range_share / geometry.redzone_divisor)
            .clamp(0.0, window.length());
        window.reveal(length);

        // Both paths wind the same way, so only the left one needs turning to
        // the far end of the band.
        let rotation = match self.side {
            Side::Left => {
                geometry.origin + geometry.sweep * offset_share + geometry.sweep * range_share
            }
            Side::Right => -geometry.origin - geometry.sweep * offset_share,
        };
        window.rotate(rotation);
    }

    fn render_marker(&mut self) {
        let geometry = self.geometry;
        let share = value_to_arc_fraction(self.marker.value, &self.value_range);
        let window = &mut self.marker.window;

        window.reveal(geometry.marker_length.clamp(0.0, window.length()));
        let rotation = match self.side {
            Side::Left => geometry.origin + geometry.sweep * share,
            Side::Right => -geometry.origin - geometry.sweep * share,
        };
        window.rotate(rotation);
    }

    /// Number the label slots and move each numbered one to its value.
    fn write_labels(&mut self, values: &[Option<i64>]) {
        let (range, degrees) = (self.value_range, self.degree_range);
        for (label, value) in self.labels.iter_mut().zip(values) {
            match value {
                Some(v) => {
                    label.set_text(&v.to_string());
                    label.place(value_to_angle(*v as f64, &range, &degrees));
                }
                None => label.set_text(""),
            }
        }
    }

    fn reject(&self, what: &'static str, value: f64, min: f64) -> Result<(), GaugeError> {
        let max = self.value_range.max();
        match self.strictness {
            Strictness::Lenient => {
                debug!(side = %self.side, what, value, max, "ignoring out-of-range write");
                Ok(())
            }
            Strictness::Strict => Err(GaugeError::ValueOutOfRange {
                what,
                value,
                min,
                max,
            }),
        }
    }
}

impl fmt::Debug for Dial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dial")
            .field("side", &self.side)
            .field("value_range", &self.value_range)
            .field("degree_range", &self.degree_range)
            .field("current_value", &self.current_value)
            .field("redzone", &self.redzone)
            .field("marker", &self.marker)
            .field("needle", &self.needle)
            .finish()
    }
}
