//! A two-dial speedometer/tachometer gauge.
//!
//! Each dial turns a value into a needle rotation and draws its redzone and
//! marker as partial arcs by windowing the stroke dash of circular paths. The
//! gauge only talks to its artwork through the [`Document`] trait; [`Scene`]
//! is the bundled implementation, rendered into a frame buffer and shown with
//! [`window::run`].
//!
//! ```no_run
//! use twin_gauge::{Gauge, GaugeConfig, LayoutConfig, Scene, Side};
//!
//! let config = GaugeConfig::default();
//! let scene = Scene::twin_dial(400, 400, &config, &LayoutConfig::default());
//! let mut gauge = Gauge::new(&config, &scene)?;
//! gauge.init()?;
//! gauge.dial_mut(Side::Left).set_value(3200.0)?;
//! # Ok::<(), twin_gauge::GaugeError>(())
//! ```

// ============================================================================
// GEOMETRY & ANIMATION
// ============================================================================

pub mod animate;
pub mod arc;
pub mod mapper;
pub mod ticks;

// ============================================================================
// GAUGE
// ============================================================================

pub mod command;
pub mod config;
pub mod dial;
pub mod drawable;
pub mod error;
pub mod gauge;

// ============================================================================
// PRESENTATION
// ============================================================================

pub mod render;
pub mod scene;
pub mod window;

pub use animate::{Easing, RotationAnimator};
pub use command::{GaugeCommand, ParseCommandError};
pub use config::{Color, DialConfig, GaugeConfig, LayoutConfig, WindowConfig};
pub use dial::{Dial, Side, Strictness};
pub use drawable::{Document, Drawable, ShapeKind, TextNode};
pub use error::GaugeError;
pub use gauge::Gauge;
pub use mapper::{value_to_angle, value_to_arc_fraction, DegreeRange, Range};
pub use scene::Scene;
pub use ticks::generate_numbers;
