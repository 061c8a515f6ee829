//! Capabilities the gauge needs from its host document.
//!
//! A host exposes named nodes. The gauge asks for each node with an explicit
//! [`ShapeKind`] and gets back a typed handle; it never inspects what the host
//! actually stores.

use crate::error::GaugeError;

/// The concrete shape behind a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A group that only rotates (needle wrapper).
    Group,
    /// A stroked path with a measurable length (redzone, marker).
    Path,
    /// A text label.
    Text,
}

/// Something the gauge can rotate and dash.
pub trait Drawable {
    fn kind(&self) -> ShapeKind;

    /// Replace the node's rotation, in degrees around its pivot.
    fn rotate(&mut self, degrees: f64);

    fn rotation(&self) -> f64;

    /// Total stroke length, `None` for shapes without a path.
    fn total_length(&self) -> Option<f64> {
        None
    }

    /// Set the stroke dash pattern `(dash, gap)` and offset.
    fn set_dash_window(&mut self, _pattern: (f64, f64), _offset: f64) {}
}

/// A text node whose content can be replaced.
pub trait TextNode {
    fn set_text(&mut self, text: &str);

    fn text(&self) -> String;

    /// Move the label to the scale position a needle at `degrees` points to.
    fn place(&mut self, _degrees: f64) {}
}

/// A host that hands out typed handles to its nodes.
pub trait Document {
    /// Wrap the node `id` as a drawable of `kind`.
    ///
    /// Fails with [`GaugeError::MissingElement`] if there is no such node and
    /// [`GaugeError::ShapeMismatch`] if it is some other shape.
    fn wrap(&self, id: &str, kind: ShapeKind) -> Result<Box<dyn Drawable>, GaugeError>;

    /// Wrap the node `id` as a text label.
    fn text(&self, id: &str) -> Result<Box<dyn TextNode>, GaugeError>;
}
