//! Error type shared by every gauge component.

use crate::drawable::ShapeKind;

/// Errors raised while configuring or driving a gauge.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaugeError {
    /// Invalid configuration, discovered at setup time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A setter received a value outside the dial's range while in strict mode.
    #[error("{what} {value} is outside {min}..={max}")]
    ValueOutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A required node is absent from the host document.
    #[error("missing element '{0}'")]
    MissingElement(String),

    /// A node exists but is not the shape that was asked for.
    #[error("element '{id}' is a {found:?}, expected a {expected:?}")]
    ShapeMismatch {
        id: String,
        expected: ShapeKind,
        found: ShapeKind,
    },

    /// A path that cannot report its total length.
    #[error("element '{0}' has no measurable length")]
    NotMeasurable(String),

    /// Font bytes could not be parsed.
    #[error("unable to load font")]
    Font,
}
