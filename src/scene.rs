//! Retained-mode artwork that plays the part of the host document.
//!
//! Nodes are shared between the scene and the handles it gives out, so a
//! dial rotating its needle and the frame loop rendering the scene see the
//! same state. Everything lives on the UI thread.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use rusttype::Font;

use crate::config::{GaugeConfig, LayoutConfig};
use crate::dial::Side;
use crate::drawable::{Document, Drawable, ShapeKind, TextNode};
use crate::error::GaugeError;
use crate::render::{Canvas, Rgb};
use crate::ticks;

/// A needle pivoting on the dial centre, authored pointing east.
#[derive(Debug, Clone)]
pub struct NeedleShape {
    pub rotation: f64,
    pub length: f64,
    pub back_length: f64,
    pub width: f32,
    pub color: Rgb,
}

/// A full-circle stroked path around the dial centre.
///
/// The path starts at `origin` degrees (screen angles, clockwise from east)
/// and runs counter-clockwise.
#[derive(Debug, Clone)]
pub struct ArcPathShape {
    pub radius: f64,
    pub width: f64,
    pub origin: f64,
    pub rotation: f64,
    pub dash: Option<((f64, f64), f64)>,
    pub color: Rgb,
}

impl ArcPathShape {
    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    /// Stretches of the path left visible by the dash pattern.
    pub fn visible_segments(&self) -> Vec<(f64, f64)> {
        let length = self.length();
        let Some(((dash, gap), offset)) = self.dash else {
            return vec![(0.0, length)];
        };
        let period = dash + gap;
        if period <= f64::EPSILON {
            return vec![(0.0, length)];
        }
        let mut segments = Vec::new();
        let mut start = -offset.rem_euclid(period);
        while start < length {
            let (a, b) = (start.max(0.0), (start + dash).min(length));
            if b > a {
                segments.push((a, b));
            }
            start += period;
        }
        segments
    }

    pub fn visible_length(&self) -> f64 {
        self.visible_segments().iter().map(|(a, b)| b - a).sum()
    }
}

/// Text centred at `radius` from the dial centre, towards `angle` degrees.
#[derive(Debug, Clone)]
pub struct LabelShape {
    pub angle: f64,
    pub radius: f64,
    pub text: String,
    pub font_size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Group(NeedleShape),
    Path(ArcPathShape),
    Text(LabelShape),
}

impl LabelShape {
    /// Where the label lands on a dial centred at `centre`, drawn `scale`
    /// times the authored size.
    pub fn position(&self, centre: (f64, f64), scale: f64) -> (f64, f64) {
        let angle = self.angle.to_radians();
        let r = self.radius * scale;
        (centre.0 + angle.cos() * r, centre.1 + angle.sin() * r)
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Group(_) => ShapeKind::Group,
            Shape::Path(_) => ShapeKind::Path,
            Shape::Text(_) => ShapeKind::Text,
        }
    }
}

#[derive(Clone, Debug)]
enum DrawCommand {
    Clear(Rgb),
    Arc {
        r: f64,
        thickness: f64,
        start_angle: f64,
        arc_span: f64,
        color: Rgb,
    },
    Tick {
        r: f64,
        angle: f64,
        length: f64,
        thickness: f32,
        color: Rgb,
    },
    NeedleLine {
        from: (f64, f64),
        to: (f64, f64),
        thickness: f32,
        tapered: bool,
        color: Rgb,
    },
    Circle {
        radius: f64,
        color: Rgb,
    },
    Text(LabelShape),
}

type Node = Rc<RefCell<Shape>>;

pub struct Scene {
    width: usize,
    height: usize,
    background: Rgb,
    hub: Option<(f64, Rgb)>,
    decorations: Vec<DrawCommand>,
    nodes: Vec<(String, Node)>,
    font: Option<Font<'static>>,
}

impl Scene {
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            hub: None,
            decorations: Vec::new(),
            nodes: Vec::new(),
            font: None,
        }
    }

    /// The two-dial artwork: scales, redzone and marker paths, needles and,
    /// when `config.numbered` is set, the `text-<n>` label slots.
    pub fn twin_dial(
        width: usize,
        height: usize,
        config: &GaugeConfig,
        layout: &LayoutConfig,
    ) -> Self {
        let mut scene = Self::new(width, height, layout.background_color.as_tuple());
        let r = (width.min(height) as f64) / 2.0 - layout.margin as f64;
        let scale_color = layout.scale_color.as_tuple();

        for side in Side::BOTH {
            let degrees = config.dial(side).degree_range;
            let (low, high) = if degrees.start <= degrees.end {
                (degrees.start, degrees.end)
            } else {
                (degrees.end, degrees.start)
            };
            scene.decorations.push(DrawCommand::Arc {
                r,
                thickness: layout.scale_thickness as f64,
                start_angle: low.to_radians(),
                arc_span: (high - low).to_radians(),
                color: scale_color,
            });
            let slots = ticks::label_ids(side);
            for i in 0..slots.len() {
                let t = i as f64 / (slots.len() - 1) as f64;
                scene.decorations.push(DrawCommand::Tick {
                    r,
                    angle: (degrees.start + degrees.sweep() * t).to_radians(),
                    length: layout.band_width as f64,
                    thickness: 2.0,
                    color: scale_color,
                });
            }

            // Paths sit at the dial zero after rotating by the arc origin.
            let origin = match side {
                Side::Left => degrees.start - config.arc_origin_degrees,
                Side::Right => degrees.start + config.arc_origin_degrees,
            };
            let band = layout.band_width as f64;
            scene.insert(
                side.redzone_id(),
                Shape::Path(ArcPathShape {
                    radius: r - layout.scale_thickness as f64 - band / 2.0,
                    width: band,
                    origin,
                    rotation: 0.0,
                    dash: None,
                    color: layout.redzone_color.as_tuple(),
                }),
            );
            scene.insert(
                side.marker_id(),
                Shape::Path(ArcPathShape {
                    radius: r - layout.marker_width as f64 / 2.0,
                    width: layout.marker_width as f64,
                    origin,
                    rotation: 0.0,
                    dash: None,
                    color: layout.marker_color.as_tuple(),
                }),
            );

            if config.numbered {
                let label_r = r - layout.label_inset;
                // Evenly spread until a dial moves them to their values.
                for (i, id) in slots.iter().enumerate() {
                    let t = i as f64 / (slots.len() - 1) as f64;
                    scene.insert(
                        id,
                        Shape::Text(LabelShape {
                            angle: degrees.start + degrees.sweep() * t,
                            radius: label_r,
                            text: String::new(),
                            font_size: layout.label_font_size,
                            color: layout.text_color.as_tuple(),
                        }),
                    );
                }
            }
        }

        for side in Side::BOTH {
            scene.insert(
                side.needle_id(),
                Shape::Group(NeedleShape {
                    rotation: 0.0,
                    length: r * layout.needle_length_factor,
                    back_length: layout.needle_back_length,
                    width: layout.needle_width,
                    color: layout.needle_color.as_tuple(),
                }),
            );
        }
        scene.hub = Some((layout.hub_radius as f64, layout.needle_color.as_tuple()));
        scene
    }

    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<(), GaugeError> {
        self.font = Some(Font::try_from_vec(bytes).ok_or(GaugeError::Font)?);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Add or replace the node `id`. Later nodes paint over earlier ones.
    pub fn insert(&mut self, id: &str, shape: Shape) {
        match self.find(id) {
            Some(node) => *node.borrow_mut() = shape,
            None => self
                .nodes
                .push((id.to_string(), Rc::new(RefCell::new(shape)))),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Shape> {
        let index = self.nodes.iter().position(|(name, _)| name == id)?;
        let (_, node) = self.nodes.remove(index);
        let shape = node.borrow().clone();
        Some(shape)
    }

    /// Snapshot of the node `id`.
    pub fn shape(&self, id: &str) -> Option<Shape> {
        self.find(id).map(|node| node.borrow().clone())
    }

    pub fn rotation_of(&self, id: &str) -> Option<f64> {
        match self.shape(id)? {
            Shape::Group(needle) => Some(needle.rotation),
            Shape::Path(path) => Some(path.rotation),
            Shape::Text(_) => None,
        }
    }

    pub fn path(&self, id: &str) -> Option<ArcPathShape> {
        match self.shape(id)? {
            Shape::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        match self.shape(id)? {
            Shape::Text(label) => Some(label.text),
            _ => None,
        }
    }

    /// How much larger than authored the artwork is drawn on a canvas of
    /// `width` x `height` (physical pixels may outnumber the scene's).
    pub fn scale_for(&self, width: usize, height: usize) -> f64 {
        let authored = self.width.min(self.height);
        if authored == 0 {
            return 1.0;
        }
        width.min(height) as f64 / authored as f64
    }

    /// Draw the scene centred on `canvas`, scaled to fit it.
    pub fn render(&self, canvas: &mut Canvas) {
        let (cx, cy) = (canvas.width() as f64 / 2.0, canvas.height() as f64 / 2.0);
        let k = self.scale_for(canvas.width(), canvas.height());
        let kf = k as f32;
        for command in self.commands() {
            match command {
                DrawCommand::Clear(color) => canvas.clear(color),
                DrawCommand::Arc {
                    r,
                    thickness,
                    start_angle,
                    arc_span,
                    color,
                } => canvas.arc(cx, cy, r * k, thickness * k, start_angle, arc_span, color),
                DrawCommand::Tick {
                    r,
                    angle,
                    length,
                    thickness,
                    color,
                } => {
                    let (outer_r, inner_r) = ((r - 1.0) * k, (r - length) * k);
                    let outer = (cx + angle.cos() * outer_r, cy + angle.sin() * outer_r);
                    let inner = (cx + angle.cos() * inner_r, cy + angle.sin() * inner_r);
                    canvas.line(inner, outer, thickness * kf, false, color);
                }
                DrawCommand::NeedleLine {
                    from,
                    to,
                    thickness,
                    tapered,
                    color,
                } => canvas.line(
                    (cx + from.0 * k, cy + from.1 * k),
                    (cx + to.0 * k, cy + to.1 * k),
                    thickness * kf,
                    tapered,
                    color,
                ),
                DrawCommand::Circle { radius, color } => canvas.disc(cx, cy, radius * k, color),
                DrawCommand::Text(label) => {
                    if let Some(font) = &self.font {
                        let (x, y) = label.position((cx, cy), k);
                        canvas.text(x, y, &label.text, font, label.font_size * kf, label.color);
                    }
                }
            }
        }
    }

    fn commands(&self) -> Vec<DrawCommand> {
        let mut commands = vec![DrawCommand::Clear(self.background)];
        commands.extend(self.decorations.iter().cloned());
        for (_, node) in &self.nodes {
            match &*node.borrow() {
                Shape::Path(path) => {
                    let start = (path.origin + path.rotation).to_radians();
                    for (a, b) in path.visible_segments() {
                        commands.push(DrawCommand::Arc {
                            r: path.radius,
                            thickness: path.width,
                            start_angle: start - b / path.radius,
                            arc_span: (b - a) / path.radius,
                            color: path.color,
                        });
                    }
                }
                Shape::Group(needle) => {
                    let angle = needle.rotation.to_radians();
                    let (cos, sin) = (angle.cos(), angle.sin());
                    commands.push(DrawCommand::NeedleLine {
                        from: (0.0, 0.0),
                        to: (cos * needle.length, sin * needle.length),
                        thickness: needle.width,
                        tapered: true,
                        color: needle.color,
                    });
                    commands.push(DrawCommand::NeedleLine {
                        from: (0.0, 0.0),
                        to: (-cos * needle.back_length, -sin * needle.back_length),
                        thickness: needle.width,
                        tapered: false,
                        color: needle.color,
                    });
                }
                Shape::Text(label) if !label.text.is_empty() => {
                    commands.push(DrawCommand::Text(label.clone()));
                }
                Shape::Text(_) => {}
            }
        }
        if let Some((radius, color)) = self.hub {
            commands.push(DrawCommand::Circle { radius, color });
        }
        commands
    }

    fn find(&self, id: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, node)| node)
    }

    fn node(&self, id: &str, kind: ShapeKind) -> Result<Node, GaugeError> {
        let node = self
            .find(id)
            .ok_or_else(|| GaugeError::MissingElement(id.to_string()))?;
        let found = node.borrow().kind();
        if found != kind {
            return Err(GaugeError::ShapeMismatch {
                id: id.to_string(),
                expected: kind,
                found,
            });
        }
        Ok(Rc::clone(node))
    }
}

impl Document for Scene {
    fn wrap(&self, id: &str, kind: ShapeKind) -> Result<Box<dyn Drawable>, GaugeError> {
        Ok(Box::new(NodeHandle {
            node: self.node(id, kind)?,
            kind,
        }))
    }

    fn text(&self, id: &str) -> Result<Box<dyn TextNode>, GaugeError> {
        Ok(Box::new(NodeHandle {
            node: self.node(id, ShapeKind::Text)?,
            kind: ShapeKind::Text,
        }))
    }
}

struct NodeHandle {
    node: Node,
    kind: ShapeKind,
}

impl Drawable for NodeHandle {
    fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn rotate(&mut self, degrees: f64) {
        match &mut *self.node.borrow_mut() {
            Shape::Group(needle) => needle.rotation = degrees,
            Shape::Path(path) => path.rotation = degrees,
            Shape::Text(_) => {}
        }
    }

    fn rotation(&self) -> f64 {
        match &*self.node.borrow() {
            Shape::Group(needle) => needle.rotation,
            Shape::Path(path) => path.rotation,
            Shape::Text(_) => 0.0,
        }
    }

    fn total_length(&self) -> Option<f64> {
        match &*self.node.borrow() {
            Shape::Path(path) => Some(path.length()),
            _ => None,
        }
    }

    fn set_dash_window(&mut self, pattern: (f64, f64), offset: f64) {
        if let Shape::Path(path) = &mut *self.node.borrow_mut() {
            path.dash = Some((pattern, offset));
        }
    }
}

impl TextNode for NodeHandle {
    fn set_text(&mut self, text: &str) {
        if let Shape::Text(label) = &mut *self.node.borrow_mut() {
            label.text = text.to_string();
        }
    }

    fn text(&self) -> String {
        match &*self.node.borrow() {
            Shape::Text(label) => label.text.clone(),
            _ => String::new(),
        }
    }

    fn place(&mut self, degrees: f64) {
        if let Shape::Text(label) = &mut *self.node.borrow_mut() {
            label.angle = degrees;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::twin_dial(
            200,
            200,
            &GaugeConfig::builder().numbered(true).build(),
            &LayoutConfig::default(),
        )
    }

    fn path(dash: Option<((f64, f64), f64)>) -> ArcPathShape {
        ArcPathShape {
            radius: 10.0,
            width: 2.0,
            origin: 90.0,
            rotation: 0.0,
            dash,
            color: (0, 0, 0),
        }
    }

    #[test]
    fn dash_window_reveals_prefix() {
        let full = path(None);
        let l = full.length();
        assert_eq!(full.visible_segments(), vec![(0.0, l)]);

        let hidden = path(Some(((l, l), l)));
        assert!(hidden.visible_length() < 1e-9);

        let prefix = path(Some(((l, l), l - 5.0)));
        let segments = prefix.visible_segments();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].0.abs() < 1e-9);
        assert!((segments[0].1 - 5.0).abs() < 1e-9);
    }

    #[test]
    fn typed_wrapping() {
        let scene = scene();
        let needle = scene.wrap("left-hand-wrapper", ShapeKind::Group).unwrap();
        assert_eq!(needle.kind(), ShapeKind::Group);
        assert_eq!(needle.total_length(), None);

        let redzone = scene.wrap("redzone-right", ShapeKind::Path).unwrap();
        assert!(redzone.total_length().unwrap() > 0.0);

        assert!(matches!(
            scene.wrap("marker-left", ShapeKind::Group),
            Err(GaugeError::ShapeMismatch { .. })
        ));
        assert_eq!(
            scene.wrap("speedo", ShapeKind::Path).err(),
            Some(GaugeError::MissingElement("speedo".into()))
        );
        assert!(scene.text("text-43").is_ok());
        assert!(scene.text("text-2").is_err());
    }

    #[test]
    fn handles_share_state() {
        let scene = scene();
        let mut needle = scene.wrap("right-hand-wrapper", ShapeKind::Group).unwrap();
        needle.rotate(-60.0);
        assert_eq!(scene.rotation_of("right-hand-wrapper"), Some(-60.0));

        let mut marker = scene.wrap("marker-right", ShapeKind::Path).unwrap();
        marker.set_dash_window((100.0, 100.0), 98.0);
        assert_eq!(
            scene.path("marker-right").and_then(|p| p.dash),
            Some(((100.0, 100.0), 98.0))
        );

        let mut label = scene.text("text-21").unwrap();
        label.set_text("0");
        assert_eq!(scene.text_of("text-21").as_deref(), Some("0"));
    }

    #[test]
    fn unnumbered_artwork_has_no_labels() {
        let mut scene =
            Scene::twin_dial(200, 100, &GaugeConfig::default(), &LayoutConfig::default());
        assert_eq!((scene.width(), scene.height()), (200, 100));
        assert!(scene.shape("text-43").is_none());
        assert!(scene.shape("left-hand-wrapper").is_some());

        assert!(matches!(scene.remove("marker-left"), Some(Shape::Path(_))));
        assert!(scene.remove("marker-left").is_none());
        assert!(scene.wrap("marker-left", ShapeKind::Path).is_err());
    }

    #[test]
    fn render_draws_needle() {
        let scene = scene();
        let mut needle = scene.wrap("left-hand-wrapper", ShapeKind::Group).unwrap();
        needle.rotate(180.0);
        let mut buf = vec![0u8; 200 * 200 * 4];
        let mut canvas = Canvas::new(&mut buf, 200, 200);
        scene.render(&mut canvas);
        // Background in a corner, needle colour just left of the hub.
        assert_eq!(canvas.pixel(0, 0), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(70, 100), Some([0x00, 0x00, 0x00, 0xff]));
    }

    #[test]
    fn render_scales_to_larger_canvas() {
        let scene = scene();
        let mut needle = scene.wrap("left-hand-wrapper", ShapeKind::Group).unwrap();
        needle.rotate(180.0);
        assert_eq!(scene.scale_for(400, 400), 2.0);
        assert_eq!(scene.scale_for(400, 300), 1.5);

        let mut buf = vec![0u8; 400 * 400 * 4];
        let mut canvas = Canvas::new(&mut buf, 400, 400);
        scene.render(&mut canvas);
        // The needle doubles in length: 60px left of the hub is still on it.
        assert_eq!(canvas.pixel(140, 200), Some([0x00, 0x00, 0x00, 0xff]));
        assert_eq!(canvas.pixel(200, 200), Some([0x00, 0x00, 0x00, 0xff]));
        assert_eq!(canvas.pixel(5, 5), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn labels_follow_the_canvas_centre() {
        let scene = scene();
        let mut label = scene.text("text-33").unwrap();
        label.place(180.0);
        let Some(Shape::Text(shape)) = scene.shape("text-33") else {
            panic!("text-33 is a label");
        };
        let r = shape.radius;

        let (x, y) = shape.position((100.0, 100.0), scene.scale_for(200, 200));
        assert!((x - (100.0 - r)).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);

        let (x, y) = shape.position((200.0, 200.0), scene.scale_for(400, 400));
        assert!((x - (200.0 - 2.0 * r)).abs() < 1e-9);
        assert!((y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn bad_font_is_rejected() {
        let mut scene = scene();
        assert_eq!(scene.load_font(vec![1, 2, 3]), Err(GaugeError::Font));
    }
}
