//! The two-dial gauge.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::command::GaugeCommand;
use crate::config::GaugeConfig;
use crate::dial::{ArcGeometry, Dial, DialParts, Side};
use crate::drawable::Document;
use crate::error::GaugeError;

#[derive(Debug)]
pub struct Gauge {
    left: Dial,
    right: Dial,
    config: GaugeConfig,
}

impl Gauge {
    /// Bind both dials to their nodes in `document`.
    pub fn new<D: Document + ?Sized>(config: &GaugeConfig, document: &D) -> Result<Self, GaugeError> {
        let geometry = ArcGeometry::from(config);
        let dial = |side: Side| -> Result<Dial, GaugeError> {
            let parts = DialParts::from_document(document, side, config.numbered)?;
            Dial::new(side, config.dial(side), geometry, config.strictness, parts)
        };
        Ok(Self {
            left: dial(Side::Left)?,
            right: dial(Side::Right)?,
            config: config.clone(),
        })
    }

    /// Bring the gauge up.
    ///
    /// Order matters: each arc is dashed before it is drawn, redzones go
    /// before markers, and the ignite sweep plays before the needles settle on
    /// their initial readings.
    pub fn init(&mut self) -> Result<(), GaugeError> {
        let (left, right) = (self.config.left.clone(), self.config.right.clone());

        self.left.prime_redzone();
        self.right.prime_redzone();
        self.right.set_redzone(right.redzone.0, right.redzone.1)?;
        self.left.set_redzone(left.redzone.0, left.redzone.1)?;

        self.left.prime_marker();
        self.right.prime_marker();
        self.right.set_marker(right.marker)?;
        self.left.set_marker(left.marker)?;

        if self.config.ignite_on_init {
            self.ignite();
        }
        self.left.set_value(left.initial_value)?;
        self.right.set_value(right.initial_value)?;
        info!(
            left = self.left.value(),
            right = self.right.value(),
            "gauge initialised"
        );
        Ok(())
    }

    /// Sweep both needles to full scale and back.
    pub fn ignite(&mut self) {
        self.left.ignite();
        self.right.ignite();
    }

    /// Advance the needle animations to `now`; `true` while either moves.
    pub fn tick(&mut self, now: Instant) -> bool {
        let left = self.left.advance(now);
        let right = self.right.advance(now);
        left || right
    }

    pub fn dial(&self, side: Side) -> &Dial {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn dial_mut(&mut self, side: Side) -> &mut Dial {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn left(&self) -> &Dial {
        &self.left
    }

    pub fn right(&self) -> &Dial {
        &self.right
    }

    pub fn left_mut(&mut self) -> &mut Dial {
        &mut self.left
    }

    pub fn right_mut(&mut self) -> &mut Dial {
        &mut self.right
    }

    pub fn apply(&mut self, command: GaugeCommand) -> Result<(), GaugeError> {
        debug!(?command, "applying command");
        match command {
            GaugeCommand::SetValue(side, value) => {
                self.dial_mut(side).set_value(value)?;
            }
            GaugeCommand::SetBothValues(left, right) => {
                self.left.set_value(left)?;
                self.right.set_value(right)?;
            }
            GaugeCommand::SetMarker(side, value) => {
                self.dial_mut(side).set_marker(value)?;
            }
            GaugeCommand::SetRedzone(side, range, offset) => {
                self.dial_mut(side).set_redzone(range, offset)?;
            }
            GaugeCommand::SetValueRange(side, max) => {
                self.dial_mut(side).set_value_range(max)?;
            }
            GaugeCommand::Ignite => self.ignite(),
        }
        Ok(())
    }

    /// Apply every command waiting on `receiver` without blocking.
    pub fn update_with_commands(&mut self, receiver: &Receiver<GaugeCommand>) {
        while let Ok(command) = receiver.try_recv() {
            if let Err(err) = self.apply(command) {
                warn!(%err, "command rejected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::dial::Strictness;
    use crate::drawable::ShapeKind;
    use crate::scene::{NeedleShape, Scene, Shape};
    use std::sync::mpsc;
    use std::time::Duration;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn gauge(config: &GaugeConfig) -> (Gauge, Scene) {
        let scene = Scene::twin_dial(300, 300, config, &LayoutConfig::default());
        let gauge = Gauge::new(config, &scene).unwrap();
        (gauge, scene)
    }

    #[test]
    fn init_draws_stock_arcs() {
        let (mut gauge, scene) = gauge(&GaugeConfig::default());
        gauge.init().unwrap();

        assert!(close(scene.rotation_of("redzone-left").unwrap(), 67.5));
        assert!(close(scene.rotation_of("redzone-right").unwrap(), -45.0));
        assert!(close(scene.rotation_of("marker-left").unwrap(), 90.0));
        assert!(close(scene.rotation_of("marker-right").unwrap(), -135.0));

        assert_eq!(gauge.left().value(), 1500.0);
        assert_eq!(gauge.right().value(), 250.0);
        assert_eq!(gauge.left().redzone(), (1000.0, 250.0));
        assert_eq!(gauge.right().marker(), 350.0);
    }

    #[test]
    fn init_plays_ignite_then_settles() {
        let (mut gauge, scene) = gauge(&GaugeConfig::default());
        gauge.init().unwrap();
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        assert!(gauge.tick(t0));
        assert!(gauge.tick(t0 + ms(1000)));
        assert!(close(gauge.left().needle_angle(), -120.0));
        assert!(close(gauge.right().needle_angle(), -60.0));
        assert!(gauge.tick(t0 + ms(2000)));
        assert!(close(gauge.right().needle_angle(), 60.0));
        assert!(!gauge.tick(t0 + ms(3000)));
        assert!(close(scene.rotation_of("left-hand-wrapper").unwrap(), -195.0));
        assert!(close(scene.rotation_of("right-hand-wrapper").unwrap(), -15.0));
    }

    #[test]
    fn init_without_ignite_heads_straight_for_readings() {
        let config = GaugeConfig::builder().ignite_on_init(false).build();
        let (mut gauge, _) = gauge(&config);
        gauge.init().unwrap();
        let t0 = Instant::now();
        gauge.tick(t0);
        assert!(!gauge.tick(t0 + Duration::from_millis(1000)));
        assert!(close(gauge.left().needle_angle(), -195.0));
    }

    #[test]
    fn missing_and_mistyped_nodes() {
        let config = GaugeConfig::default();
        let empty = Scene::new(100, 100, (0, 0, 0));
        assert_eq!(
            Gauge::new(&config, &empty).err(),
            Some(GaugeError::MissingElement("left-hand-wrapper".into()))
        );

        let mut scene = Scene::twin_dial(300, 300, &config, &LayoutConfig::default());
        scene.insert(
            "marker-right",
            Shape::Group(NeedleShape {
                rotation: 0.0,
                length: 10.0,
                back_length: 2.0,
                width: 1.0,
                color: (0, 0, 0),
            }),
        );
        assert_eq!(
            Gauge::new(&config, &scene).err(),
            Some(GaugeError::ShapeMismatch {
                id: "marker-right".into(),
                expected: ShapeKind::Path,
                found: ShapeKind::Group,
            })
        );

        let mut scene = Scene::twin_dial(300, 300, &config, &LayoutConfig::default());
        scene.remove("redzone-right");
        assert_eq!(
            Gauge::new(&config, &scene).err(),
            Some(GaugeError::MissingElement("redzone-right".into()))
        );

        let numbered = GaugeConfig::builder().numbered(true).build();
        let plain = Scene::twin_dial(300, 300, &config, &LayoutConfig::default());
        assert_eq!(
            Gauge::new(&numbered, &plain).err(),
            Some(GaugeError::MissingElement("text-43".into()))
        );
    }

    #[test]
    fn flat_path_is_not_measurable() {
        let config = GaugeConfig::default();
        let mut scene = Scene::twin_dial(300, 300, &config, &LayoutConfig::default());
        let Some(mut path) = scene.path("redzone-left") else {
            panic!("stock artwork has a left redzone");
        };
        path.radius = 0.0;
        scene.insert("redzone-left", Shape::Path(path));
        assert_eq!(
            Gauge::new(&config, &scene).err(),
            Some(GaugeError::NotMeasurable("redzone-left".into()))
        );
    }

    #[test]
    fn apply_routes_commands() {
        let (mut gauge, _) = gauge(&GaugeConfig::default());
        gauge.init().unwrap();

        gauge.apply(GaugeCommand::SetValue(Side::Right, 100.0)).unwrap();
        assert_eq!(gauge.right().value(), 100.0);
        gauge.apply(GaugeCommand::SetBothValues(3000.0, 300.0)).unwrap();
        assert_eq!((gauge.left().value(), gauge.right().value()), (3000.0, 300.0));
        gauge.apply(GaugeCommand::SetMarker(Side::Left, 3500.0)).unwrap();
        assert_eq!(gauge.left().marker(), 3500.0);
        gauge
            .apply(GaugeCommand::SetRedzone(Side::Right, 100.0, 0.0))
            .unwrap();
        assert_eq!(gauge.right().redzone(), (100.0, 0.0));
        gauge.apply(GaugeCommand::SetValueRange(Side::Right, 200.0)).unwrap();
        assert_eq!(gauge.right().value(), 200.0);

        // Out of range is a silent no-op by default.
        gauge.apply(GaugeCommand::SetValue(Side::Left, 9000.0)).unwrap();
        assert_eq!(gauge.left().value(), 3000.0);
    }

    #[test]
    fn strict_gauge_reports_bad_commands() {
        let config = GaugeConfig::builder().strictness(Strictness::Strict).build();
        let (mut gauge, _) = gauge(&config);
        gauge.init().unwrap();
        assert!(matches!(
            gauge.apply(GaugeCommand::SetValue(Side::Left, 9000.0)),
            Err(GaugeError::ValueOutOfRange { .. })
        ));
        assert!(gauge
            .apply(GaugeCommand::SetValueRange(Side::Right, -1.0))
            .is_err());
    }

    #[test]
    fn drains_channel_and_skips_rejects() {
        let config = GaugeConfig::builder().strictness(Strictness::Strict).build();
        let (mut gauge, _) = gauge(&config);
        gauge.init().unwrap();

        let (sender, receiver) = mpsc::channel();
        sender.send(GaugeCommand::SetValue(Side::Left, 9000.0)).unwrap();
        sender.send(GaugeCommand::SetBothValues(2000.0, 100.0)).unwrap();
        sender.send(GaugeCommand::SetMarker(Side::Right, 50.0)).unwrap();
        gauge.update_with_commands(&receiver);

        assert_eq!(gauge.left().value(), 2000.0);
        assert_eq!(gauge.right().value(), 100.0);
        assert_eq!(gauge.right().marker(), 50.0);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn dial_accessors_agree() {
        let (mut gauge, _) = gauge(&GaugeConfig::default());
        gauge.left_mut().set_value(100.0).unwrap();
        gauge.right_mut().set_value(10.0).unwrap();
        for side in Side::BOTH {
            assert_eq!(gauge.dial(side).side(), side);
        }
        assert_eq!(gauge.dial(Side::Left).value(), 100.0);
        gauge.dial_mut(Side::Right).set_value(20.0).unwrap();
        assert_eq!(gauge.right().value(), 20.0);
    }
}
