//! Tweened needle rotation.
//!
//! Tweens are driven by the host frame loop through [`RotationAnimator::advance`].
//! A tween starts on the first `advance` after it was issued and always starts
//! from the angle currently on screen, so a request that arrives mid-flight
//! bends the motion towards the new target instead of restarting it.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::drawable::Drawable;
use crate::error::GaugeError;

/// Easing curves, written as the usual two-sided tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// `-`
    Linear,
    /// `<`
    EaseIn,
    /// `>`
    EaseOut,
    /// `<>`
    #[default]
    EaseInOut,
}

impl Easing {
    /// Map linear progress in `0..=1` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::EaseOut => (t * FRAC_PI_2).sin(),
            Easing::EaseInOut => 0.5 - (t * PI).cos() / 2.0,
        }
    }

    /// The same curve without its slow start, for a motion already under way.
    pub fn without_ease_in(self) -> Self {
        match self {
            Easing::EaseIn => Easing::Linear,
            Easing::EaseInOut => Easing::EaseOut,
            other => other,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Easing::Linear => "-",
            Easing::EaseIn => "<",
            Easing::EaseOut => ">",
            Easing::EaseInOut => "<>",
        }
    }
}

impl FromStr for Easing {
    type Err = GaugeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "linear" => Ok(Easing::Linear),
            "<" | "ease-in" => Ok(Easing::EaseIn),
            ">" | "ease-out" => Ok(Easing::EaseOut),
            "<>" | "ease-in-out" => Ok(Easing::EaseInOut),
            other => Err(GaugeError::Configuration(format!(
                "unknown easing '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    duration: Duration,
    easing: Easing,
    started: Option<Instant>,
}

impl Tween {
    fn new(to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from: to,
            to,
            duration,
            easing,
            started: None,
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        let Some(started) = self.started else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (now.saturating_duration_since(started).as_secs_f64() / self.duration.as_secs_f64())
            .min(1.0)
    }
}

/// Owns a rotatable element and moves it towards requested angles.
pub struct RotationAnimator {
    element: Box<dyn Drawable>,
    angle: f64,
    active: Option<Tween>,
    // Whether `active` came from the sequence and must not be redirected.
    locked: bool,
    sequence: VecDeque<Tween>,
    deferred: Option<Tween>,
}

impl RotationAnimator {
    pub fn new(element: Box<dyn Drawable>) -> Self {
        let angle = element.rotation();
        Self {
            element,
            angle,
            active: None,
            locked: false,
            sequence: VecDeque::new(),
            deferred: None,
        }
    }

    /// Rotate immediately and drop anything scheduled.
    pub fn jump_to(&mut self, degrees: f64) {
        self.active = None;
        self.locked = false;
        self.sequence.clear();
        self.deferred = None;
        self.angle = degrees;
        self.element.rotate(degrees);
    }

    /// Tween to `degrees`, redirecting any interruptible tween in flight.
    ///
    /// A redirected needle is already moving, so the new tween skips the
    /// ease-in and carries on without stalling. While a queued sequence runs
    /// the request waits for it to finish; only the most recent waiting
    /// request is kept.
    pub fn animate_to(&mut self, degrees: f64, duration: Duration, easing: Easing) {
        if self.is_sequencing() {
            self.deferred = Some(Tween::new(degrees, duration, easing));
            return;
        }
        let in_flight = self.active.as_ref().is_some_and(|t| t.started.is_some());
        let easing = if in_flight {
            easing.without_ease_in()
        } else {
            easing
        };
        self.active = Some(Tween::new(degrees, duration, easing));
        self.locked = false;
    }

    /// Append a segment that plays to completion before anything else.
    pub fn queue_to(&mut self, degrees: f64, duration: Duration, easing: Easing) {
        if !self.locked {
            self.active = None;
        }
        self.sequence.push_back(Tween::new(degrees, duration, easing));
    }

    /// Step the animation clock. Returns `true` while motion is pending.
    pub fn advance(&mut self, now: Instant) -> bool {
        loop {
            if self.active.is_none() {
                if let Some(next) = self.sequence.pop_front() {
                    self.active = Some(next);
                    self.locked = true;
                } else if let Some(next) = self.deferred.take() {
                    self.active = Some(next);
                    self.locked = false;
                } else {
                    self.locked = false;
                    return false;
                }
            }

            let Some(mut tween) = self.active.take() else {
                return false;
            };
            if tween.started.is_none() {
                tween.started = Some(now);
                tween.from = self.angle;
            }
            let progress = tween.progress(now);
            self.angle = lerp(tween.from, tween.to, tween.easing.apply(progress));
            self.element.rotate(self.angle);

            if progress < 1.0 {
                self.active = Some(tween);
                return true;
            }
        }
    }

    /// Angle currently on screen.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Angle the element settles at once every scheduled tween has played.
    pub fn target(&self) -> f64 {
        self.deferred
            .as_ref()
            .or(self.sequence.back())
            .or(self.active.as_ref())
            .map_or(self.angle, |t| t.to)
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some() || !self.sequence.is_empty() || self.deferred.is_some()
    }

    fn is_sequencing(&self) -> bool {
        (self.locked && self.active.is_some()) || !self.sequence.is_empty()
    }
}

impl fmt::Debug for RotationAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotationAnimator")
            .field("angle", &self.angle)
            .field("target", &self.target())
            .field("queued", &self.sequence.len())
            .finish()
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::ShapeKind;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Hand(Rc<Cell<f64>>);

    impl Drawable for Hand {
        fn kind(&self) -> ShapeKind {
            ShapeKind::Group
        }

        fn rotate(&mut self, degrees: f64) {
            self.0.set(degrees);
        }

        fn rotation(&self) -> f64 {
            self.0.get()
        }
    }

    const SECOND: Duration = Duration::from_millis(1000);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn animator() -> (RotationAnimator, Rc<Cell<f64>>) {
        let cell = Rc::new(Cell::new(0.0));
        (RotationAnimator::new(Box::new(Hand(cell.clone()))), cell)
    }

    #[test]
    fn easing_curves() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-12, "{easing}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing}");
        }
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn easing_tokens() {
        assert_eq!("<>".parse::<Easing>().unwrap(), Easing::EaseInOut);
        assert_eq!("<".parse::<Easing>().unwrap(), Easing::EaseIn);
        assert_eq!(">".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert_eq!("-".parse::<Easing>().unwrap(), Easing::Linear);
        assert!("~".parse::<Easing>().is_err());
        assert_eq!(Easing::EaseInOut.to_string(), "<>");
    }

    #[test]
    fn tween_reaches_target() {
        let (mut hand, cell) = animator();
        let t0 = Instant::now();
        hand.animate_to(100.0, SECOND, Easing::Linear);
        assert!(hand.advance(t0));
        assert_eq!(hand.angle(), 0.0);
        assert!(hand.advance(t0 + ms(250)));
        assert!((hand.angle() - 25.0).abs() < 1e-9);
        assert!(!hand.advance(t0 + SECOND));
        assert_eq!(hand.angle(), 100.0);
        assert_eq!(cell.get(), 100.0);
        assert!(!hand.is_animating());
    }

    #[test]
    fn redirect_blends_from_displayed_angle() {
        let (mut hand, _) = animator();
        let t0 = Instant::now();
        hand.animate_to(100.0, SECOND, Easing::Linear);
        hand.advance(t0);
        hand.advance(t0 + ms(500));
        assert!((hand.angle() - 50.0).abs() < 1e-9);

        hand.animate_to(0.0, SECOND, Easing::Linear);
        hand.advance(t0 + ms(500));
        assert!((hand.angle() - 50.0).abs() < 1e-9);
        hand.advance(t0 + ms(1000));
        assert!((hand.angle() - 25.0).abs() < 1e-9);
        hand.advance(t0 + ms(1500));
        assert_eq!(hand.angle(), 0.0);
    }

    #[test]
    fn redirect_keeps_moving() {
        let (mut hand, _) = animator();
        let t0 = Instant::now();
        hand.animate_to(100.0, SECOND, Easing::EaseInOut);
        hand.advance(t0);
        hand.advance(t0 + ms(500));
        assert!((hand.angle() - 50.0).abs() < 1e-9);

        hand.animate_to(0.0, SECOND, Easing::EaseInOut);
        hand.advance(t0 + ms(500));
        hand.advance(t0 + ms(750));
        let eased_out = 50.0 - 50.0 * (FRAC_PI_2 * 0.25).sin();
        assert!((hand.angle() - eased_out).abs() < 1e-9);
        assert!(!hand.advance(t0 + ms(1500)));
        assert_eq!(hand.angle(), 0.0);

        // From rest the full curve applies.
        hand.animate_to(100.0, SECOND, Easing::EaseInOut);
        hand.advance(t0 + ms(2000));
        hand.advance(t0 + ms(2250));
        let eased_in_out = 100.0 * (0.5 - (PI * 0.25).cos() / 2.0);
        assert!((hand.angle() - eased_in_out).abs() < 1e-9);

        assert_eq!(Easing::EaseIn.without_ease_in(), Easing::Linear);
        assert_eq!(Easing::EaseOut.without_ease_in(), Easing::EaseOut);
    }

    #[test]
    fn zero_duration_snaps() {
        let (mut hand, _) = animator();
        hand.animate_to(42.0, Duration::ZERO, Easing::EaseInOut);
        assert!(!hand.advance(Instant::now()));
        assert_eq!(hand.angle(), 42.0);
    }

    #[test]
    fn sequence_plays_before_deferred_request() {
        let (mut hand, _) = animator();
        let t0 = Instant::now();
        hand.queue_to(120.0, SECOND, Easing::Linear);
        hand.queue_to(0.0, SECOND, Easing::Linear);
        hand.animate_to(30.0, SECOND, Easing::Linear);
        hand.animate_to(45.0, SECOND, Easing::Linear);
        assert_eq!(hand.target(), 45.0);

        hand.advance(t0);
        hand.advance(t0 + ms(500));
        assert!((hand.angle() - 60.0).abs() < 1e-9);

        // A request mid-sequence waits instead of redirecting.
        hand.animate_to(90.0, SECOND, Easing::Linear);
        hand.advance(t0 + ms(1000));
        assert_eq!(hand.angle(), 120.0);
        hand.advance(t0 + ms(1500));
        assert!((hand.angle() - 60.0).abs() < 1e-9);
        hand.advance(t0 + ms(2000));
        assert_eq!(hand.angle(), 0.0);
        hand.advance(t0 + ms(2500));
        assert!((hand.angle() - 45.0).abs() < 1e-9);
        assert!(!hand.advance(t0 + ms(3000)));
        assert_eq!(hand.angle(), 90.0);
    }

    #[test]
    fn jump_cancels_schedule() {
        let (mut hand, cell) = animator();
        hand.queue_to(120.0, SECOND, Easing::Linear);
        hand.animate_to(30.0, SECOND, Easing::Linear);
        hand.jump_to(-240.0);
        assert!(!hand.is_animating());
        assert_eq!(cell.get(), -240.0);
        assert_eq!(hand.target(), -240.0);
    }
}
