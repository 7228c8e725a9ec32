//! A single piece of confetti
//!
//! Motion is a stylized approximation: a launch velocity that decays
//! geometrically, a constant downward drift, and two phases (wobble and
//! tilt) that make each piece flutter as it falls.

use super::color::Rgb;
use super::options::BurstConfig;
use super::{Point, Vector, GRAVITY};
use crate::paint::PaintContext;
use rand::Rng;
use std::f64::consts::PI;

const WOBBLE_STEP: f64 = 0.1;
const TILT_STEP: f64 = 0.1;
const WOBBLE_RADIUS: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pos: Point,
    velocity: f64,
    /// Heading in radians, screen space (y grows downwards)
    angle: f64,
    wobble: f64,
    tilt_angle: f64,
    tilt_sin: f64,
    tilt_cos: f64,
    decay: f64,
    tick: u32,
    total_ticks: u32,
    color: Rgb,
    /// Corner jitter, resampled every tick in [5, 6)
    jitter: f64,
}

impl Particle {
    /// Launch a particle from `origin` (pixels) with randomized physics.
    pub fn new<R: Rng + ?Sized>(
        origin: Point,
        config: &BurstConfig,
        color: Rgb,
        rng: &mut R,
    ) -> Self {
        let rad_angle = config.angle.to_radians();
        let rad_spread = config.spread.to_radians();

        let wobble = rng.gen::<f64>() * 10.0;
        let velocity = config.start_velocity * 0.5 + rng.gen::<f64>() * config.start_velocity;
        let angle = -rad_angle + (0.5 * rad_spread - rng.gen::<f64>() * rad_spread);
        let tilt_angle = rng.gen::<f64>() * PI;
        let jitter = rng.gen::<f64>() + 5.0;

        Self {
            pos: origin,
            velocity,
            angle,
            wobble,
            tilt_angle,
            tilt_sin: 0.0,
            tilt_cos: 0.0,
            decay: config.decay,
            tick: 0,
            total_ticks: config.ticks,
            color,
            jitter,
        }
    }

    /// Advance one tick and paint the result.
    ///
    /// Returns whether the particle should be integrated again next frame.
    pub fn integrate<C, R>(&mut self, ctx: &mut C, rng: &mut R) -> bool
    where
        C: PaintContext + ?Sized,
        R: Rng + ?Sized,
    {
        self.pos += Vector::new(
            self.angle.cos() * self.velocity,
            self.angle.sin() * self.velocity + GRAVITY,
        );
        self.wobble += WOBBLE_STEP;
        self.velocity *= self.decay;
        self.tilt_angle += TILT_STEP;
        self.tilt_sin = self.tilt_angle.sin();
        self.tilt_cos = self.tilt_angle.cos();
        self.jitter = rng.gen::<f64>() + 5.0;

        // Taken before the increment, so the last frame is still visible
        let progress = self.tick as f64 / self.total_ticks as f64;
        self.tick += 1;

        ctx.fill_polygon(&self.outline(), self.color.with_alpha(1.0 - progress));

        self.is_alive()
    }

    /// The pixel-snapped quad painted for the current state.
    ///
    /// The second vertex pairs the wobble x with the jittered base y, unlike
    /// its neighbours; that skew is what makes the pieces flutter.
    pub fn outline(&self) -> [Point; 4] {
        let (x, y) = (self.pos.x, self.pos.y);
        let wobble_x = x + WOBBLE_RADIUS * self.wobble.cos();
        let wobble_y = y + WOBBLE_RADIUS * self.wobble.sin();

        let dx = self.jitter * self.tilt_cos;
        let dy = self.jitter * self.tilt_sin;

        [
            (x, y),
            (wobble_x, y + dy),
            (wobble_x + dx, wobble_y + dy),
            (x + dx, wobble_y),
        ]
        .map(|(px, py)| Point::new(px.floor(), py.floor()))
    }

    pub fn is_alive(&self) -> bool {
        self.tick < self.total_ticks
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn wobble(&self) -> f64 {
        self.wobble
    }

    pub fn tilt_angle(&self) -> f64 {
        self.tilt_angle
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn color(&self) -> Rgb {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::colors;
    use crate::paint::{PaintCommand, RecordingProvider, SurfaceProvider};
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(start_velocity: f64, decay: f64, ticks: u32) -> BurstConfig {
        BurstConfig {
            start_velocity,
            decay,
            ticks,
            ..BurstConfig::default()
        }
    }

    #[test]
    fn test_zero_spread_heading() {
        let mut rng = StdRng::seed_from_u64(7);
        for angle in [0.0, 45.0, 90.0, 135.0, 270.0] {
            let config = BurstConfig {
                angle,
                spread: 0.0,
                ..BurstConfig::default()
            };
            let p = Particle::new(Point::origin(), &config, colors::SKY, &mut rng);
            assert_eq!(p.angle(), -(angle.to_radians()));
        }
    }

    #[test]
    fn test_heading_stays_in_spread_cone() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = BurstConfig::default();
        let (center, half) = (-config.angle.to_radians(), config.spread.to_radians() / 2.0);
        for _ in 0..500 {
            let p = Particle::new(Point::origin(), &config, colors::SKY, &mut rng);
            assert!(p.angle() > center - half - 1e-12);
            assert!(p.angle() <= center + half + 1e-12);
        }
    }

    #[test]
    fn test_initial_velocity_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = config(45.0, 0.9, 200);
        for _ in 0..1000 {
            let p = Particle::new(Point::origin(), &config, colors::SKY, &mut rng);
            assert!(p.velocity() >= 22.5);
            assert!(p.velocity() < 67.5);
        }
    }

    #[test]
    fn test_initial_state() {
        // StepRng(0, 0) draws 0.0 every time
        let mut rng = StepRng::new(0, 0);
        let origin = Point::new(100.0, 50.0);
        let p = Particle::new(origin, &config(40.0, 0.8, 12), colors::LIME, &mut rng);
        assert_eq!(p.pos(), origin);
        assert_eq!(p.velocity(), 20.0);
        assert_eq!(p.wobble(), 0.0);
        assert_eq!(p.tilt_angle(), 0.0);
        assert_eq!(p.jitter(), 5.0);
        assert_eq!(p.tick(), 0);
        assert_eq!(p.total_ticks(), 12);
        assert_eq!(p.decay(), 0.8);
        assert_eq!(p.color(), colors::LIME);
        assert!(p.is_alive());
    }

    #[test]
    fn test_tick_lifecycle() {
        let provider = RecordingProvider::new(100, 100);
        let mut surface = provider.create_surface(0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = Particle::new(Point::origin(), &config(45.0, 0.9, 4), colors::SKY, &mut rng);

        let alive: Vec<bool> = (0..4)
            .map(|i| {
                let alive = p.integrate(&mut surface, &mut rng);
                assert_eq!(p.tick(), i + 1);
                alive
            })
            .collect();
        assert_eq!(alive, vec![true, true, true, false]);
        assert_eq!(provider.log().fills, 4);
    }

    #[test]
    fn test_fade_alpha_strictly_decreasing() {
        let provider = RecordingProvider::new(100, 100);
        let mut surface = provider.create_surface(0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = Particle::new(Point::origin(), &config(30.0, 0.9, 10), colors::SKY, &mut rng);
        while p.integrate(&mut surface, &mut rng) {}

        let alphas: Vec<f64> = provider
            .take_commands()
            .into_iter()
            .filter_map(|cmd| match cmd {
                PaintCommand::Fill { style, .. } => Some(style.alpha),
                _ => None,
            })
            .collect();
        assert_eq!(alphas.len(), 10);
        assert_eq!(alphas[0], 1.0);
        assert!((alphas[9] - 0.1).abs() < 1e-12);
        for pair in alphas.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        assert!(alphas.iter().all(|&a| a > 0.0 && a <= 1.0));
    }

    #[test]
    fn test_gravity_only_motion() {
        let provider = RecordingProvider::new(100, 100);
        let mut surface = provider.create_surface(0).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let start = Point::new(50.0, 20.0);
        let mut p = Particle::new(start, &config(0.0, 1.0, 5), colors::SKY, &mut rng);

        let mut last_y = p.pos().y;
        for _ in 0..5 {
            p.integrate(&mut surface, &mut rng);
            assert!(p.pos().y > last_y);
            assert!((p.pos().x - start.x).abs() < 1e-9);
            last_y = p.pos().y;
        }
        assert_eq!(p.pos().y, 35.0);
    }

    #[test]
    fn test_exact_step() {
        // With every draw at 0: heading = -90deg + spread/2, tilt starts at 0
        let mut rng = StepRng::new(0, 0);
        let config = BurstConfig {
            angle: 90.0,
            spread: 0.0,
            start_velocity: 20.0,
            decay: 0.5,
            ticks: 3,
            ..BurstConfig::default()
        };
        let mut p = Particle::new(Point::new(100.0, 100.0), &config, colors::SKY, &mut rng);

        let provider = RecordingProvider::new(200, 200);
        let mut surface = provider.create_surface(0).unwrap();
        assert!(p.integrate(&mut surface, &mut rng));

        // velocity 10 straight up, then gravity
        assert!((p.pos().x - 100.0).abs() < 1e-9);
        assert!((p.pos().y - 93.0).abs() < 1e-9);
        assert_eq!(p.velocity(), 5.0);
        assert!((p.wobble() - 0.1).abs() < 1e-12);
        assert!((p.tilt_angle() - 0.1).abs() < 1e-12);
        assert_eq!(p.jitter(), 5.0);

        let dx = 5.0 * 0.1f64.cos();
        let dy = 5.0 * 0.1f64.sin();
        let wobble_x = p.pos().x + 10.0 * 0.1f64.cos();
        let wobble_y = p.pos().y + 10.0 * 0.1f64.sin();
        let expected = [
            (p.pos().x, p.pos().y),
            (wobble_x, p.pos().y + dy),
            (wobble_x + dx, wobble_y + dy),
            (p.pos().x + dx, wobble_y),
        ]
        .map(|(x, y): (f64, f64)| Point::new(x.floor(), y.floor()));

        match &provider.take_commands()[..] {
            [PaintCommand::Fill { points, style }] => {
                assert_eq!(points[..], expected[..]);
                assert_eq!(style.color, colors::SKY);
                assert_eq!(style.alpha, 1.0);
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }
}
