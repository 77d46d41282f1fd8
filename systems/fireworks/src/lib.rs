#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Celebration particle system that launches fireworks on completion.

use std::f32::consts::TAU;
use std::time::Duration;

use glam::Vec2;
use nqueens_core::Event;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ROCKET_COUNT: usize = 10;
const SPARKS_PER_BURST: usize = 50;
/// Gravity applied to rising rockets, in px/s².
const ROCKET_GRAVITY: f32 = 2_000.0;
/// Gravity applied to burst sparks, in px/s².
const SPARK_GRAVITY: f32 = 500.0;
const SPARK_VELOCITY_MIN: f32 = 200.0;
const SPARK_VELOCITY_SPAN: f32 = 800.0;
const SPARK_LIFE: Duration = Duration::from_millis(1_200);
const SPARK_FADE: Duration = Duration::from_millis(500);
/// Per-tick velocity damping applied to sparks.
const SPARK_DRAG: f32 = 0.95;

const PALETTE: [SparkColor; 8] = [
    SparkColor::Red,
    SparkColor::Orange,
    SparkColor::Yellow,
    SparkColor::Green,
    SparkColor::Blue,
    SparkColor::Purple,
    SparkColor::Silver,
    SparkColor::White,
];

/// Configuration parameters required to construct the fireworks system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided random seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Colour assigned to a rocket and the sparks it bursts into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SparkColor {
    /// Warm red.
    Red,
    /// Orange.
    Orange,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Purple.
    Purple,
    /// Muted silver.
    Silver,
    /// Near-white.
    White,
}

/// Role a particle currently plays in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Rising projectile that bursts at the end of its life.
    Rocket,
    /// Burst fragment that fades out.
    Spark,
}

/// Single simulated particle exposed to renderers.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Position relative to the launch origin; positive y points down.
    pub position: Vec2,
    /// Velocity in px/s; positive y rises against gravity.
    pub velocity: Vec2,
    /// Colour of the particle.
    pub color: SparkColor,
    /// Role of the particle.
    pub kind: ParticleKind,
    age: Duration,
    life: Duration,
    fade: Duration,
}

impl Particle {
    /// Render opacity: opaque through its life, then fading linearly to zero.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.age <= self.life {
            return 1.0;
        }
        let fading = self.age - self.life;
        if self.fade.is_zero() || fading >= self.fade {
            0.0
        } else {
            1.0 - fading.as_secs_f32() / self.fade.as_secs_f32()
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingLaunch {
    delay: Duration,
    color: SparkColor,
}

/// Event-driven particle system with deterministic seeded randomness.
///
/// A `PuzzleCompleted` event queues a staggered volley of rockets; ticks
/// integrate positions, burst expired rockets into sparks, and retire faded
/// sparks. The system is pure with respect to its seed: the same seed and
/// event stream produce the same particles.
#[derive(Debug)]
pub struct Fireworks {
    rng: ChaCha8Rng,
    particles: Vec<Particle>,
    pending: Vec<PendingLaunch>,
}

impl Fireworks {
    /// Creates a new fireworks system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            particles: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Consumes world events, advancing the simulation on each tick.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PuzzleCompleted { .. } => self.queue_volley(),
                Event::TimeAdvanced { dt } => self.advance(*dt),
                _ => {}
            }
        }
    }

    /// Live particles in launch order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Whether the celebration has fully played out.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty() && self.pending.is_empty()
    }

    fn queue_volley(&mut self) {
        let mut delay = Duration::ZERO;
        for _ in 0..ROCKET_COUNT {
            let color = PALETTE[self.rng.gen_range(0..PALETTE.len())];
            self.pending.push(PendingLaunch { delay, color });
            delay += Duration::from_millis(self.rng.gen_range(200..400));
        }
    }

    fn advance(&mut self, dt: Duration) {
        self.launch_due_rockets(dt);

        let seconds = dt.as_secs_f32();
        let mut bursts: Vec<(Vec2, SparkColor)> = Vec::new();

        self.particles.retain_mut(|particle| {
            particle.age = particle.age.saturating_add(dt);
            particle.position.x += particle.velocity.x * seconds;
            particle.position.y -= particle.velocity.y * seconds;

            let gravity = match particle.kind {
                ParticleKind::Rocket => ROCKET_GRAVITY,
                ParticleKind::Spark => SPARK_GRAVITY,
            };
            particle.velocity.y -= gravity * seconds;
            if particle.kind == ParticleKind::Spark {
                particle.velocity *= SPARK_DRAG;
            }

            if particle.age > particle.life + particle.fade {
                if particle.kind == ParticleKind::Rocket {
                    bursts.push((particle.position, particle.color));
                }
                false
            } else {
                true
            }
        });

        for (position, color) in bursts {
            self.spawn_burst(position, color);
        }
    }

    fn launch_due_rockets(&mut self, dt: Duration) {
        for launch in &mut self.pending {
            launch.delay = launch.delay.saturating_sub(dt);
        }

        let due: Vec<SparkColor> = self
            .pending
            .iter()
            .filter(|launch| launch.delay.is_zero())
            .map(|launch| launch.color)
            .collect();
        self.pending.retain(|launch| !launch.delay.is_zero());

        for color in due {
            self.spawn_rocket(color);
        }
    }

    fn spawn_rocket(&mut self, color: SparkColor) {
        let velocity = Vec2::new(
            self.rng.gen_range(-400.0..400.0),
            self.rng.gen_range(1_800.0..3_100.0),
        );
        let life = Duration::from_millis(self.rng.gen_range(1_500..2_000));
        self.particles.push(Particle {
            position: Vec2::ZERO,
            velocity,
            color,
            kind: ParticleKind::Rocket,
            age: Duration::ZERO,
            life,
            fade: Duration::ZERO,
        });
    }

    fn spawn_burst(&mut self, position: Vec2, color: SparkColor) {
        for _ in 0..SPARKS_PER_BURST {
            // Uniform direction on a sphere, projected onto the screen plane.
            let theta = self.rng.gen::<f32>() * TAU;
            let phi = (self.rng.gen::<f32>() * 2.0 - 1.0).acos();
            let speed = self.rng.gen::<f32>() * SPARK_VELOCITY_SPAN + SPARK_VELOCITY_MIN;

            let velocity = Vec2::new(
                speed * phi.sin() * theta.cos(),
                speed * phi.sin() * theta.sin(),
            );
            self.particles.push(Particle {
                position,
                velocity,
                color,
                kind: ParticleKind::Spark,
                age: Duration::ZERO,
                life: SPARK_LIFE,
                fade: SPARK_FADE,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqueens_core::BoardSize;

    fn completed() -> Event {
        Event::PuzzleCompleted {
            size: BoardSize::new(4).expect("positive size"),
            elapsed_millis: 9_000,
        }
    }

    fn tick(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    #[test]
    fn nothing_happens_without_a_completion() {
        let mut fireworks = Fireworks::new(Config::new(7));
        fireworks.handle(&[tick(1_000), tick(1_000)]);

        assert!(fireworks.is_idle());
        assert!(fireworks.particles().is_empty());
    }

    #[test]
    fn completion_launches_a_staggered_volley() {
        let mut fireworks = Fireworks::new(Config::new(7));
        fireworks.handle(&[completed()]);
        assert!(!fireworks.is_idle());

        // The first rocket launches on the first tick; the rest are staggered
        // by 200-400 ms, so the full volley is airborne within four seconds.
        fireworks.handle(&[tick(16)]);
        let airborne = fireworks
            .particles()
            .iter()
            .filter(|particle| particle.kind == ParticleKind::Rocket)
            .count();
        assert!(airborne >= 1);

        let mut launched = airborne;
        for _ in 0..250 {
            fireworks.handle(&[tick(16)]);
            launched = launched.max(
                fireworks
                    .particles()
                    .iter()
                    .filter(|particle| particle.kind == ParticleKind::Rocket)
                    .count(),
            );
        }
        assert!(launched >= 2);
    }

    #[test]
    fn expired_rockets_burst_into_sparks() {
        let mut fireworks = Fireworks::new(Config::new(11));
        fireworks.handle(&[completed()]);

        // Rockets live at most two seconds; a coarse tick expires the first
        // one immediately after launch.
        fireworks.handle(&[tick(16), tick(2_500)]);
        let sparks = fireworks
            .particles()
            .iter()
            .filter(|particle| particle.kind == ParticleKind::Spark)
            .count();
        assert!(sparks >= SPARKS_PER_BURST);
    }

    #[test]
    fn sparks_fade_and_the_system_returns_to_idle() {
        let mut fireworks = Fireworks::new(Config::new(3));
        fireworks.handle(&[completed()]);

        for _ in 0..20 {
            fireworks.handle(&[tick(1_000)]);
        }
        assert!(fireworks.is_idle());
    }

    #[test]
    fn spark_opacity_fades_linearly_after_its_life() {
        let particle = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: SparkColor::White,
            kind: ParticleKind::Spark,
            age: SPARK_LIFE + Duration::from_millis(250),
            life: SPARK_LIFE,
            fade: SPARK_FADE,
        };
        assert!((particle.opacity() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn identical_seeds_replay_identical_celebrations() {
        let mut first = Fireworks::new(Config::new(42));
        let mut second = Fireworks::new(Config::new(42));

        let script = [completed(), tick(16), tick(500), tick(2_000), tick(100)];
        first.handle(&script);
        second.handle(&script);

        assert_eq!(first.particles().len(), second.particles().len());
        for (left, right) in first.particles().iter().zip(second.particles()) {
            assert_eq!(left.position, right.position);
            assert_eq!(left.velocity, right.velocity);
            assert_eq!(left.color, right.color);
            assert_eq!(left.kind, right.kind);
        }
    }
}
