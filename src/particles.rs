use std::time::SystemTime;

use glam::{vec3, Vec3};
use log::info;
use rand::prelude::*;
use rand_pcg::Pcg64Mcg;

/// A single simulated point. Velocity is fixed at spawn time; the falling
/// motion is encoded as a constant velocity, not integrated from gravity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub lifetime: f32,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, lifetime: f32) -> Self {
        Self {
            position,
            velocity,
            lifetime,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.lifetime -= dt;
    }

    pub fn is_dead(&self) -> bool {
        self.lifetime <= 0.0
    }
}

/// Spawn policy: uniform horizontal position over a square, fixed height,
/// fixed downward velocity, fixed initial lifetime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Emitter {
    pub horizontal_range: (f32, f32),
    pub spawn_height: f32,
    pub velocity: Vec3,
    pub lifetime: f32,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            horizontal_range: (-5.0, 5.0),
            spawn_height: 5.0,
            velocity: vec3(0.0, -2.0, 0.0),
            lifetime: 3.0,
        }
    }
}

impl Emitter {
    fn spawn(&self, rng: &mut impl Rng) -> Particle {
        let (min, max) = self.horizontal_range;
        let position = vec3(
            rng.gen_range(min..=max),
            self.spawn_height,
            rng.gen_range(min..=max),
        );
        Particle::new(position, self.velocity, self.lifetime)
    }
}

/// Owns the live particle collection and applies one lifecycle step per
/// frame: update every particle, cull the dead, spawn one replacement.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    emitter: Emitter,
    rng: Pcg64Mcg,
}

impl ParticleSystem {
    pub fn new(emitter: Emitter) -> Self {
        let rand_seed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        info!("Seeded RNG with {}", rand_seed);

        Self::with_seed(emitter, rand_seed)
    }

    pub fn with_seed(emitter: Emitter, seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            emitter,
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// One frame of the lifecycle. Order matters: a particle that dies this
    /// frame is never handed to the renderer, and a newly spawned particle
    /// is drawn the same frame it is created.
    pub fn step(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.update(dt);
        }

        // Stable compacting cull; survivors keep insertion order.
        self.particles.retain(|p| !p.is_dead());

        self.particles.push(self.emitter.spawn(&mut self.rng));
    }

    /// Read-only view over the live set, in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> ParticleSystem {
        ParticleSystem::with_seed(Emitter::default(), 42)
    }

    #[test]
    fn update_advances_position_and_decrements_lifetime() {
        let mut p = Particle::new(vec3(1.0, 5.0, -2.0), vec3(0.0, -2.0, 0.5), 3.0);
        p.update(0.25);

        assert_eq!(p.position, vec3(1.0, 5.0 - 2.0 * 0.25, -2.0 + 0.5 * 0.25));
        assert_eq!(p.lifetime, 3.0 - 0.25);
    }

    #[test]
    fn zero_dt_leaves_particle_unchanged() {
        let mut p = Particle::new(vec3(0.0, 5.0, 0.0), vec3(0.0, -2.0, 0.0), 3.0);
        let before = p;
        p.update(0.0);

        assert_eq!(p, before);
    }

    #[test]
    fn dead_iff_lifetime_nonpositive() {
        assert!(!Particle::new(Vec3::ZERO, Vec3::ZERO, 0.5).is_dead());
        assert!(Particle::new(Vec3::ZERO, Vec3::ZERO, 0.0).is_dead());
        assert!(Particle::new(Vec3::ZERO, Vec3::ZERO, -0.1).is_dead());
    }

    #[test]
    fn dies_after_exactly_ceil_lifetime_over_dt_updates() {
        let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO, 3.0);
        for _ in 0..2 {
            p.update(1.0);
            assert!(!p.is_dead());
        }
        p.update(1.0);
        assert!(p.is_dead());

        // Non-divisible case: ceil(1.0 / 0.4) = 3 updates.
        let mut p = Particle::new(Vec3::ZERO, Vec3::ZERO, 1.0);
        p.update(0.4);
        assert!(!p.is_dead());
        p.update(0.4);
        assert!(!p.is_dead());
        p.update(0.4);
        assert!(p.is_dead());
    }

    #[test]
    fn step_on_empty_collection_yields_one_particle() {
        let mut system = system();
        system.step(1.0 / 60.0);

        assert_eq!(system.len(), 1);
    }

    #[test]
    fn expired_particles_never_reach_the_renderer() {
        let mut system = system();
        system.step(1.0);
        system.step(3.0); // first particle expires exactly this frame

        assert!(system.particles().iter().all(|p| !p.is_dead()));
    }

    #[test]
    fn steady_state_size_is_constant_once_frames_exceed_lifetime() {
        // dt = 1.0, lifetime = 3.0: sizes grow 1, 2, 3, then hold steady
        // (one dies, one spawns). The frame-1 particle has had 3 updates by
        // frame 4 and is culled there.
        let mut system = system();
        let mut sizes = Vec::new();
        for _ in 0..6 {
            system.step(1.0);
            sizes.push(system.len());
        }

        assert_eq!(sizes, [1, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn spawned_particles_stay_within_the_emitter_bounds() {
        let mut system = system();
        let emitter = Emitter::default();
        for _ in 0..10_000 {
            system.step(10.0); // every previous particle dies each frame
            let p = system.particles()[0];

            assert!((-5.0..=5.0).contains(&p.position.x));
            assert!((-5.0..=5.0).contains(&p.position.z));
            assert_eq!(p.position.y, emitter.spawn_height);
            assert_eq!(p.velocity, emitter.velocity);
            assert_eq!(p.lifetime, emitter.lifetime);
        }
    }

    #[test]
    fn cull_preserves_survivor_order() {
        let mut system = system();
        for _ in 0..4 {
            system.step(1.0);
        }
        let before: Vec<Particle> = system.particles().to_vec();
        system.step(1.0);

        // The oldest survivor dies; the rest keep their relative order,
        // advanced by one update.
        let expected: Vec<Particle> = before[1..]
            .iter()
            .map(|p| {
                let mut p = *p;
                p.update(1.0);
                p
            })
            .collect();
        assert_eq!(&system.particles()[..expected.len()], expected.as_slice());
    }
}
