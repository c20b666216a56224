//! Particle records, and the store that owns them.

use lin_alg::f64::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::SimError;

/// Half-extent of the cube initial positions are sampled from. Fixed;
/// positions sample this cube regardless of the configured boundary distance.
pub const INIT_HALF_EXTENT: f64 = 0.5;

/// Material tag. Only `Fire` is special-cased by the integrator today; the
/// others are carried state for material rules to come.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Element {
    #[default]
    Earth,
    Water,
    Fire,
    Wood,
    Metal,
}

/// Smoothed-particle-hydrodynamics point.
#[derive(Clone, Debug)]
pub struct Particle {
    pub posit: Vec3,
    pub vel: Vec3,
    /// Local density. Must stay positive; acceleration divides by it.
    pub density: f64,
    pub pressure: f64,
    /// Accumulated force. The current step logic never writes it; the
    /// density/pressure/viscosity pass will, once implemented.
    pub force: Vec3,
    pub element: Element,
    /// For thermal dynamics.
    pub temp: f64,
    /// For aging and decay behavior.
    pub remaining_lifetime: f64,
}

impl Particle {
    /// A particle at rest state apart from the given kinematics.
    fn with_kinematics(posit: Vec3, vel: Vec3, density: f64) -> Self {
        Self {
            posit,
            vel,
            density,
            pressure: 1.,
            force: Vec3::new_zero(),
            element: Element::default(),
            temp: 0.,
            remaining_lifetime: 0.,
        }
    }
}

/// Append-only, ordered particle collection. Indices are stable for the
/// duration of a tick; the spatial hash carries them as bucket payloads.
#[derive(Debug)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    resting_density: f64,
    disposed: bool,
}

impl ParticleStore {
    pub fn new(resting_density: f64) -> Self {
        Self {
            particles: Vec::new(),
            resting_density,
            disposed: false,
        }
    }

    /// Clear existing contents and generate `count` particles: positions
    /// uniform in the init cube, velocities uniform in `[-1, 1]` per axis,
    /// density at the resting value, pressure 1. Deterministic for a given
    /// seed.
    pub fn initialize(&mut self, count: usize, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);

        self.particles.clear();
        self.particles.reserve(count);

        for _ in 0..count {
            let posit = Vec3::new(
                rng.random_range(-INIT_HALF_EXTENT..INIT_HALF_EXTENT),
                rng.random_range(-INIT_HALF_EXTENT..INIT_HALF_EXTENT),
                rng.random_range(-INIT_HALF_EXTENT..INIT_HALF_EXTENT),
            );
            let vel = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );

            self.particles
                .push(Particle::with_kinematics(posit, vel, self.resting_density));
        }
    }

    /// Add one particle with the given kinematics. Remaining fields take
    /// their rest-state defaults; density is the resting value, never zero.
    pub fn append(&mut self, posit: Vec3, vel: Vec3) {
        self.particles
            .push(Particle::with_kinematics(posit, vel, self.resting_density));
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Release backing storage. A second call is an error.
    pub fn dispose(&mut self) -> Result<(), SimError> {
        if self.disposed {
            return Err(SimError::Disposed);
        }

        self.particles = Vec::new();
        self.disposed = true;
        Ok(())
    }
}
