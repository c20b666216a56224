//! A smoothed-particle-hydrodynamics-style point-particle simulation,
//! confined to a spherical boundary.
//!
//! Each tick rebuilds a uniform-grid spatial hash over the particles, then
//! advances every particle in parallel: acceleration from `force / density`,
//! material-type rules (fire is held immobile), and a reflective, damped
//! clamp against the unit sphere. The hash exists for neighbor queries; the
//! density/pressure/viscosity force pass that consumes it is an extension
//! point, so the active path moves particles on their prior velocity alone.
//!
//! Rendering, UI, and asset concerns live outside this crate: drive a
//! [`ParticleSim`] with `tick`/`finalize_tick` from a caller-owned loop, and
//! read state back through [`ParticleSim::particles`] or
//! [`ParticleSim::snapshot`] between ticks.

use bincode::{Decode, Encode};
use lin_alg::f64::Vec3;

pub mod error;
pub mod integrate;
pub mod particle;
pub mod sim;
pub mod spatial_hash;
pub mod util;

pub use error::SimError;
pub use integrate::{integrate_particle, BOUNDARY_RADIUS, WALL_REBOUND};
pub use particle::{Element, Particle, ParticleStore, INIT_HALF_EXTENT};
pub use sim::{ParticleSim, SnapShot, TickTimings};
pub use spatial_hash::SpatialHashMap;

/// Tunable simulation parameters. Validated when a [`ParticleSim`] is
/// constructed; persistable via [`util::save`] / [`util::load`].
#[derive(Encode, Decode, Clone, Debug)]
pub struct Config {
    /// Number of particles `initialize` generates.
    pub particle_count: usize,
    /// Extent of the simulated region. The hash stage subtracts it from
    /// positions before bucketing; the boundary clamp itself uses
    /// [`BOUNDARY_RADIUS`].
    pub boundary_distance: f64,
    /// Hash cell edge length, doubling as the smoothing length for the force
    /// pass to come. Keep it at or below the boundary extent.
    pub smoothing_length: f64,
    /// Fixed integration timestep, independent of the caller's frame rate.
    pub dt: f64,
    // The fields below are reserved for the density/pressure/viscosity force
    // pass; configured but not applied by the active integration path.
    pub particle_mass: f64,
    pub wall_damping: f64,
    pub stiffness: f64,
    /// Initial and default particle density. Must be positive; acceleration
    /// is `force / density`.
    pub resting_density: f64,
    pub viscosity: f64,
    pub gravity: Vec3,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 1_000,
            boundary_distance: 1.,
            smoothing_length: 0.05,
            dt: 1. / 72.,
            particle_mass: 1.,
            wall_damping: 0.3,
            stiffness: 1.,
            resting_density: 1_000.,
            viscosity: 0.1,
            gravity: Vec3::new(0., -9.81, 0.),
        }
    }
}

impl Config {
    /// Reject non-positive values before they can produce undefined numeric
    /// behavior downstream.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.particle_count == 0 {
            return Err(SimError::InvalidConfig {
                field: "particle_count",
                value: 0.,
            });
        }

        for (field, value) in [
            ("boundary_distance", self.boundary_distance),
            ("smoothing_length", self.smoothing_length),
            ("dt", self.dt),
            ("resting_density", self.resting_density),
        ] {
            if !(value > 0.) {
                return Err(SimError::InvalidConfig { field, value });
            }
        }

        Ok(())
    }
}
