//! Simulation driver: owns the particle store, sequences the per-tick
//! build → integrate stages, and fences external access at tick boundaries.

use std::time::{Duration, Instant};

use lin_alg::{f32::Vec3 as Vec3f32, f64::Vec3};
use rayon::prelude::*;

use crate::{
    error::SimError,
    integrate::integrate_particle,
    particle::{Element, Particle, ParticleStore},
    spatial_hash::SpatialHashMap,
    Config,
};

/// Render-facing copy of particle state.
// Stored as f32; we only need f64 precision during the integration.
#[derive(Clone, Debug)]
pub struct SnapShot {
    pub posits: Vec<Vec3f32>,
    pub vels: Vec<Vec3f32>,
    pub densities: Vec<f32>,
    pub pressures: Vec<f32>,
    pub elements: Vec<Element>,
}

pub fn vec_to_f32(v: Vec3) -> Vec3f32 {
    Vec3f32::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Wall-clock cost of the most recent tick's two stages.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickTimings {
    pub build: Duration,
    pub integrate: Duration,
}

/// The simulation instance. Constructed by and passed to whichever
/// collaborator drives it; there is no global accessor.
pub struct ParticleSim {
    config: Config,
    store: ParticleStore,
    /// The in-flight tick's hash map. `Some` between `tick` and
    /// `finalize_tick`; its lifetime never crosses a tick boundary.
    tick_map: Option<SpatialHashMap>,
    /// Spawns requested while a tick was in flight; applied at
    /// `finalize_tick`.
    pending_spawns: Vec<(Vec3, Vec3)>,
    last_timings: TickTimings,
    initialized: bool,
    disposed: bool,
}

impl ParticleSim {
    /// Validate the config and set up an empty store.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        let store = ParticleStore::new(config.resting_density);

        Ok(Self {
            config,
            store,
            tick_map: None,
            pending_spawns: Vec::new(),
            last_timings: TickTimings::default(),
            initialized: false,
            disposed: false,
        })
    }

    /// (Re)generate the configured number of particles. The same seed and
    /// config produce the identical particle set every time.
    pub fn initialize(&mut self, seed: u64) -> Result<(), SimError> {
        self.guard_idle()?;
        self.store.initialize(self.config.particle_count, seed);
        self.initialized = true;
        Ok(())
    }

    /// Advance every particle by `dt`: build this tick's spatial hash in
    /// parallel, then run the integration pass once the build has fully
    /// completed. The map stays alive until `finalize_tick`.
    pub fn tick(&mut self, dt: f64) -> Result<(), SimError> {
        self.guard_idle()?;
        if !self.initialized {
            return Err(SimError::NotInitialized);
        }
        if !(dt > 0.) {
            return Err(SimError::InvalidConfig {
                field: "dt",
                value: dt,
            });
        }

        let build_start = Instant::now();
        let map = SpatialHashMap::build(
            self.store.particles(),
            self.config.smoothing_length,
            self.config.boundary_distance,
        );
        let build = build_start.elapsed();

        // TODO: density/pressure/viscosity accumulation over `map` neighbors,
        // writing `Particle::force`, goes here between the build and the
        // integration pass.

        let integrate_start = Instant::now();
        self.store
            .particles_mut()
            .par_iter_mut()
            .for_each(|particle| integrate_particle(particle, dt));

        self.last_timings = TickTimings {
            build,
            integrate: integrate_start.elapsed(),
        };
        self.tick_map = Some(map);
        Ok(())
    }

    /// Complete the tick: release its hash map and apply any spawns queued
    /// while it was in flight. Must run before particle state is read and
    /// before the next `tick`.
    pub fn finalize_tick(&mut self) -> Result<(), SimError> {
        if self.disposed {
            return Err(SimError::Disposed);
        }
        if self.tick_map.take().is_none() {
            return Err(SimError::NoTickInFlight);
        }

        for (posit, vel) in std::mem::take(&mut self.pending_spawns) {
            self.store.append(posit, vel);
        }
        Ok(())
    }

    /// Add one particle with the given kinematics. Applied immediately
    /// between ticks; while a tick is in flight the spawn is queued so it
    /// never overlaps the integration pass.
    pub fn spawn_particle(&mut self, posit: Vec3, vel: Vec3) -> Result<(), SimError> {
        if self.disposed {
            return Err(SimError::Disposed);
        }
        if !self.initialized {
            return Err(SimError::NotInitialized);
        }

        if self.tick_map.is_some() {
            self.pending_spawns.push((posit, vel));
        } else {
            self.store.append(posit, vel);
        }
        Ok(())
    }

    /// Read-only view of the particle array. Only valid between ticks.
    pub fn particles(&self) -> Result<&[Particle], SimError> {
        if self.disposed {
            return Err(SimError::Disposed);
        }
        if self.tick_map.is_some() {
            return Err(SimError::TickInFlight);
        }
        if !self.initialized {
            return Err(SimError::NotInitialized);
        }
        Ok(self.store.particles())
    }

    /// f32 copy of the state a renderer consumes.
    pub fn snapshot(&self) -> Result<SnapShot, SimError> {
        let particles = self.particles()?;

        Ok(SnapShot {
            posits: particles.iter().map(|p| vec_to_f32(p.posit)).collect(),
            vels: particles.iter().map(|p| vec_to_f32(p.vel)).collect(),
            densities: particles.iter().map(|p| p.density as f32).collect(),
            pressures: particles.iter().map(|p| p.pressure as f32).collect(),
            elements: particles.iter().map(|p| p.element).collect(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stage durations of the most recent tick; zero before the first one.
    pub fn last_timings(&self) -> TickTimings {
        self.last_timings
    }

    /// Release the particle store. Further use of the sim, including a
    /// second `dispose`, is an error.
    pub fn dispose(&mut self) -> Result<(), SimError> {
        if self.tick_map.is_some() {
            return Err(SimError::TickInFlight);
        }
        self.store.dispose()?;
        self.disposed = true;
        self.initialized = false;
        Ok(())
    }

    fn guard_idle(&self) -> Result<(), SimError> {
        if self.disposed {
            return Err(SimError::Disposed);
        }
        if self.tick_map.is_some() {
            return Err(SimError::TickInFlight);
        }
        Ok(())
    }
}
