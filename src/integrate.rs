//! Per-particle motion integration.

use lin_alg::f64::Vec3;

use crate::particle::{Element, Particle};

/// Radius of the spherical boundary the integrator clamps against. Fixed at
/// the unit sphere; the configurable boundary distance feeds the hash stage
/// only.
pub const BOUNDARY_RADIUS: f64 = 1.0;

/// Velocity scale applied on boundary contact: direction inverted, speed
/// damped. Distinct from the configured (and currently unapplied)
/// `wall_damping`.
pub const WALL_REBOUND: f64 = -0.3;

/// Advance one particle by `dt` with an explicit-Euler step.
///
/// Reads only the particle's own record, so the pass over all particles runs
/// in parallel with no ordering constraint. `force` is whatever the
/// accumulation pass left there; with no pass it is zero, and motion is pure
/// drift plus the material and boundary rules.
pub fn integrate_particle(particle: &mut Particle, dt: f64) {
    debug_assert!(
        particle.density > 0.,
        "zero density produces non-finite acceleration"
    );

    let accel = particle.force / particle.density;
    let mut vel = particle.vel + accel * dt;

    // Fire is extinguished in place each step rather than evolving.
    if particle.element == Element::Fire {
        vel = Vec3::new_zero();
    }

    let mut posit = particle.posit + vel * dt;

    if posit.magnitude() > BOUNDARY_RADIUS {
        posit = posit.to_normalized() * BOUNDARY_RADIUS;
        vel = vel * WALL_REBOUND;
    }

    particle.vel = vel;
    particle.posit = posit;
}
