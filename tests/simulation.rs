//! End-to-end behavior of the simulation driver.

use lin_alg::f64::Vec3;

use elemental_sph::{util, Config, ParticleSim, SimError, BOUNDARY_RADIUS, WALL_REBOUND};

const DT: f64 = 1. / 72.;

fn base_config() -> Config {
    Config {
        particle_count: 1_000,
        boundary_distance: 1.,
        smoothing_length: 0.05,
        dt: DT,
        ..Config::default()
    }
}

#[test]
fn one_tick_is_drift_or_clamp() -> Result<(), SimError> {
    let mut sim = ParticleSim::new(base_config())?;
    sim.initialize(77)?;

    let before: Vec<(Vec3, Vec3)> = sim
        .particles()?
        .iter()
        .map(|p| (p.posit, p.vel))
        .collect();

    sim.tick(DT)?;
    sim.finalize_tick()?;

    for ((posit_0, vel_0), p) in before.iter().zip(sim.particles()?) {
        let free = *posit_0 + *vel_0 * DT;

        if free.magnitude() <= BOUNDARY_RADIUS {
            assert!((p.posit - free).magnitude() < 1e-12);
            assert!((p.vel - *vel_0).magnitude() < 1e-12);
        } else {
            assert!((p.posit.magnitude() - BOUNDARY_RADIUS).abs() < 1e-12);
            assert!((p.vel - *vel_0 * WALL_REBOUND).magnitude() < 1e-12);
        }
    }

    Ok(())
}

#[test]
fn boundary_contact_reverses_and_damps() -> Result<(), SimError> {
    let mut sim = ParticleSim::new(Config {
        particle_count: 1,
        ..base_config()
    })?;
    sim.initialize(0)?;
    sim.spawn_particle(Vec3::new(BOUNDARY_RADIUS, 0., 0.), Vec3::new(2., 0., 0.))?;

    sim.tick(DT)?;
    sim.finalize_tick()?;

    let p = &sim.particles()?[1];
    assert!((p.posit.magnitude() - BOUNDARY_RADIUS).abs() < 1e-12);
    assert!((p.vel.x - 2. * WALL_REBOUND).abs() < 1e-12);

    Ok(())
}

#[test]
fn particles_stay_contained() -> Result<(), SimError> {
    let mut sim = ParticleSim::new(Config {
        particle_count: 200,
        ..base_config()
    })?;
    sim.initialize(5)?;
    // A fast runaway that hits the wall repeatedly.
    sim.spawn_particle(Vec3::new(0.9, 0., 0.), Vec3::new(25., 3., -3.))?;

    for _ in 0..100 {
        sim.tick(DT)?;
        sim.finalize_tick()?;

        for p in sim.particles()? {
            assert!(p.posit.magnitude() <= BOUNDARY_RADIUS + 1e-12);
        }
    }

    Ok(())
}

#[test]
fn spawn_count_is_monotonic() -> Result<(), SimError> {
    let mut sim = ParticleSim::new(Config {
        particle_count: 100,
        ..base_config()
    })?;
    sim.initialize(3)?;

    for i in 0..5 {
        sim.spawn_particle(Vec3::new_zero(), Vec3::new(0., 0.1 * i as f64, 0.))?;
        sim.tick(DT)?;
        // Mid-tick spawns are queued, never dropped.
        sim.spawn_particle(Vec3::new(0.1, 0., 0.), Vec3::new_zero())?;
        sim.finalize_tick()?;
    }

    assert_eq!(sim.particles()?.len(), 110);
    Ok(())
}

#[test]
fn reinitialize_with_same_seed_is_identical() -> Result<(), SimError> {
    let mut sim = ParticleSim::new(base_config())?;

    sim.initialize(42)?;
    let first: Vec<(Vec3, Vec3)> = sim
        .particles()?
        .iter()
        .map(|p| (p.posit, p.vel))
        .collect();

    // Perturb, then reinitialize with the same seed.
    sim.tick(DT)?;
    sim.finalize_tick()?;
    sim.initialize(42)?;

    for ((posit, vel), p) in first.iter().zip(sim.particles()?) {
        assert_eq!(p.posit.x, posit.x);
        assert_eq!(p.posit.y, posit.y);
        assert_eq!(p.posit.z, posit.z);
        assert_eq!(p.vel.x, vel.x);
        assert_eq!(p.vel.y, vel.y);
        assert_eq!(p.vel.z, vel.z);
    }

    Ok(())
}

#[test]
fn lifecycle_misuse_is_rejected() {
    let mut sim = ParticleSim::new(base_config()).unwrap();

    // Tick before initialize.
    assert_eq!(sim.tick(DT), Err(SimError::NotInitialized));
    assert_eq!(sim.particles().unwrap_err(), SimError::NotInitialized);

    sim.initialize(1).unwrap();

    // Non-positive and non-finite timesteps.
    assert_eq!(
        sim.tick(0.),
        Err(SimError::InvalidConfig {
            field: "dt",
            value: 0.
        })
    );
    assert!(sim.tick(f64::NAN).is_err());

    // Finalize with nothing in flight.
    assert_eq!(sim.finalize_tick(), Err(SimError::NoTickInFlight));

    // Mid-tick: no reads, no nested ticks, no dispose.
    sim.tick(DT).unwrap();
    assert_eq!(sim.particles().unwrap_err(), SimError::TickInFlight);
    assert_eq!(sim.tick(DT), Err(SimError::TickInFlight));
    assert_eq!(sim.dispose(), Err(SimError::TickInFlight));
    sim.finalize_tick().unwrap();

    // Dispose once, then everything is an error.
    sim.dispose().unwrap();
    assert_eq!(sim.dispose(), Err(SimError::Disposed));
    assert_eq!(sim.tick(DT), Err(SimError::Disposed));
    assert_eq!(sim.particles().unwrap_err(), SimError::Disposed);
}

#[test]
fn config_validation_names_the_field() {
    let err = ParticleSim::new(Config {
        particle_count: 0,
        ..base_config()
    })
    .unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidConfig {
            field: "particle_count",
            value: 0.
        }
    );

    let err = ParticleSim::new(Config {
        smoothing_length: -0.05,
        ..base_config()
    })
    .unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidConfig {
            field: "smoothing_length",
            value: -0.05
        }
    );

    let err = ParticleSim::new(Config {
        resting_density: 0.,
        ..base_config()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidConfig {
            field: "resting_density",
            ..
        }
    ));
}

#[test]
fn config_round_trips_through_disk() {
    let path = std::env::temp_dir().join(format!("elemental_sph_cfg_{}", std::process::id()));

    let config = Config {
        particle_count: 123,
        smoothing_length: 0.07,
        resting_density: 650.,
        gravity: Vec3::new(0., -3.7, 0.),
        ..Config::default()
    };

    util::save(&path, &config).unwrap();
    let loaded: Config = util::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.particle_count, 123);
    assert_eq!(loaded.smoothing_length, 0.07);
    assert_eq!(loaded.resting_density, 650.);
    assert_eq!(loaded.gravity.y, -3.7);
    assert_eq!(loaded.dt, config.dt);
}

#[test]
fn snapshot_matches_particle_state() -> Result<(), SimError> {
    let mut sim = ParticleSim::new(Config {
        particle_count: 50,
        ..base_config()
    })?;
    sim.initialize(11)?;
    sim.tick(DT)?;
    sim.finalize_tick()?;

    let snap = sim.snapshot()?;
    let particles = sim.particles()?;

    assert_eq!(snap.posits.len(), particles.len());
    for (v, p) in snap.posits.iter().zip(particles) {
        assert!((v.x as f64 - p.posit.x).abs() < 1e-6);
        assert!((v.y as f64 - p.posit.y).abs() < 1e-6);
        assert!((v.z as f64 - p.posit.z).abs() < 1e-6);
    }
    assert!(snap.densities.iter().all(|&d| d > 0.));

    Ok(())
}
