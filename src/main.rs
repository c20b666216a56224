//! Headless driver: loads a config (or falls back to defaults), runs the
//! simulation for a fixed number of ticks, and prints stage timings.

use std::{path::PathBuf, time::Duration};

use rand::Rng;

use elemental_sph::{util, Config, ParticleSim};

const SAVE_FILE: &str = "config.sph";

const NUM_TICKS: usize = 2_000;
const BENCH_RATIO: usize = 500;

fn main() {
    let save_path = PathBuf::from(SAVE_FILE);

    let config = match util::load::<Config>(&save_path) {
        Ok(cfg) => {
            println!("Loaded config from {SAVE_FILE}.");
            cfg
        }
        Err(_) => Config::default(),
    };

    let seed: u64 = rand::rng().random();
    println!(
        "Running {} particles for {} ticks. Seed: {seed}",
        config.particle_count, NUM_TICKS
    );

    let dt = config.dt;
    let mut sim = match ParticleSim::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    if let Err(e) = sim.initialize(seed) {
        eprintln!("Error: {e}");
        return;
    }

    let mut build_time = Duration::ZERO;
    let mut integ_time = Duration::ZERO;

    for t in 0..NUM_TICKS {
        if let Err(e) = sim.tick(dt).and_then(|_| sim.finalize_tick()) {
            eprintln!("Error at tick {t}: {e}");
            return;
        }

        let timings = sim.last_timings();
        build_time += timings.build;
        integ_time += timings.integrate;

        if (t + 1) % BENCH_RATIO == 0 {
            println!(
                "t: {}. Hash time: {}μs Integ time: {}μs",
                t + 1,
                build_time.as_micros() / BENCH_RATIO as u128,
                integ_time.as_micros() / BENCH_RATIO as u128
            );
            build_time = Duration::ZERO;
            integ_time = Duration::ZERO;
        }
    }

    match sim.particles() {
        Ok(particles) => {
            let farthest_r = particles
                .iter()
                .map(|p| p.posit.magnitude())
                .fold(0., f64::max);
            println!(
                "Complete. {} particles; farthest r: {farthest_r:.4}",
                particles.len()
            );
        }
        Err(e) => eprintln!("Error: {e}"),
    }

    if let Err(e) = util::save(&save_path, sim.config()) {
        eprintln!("Error saving config: {e}");
    }
}
