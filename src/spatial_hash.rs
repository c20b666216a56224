//! Uniform-grid spatial hashing for neighbor lookup.
//!
//! The map is rebuilt from the particle array every tick and discarded at
//! tick end. It is derived state; the particle store stays the source of
//! truth.

use std::collections::HashMap;

use lin_alg::f64::Vec3;
use rayon::prelude::*;

use crate::particle::Particle;

// Large primes for hash mixing.
const P1: u32 = 73_856_093;
const P2: u32 = 19_349_663;
const P3: u32 = 83_492_791;

/// Integer grid cell containing `posit`, for the given cell size and scalar
/// bounds offset. The offset is subtracted from each component.
pub fn cell_coord(posit: Vec3, cell_size: f64, bounds_offset: f64) -> (i32, i32, i32) {
    (
        ((posit.x - bounds_offset) / cell_size).floor() as i32,
        ((posit.y - bounds_offset) / cell_size).floor() as i32,
        ((posit.z - bounds_offset) / cell_size).floor() as i32,
    )
}

/// Scalar hash of a grid cell. Distinct cells may collide; buckets key on the
/// hash and append, so colliding cells share a bucket rather than clobbering
/// each other.
pub fn cell_hash(cell: (i32, i32, i32)) -> u32 {
    (cell.0 as u32).wrapping_mul(P1)
        ^ (cell.1 as u32).wrapping_mul(P2)
        ^ (cell.2 as u32).wrapping_mul(P3)
}

/// Multi-map from cell hash to the indices of the particles in that cell (or
/// a colliding one). Built once per tick; read-only afterwards.
#[derive(Debug)]
pub struct SpatialHashMap {
    cell_size: f64,
    bounds_offset: f64,
    buckets: HashMap<u32, Vec<usize>>,
}

impl SpatialHashMap {
    /// Bucket every particle index by its cell hash. Each rayon split fills
    /// a local shard; shards are merged into the final map.
    pub fn build(particles: &[Particle], cell_size: f64, bounds_offset: f64) -> Self {
        let buckets = particles
            .par_iter()
            .enumerate()
            .fold(
                HashMap::new,
                |mut shard: HashMap<u32, Vec<usize>>, (i, p)| {
                    let hash = cell_hash(cell_coord(p.posit, cell_size, bounds_offset));
                    shard.entry(hash).or_default().push(i);
                    shard
                },
            )
            .reduce(HashMap::new, |mut merged, shard| {
                for (hash, mut indices) in shard {
                    merged.entry(hash).or_default().append(&mut indices);
                }
                merged
            });

        Self {
            cell_size,
            bounds_offset,
            buckets,
        }
    }

    /// Indices bucketed under the cell containing `posit`.
    pub fn bucket(&self, posit: Vec3) -> &[usize] {
        let hash = cell_hash(cell_coord(posit, self.cell_size, self.bounds_offset));
        self.buckets.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices in the 3x3x3 block of cells around `posit`. This is the
    /// candidate set a density/pressure pass distance-filters.
    pub fn neighbors_of(&self, posit: Vec3) -> Vec<usize> {
        let center = cell_coord(posit, self.cell_size, self.bounds_offset);
        let mut result = Vec::new();

        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let hash = cell_hash((center.0 + dx, center.1 + dy, center.2 + dz));
                    if let Some(indices) = self.buckets.get(&hash) {
                        result.extend_from_slice(indices);
                    }
                }
            }
        }

        result
    }

    /// Number of occupied buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of indices stored across all buckets.
    pub fn particle_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
