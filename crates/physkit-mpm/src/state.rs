//! Particle state: flat buffers for all per-particle data.
//!
//! This is the primary mutable data structure during simulation.
//! Step methods read and write these buffers each substep.
//!
//! # Layout
//!
//! Vector quantities are interleaved with stride `D`:
//! ```text
//! positions:  [x0, y0, (z0), x1, y1, (z1), ...]
//! velocities: [u0, v0, (w0), u1, v1, (w1), ...]
//! ```

use serde::{Deserialize, Serialize};
use physkit_types::{PhysError, PhysResult, Scalar};

/// Per-particle buffers for a `D`-dimensional simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleState<const D: usize> {
    dimension: usize,
    positions: Vec<Scalar>,
    velocities: Vec<Scalar>,
    masses: Vec<Scalar>,
    volumes: Vec<Scalar>,
}

impl<const D: usize> ParticleState<D> {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self {
            dimension: D,
            ..Default::default()
        }
    }

    /// Appends a particle and returns its index.
    pub fn add_particle(
        &mut self,
        position: [Scalar; D],
        velocity: [Scalar; D],
        mass: Scalar,
        volume: Scalar,
    ) -> usize {
        self.dimension = D;
        self.positions.extend_from_slice(&position);
        self.velocities.extend_from_slice(&velocity);
        self.masses.push(mass);
        self.volumes.push(volume);
        self.masses.len() - 1
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.velocities.clear();
        self.masses.clear();
        self.volumes.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> [Scalar; D] {
        std::array::from_fn(|a| self.positions[i * D + a])
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> [Scalar; D] {
        std::array::from_fn(|a| self.velocities[i * D + a])
    }

    #[inline]
    pub fn set_position(&mut self, i: usize, position: [Scalar; D]) {
        self.positions[i * D..(i + 1) * D].copy_from_slice(&position);
    }

    #[inline]
    pub fn set_velocity(&mut self, i: usize, velocity: [Scalar; D]) {
        self.velocities[i * D..(i + 1) * D].copy_from_slice(&velocity);
    }

    #[inline]
    pub fn mass(&self, i: usize) -> Scalar {
        self.masses[i]
    }

    #[inline]
    pub fn volume(&self, i: usize) -> Scalar {
        self.volumes[i]
    }

    pub fn total_mass(&self) -> Scalar {
        self.masses.iter().sum()
    }

    /// Total linear momentum `Σ m v`.
    pub fn momentum(&self) -> [Scalar; D] {
        let mut p = [0.0; D];
        for i in 0..self.len() {
            let v = self.velocity(i);
            for a in 0..D {
                p[a] += self.masses[i] * v[a];
            }
        }
        p
    }

    /// Kinetic energy `Σ ½ m |v|²`.
    pub fn kinetic_energy(&self) -> Scalar {
        (0..self.len())
            .map(|i| 0.5 * self.masses[i] * norm_squared(&self.velocity(i)))
            .sum()
    }

    /// Largest particle speed, 0 for an empty state.
    pub fn max_velocity_norm(&self) -> Scalar {
        self.velocities
            .chunks_exact(D.max(1))
            .map(|v| norm_squared(v).sqrt())
            .fold(0.0, Scalar::max)
    }

    /// True when every stored scalar is finite.
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(&self.velocities)
            .chain(&self.masses)
            .chain(&self.volumes)
            .all(|x| x.is_finite())
    }

    /// Checks buffer lengths and dimension, e.g. after deserialization.
    pub fn validate(&self) -> PhysResult<()> {
        let n = self.masses.len();
        if !self.is_empty() && self.dimension != D {
            return Err(PhysError::Serialization(format!(
                "particle state has dimension {}, expected {}",
                self.dimension, D
            )));
        }
        if self.positions.len() != n * D
            || self.velocities.len() != n * D
            || self.volumes.len() != n
        {
            return Err(PhysError::Serialization(
                "particle buffers have inconsistent lengths".into(),
            ));
        }
        Ok(())
    }
}

fn norm_squared(v: &[Scalar]) -> Scalar {
    v.iter().map(|c| c * c).sum()
}
