//! Deterministic per-agent and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Agents never share RNG state, and spawning extra agents does not disturb
//! the streams of existing ones, so a run is reproducible from its seed.
//!
//! Both wrappers expose the geometric samplers the swarm needs: uniform
//! directions on the unit sphere (headings, boundary bounces) and uniform
//! points inside the unit ball (spawn positions).

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Vec3};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Uniform direction by normalizing a rejection-sampled point in the ball.
fn sample_on_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = sample_in_unit_cube(rng);
        let len2 = v.length_squared();
        if len2 > 1e-6 && len2 <= 1.0 {
            return v * (1.0 / len2.sqrt());
        }
    }
}

fn sample_inside_unit_sphere<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let v = sample_in_unit_cube(rng);
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

#[inline]
fn sample_in_unit_cube<R: Rng>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.gen_range(-1.0f32..=1.0),
        rng.gen_range(-1.0f32..=1.0),
        rng.gen_range(-1.0f32..=1.0),
    )
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Stored in `AgentRngs`, parallel to the agent arena, so an agent's random
/// draws can be taken while other agents' state is borrowed.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice; `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Uniformly distributed unit vector.
    #[inline]
    pub fn on_unit_sphere(&mut self) -> Vec3 {
        sample_on_unit_sphere(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (initial placement, headings
/// and speeds drawn by the swarm builder).
///
/// Used only from the single-threaded setup and tick code.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn on_unit_sphere(&mut self) -> Vec3 {
        sample_on_unit_sphere(&mut self.0)
    }

    /// Uniformly distributed point in the closed unit ball.
    #[inline]
    pub fn inside_unit_sphere(&mut self) -> Vec3 {
        sample_inside_unit_sphere(&mut self.0)
    }
}
