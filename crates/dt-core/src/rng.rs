//! Deterministic per-agent RNG.
//!
//! # Determinism strategy
//!
//! Replanning draws one `AgentRng` per agent per iteration, seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING) XOR (iteration * MIXING_ITER)
//!
//! The mixing constants are the 64-bit fractional golden ratio and a second
//! odd constant, which spread consecutive ids and iterations across the seed
//! space.  This means:
//!
//! - Agents never share RNG state, so the replanning pass can run in any
//!   order (or in parallel) and still produce identical plans.
//! - Adding agents at the end of the population does not disturb the draws
//!   of existing agents.
//! - Re-running an iteration with the same seed reproduces its choices.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Second mixing constant so `(agent, iteration)` pairs do not collide.
const ITERATION_MIXING: u64 = 0xc2b2_ae3d_27d4_eb4f;

/// Per-agent deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for one agent in one iteration.
    pub fn for_iteration(global_seed: u64, agent: AgentId, iteration: u32) -> Self {
        let seed = global_seed
            ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT)
            ^ (iteration as u64 + 1).wrapping_mul(ITERATION_MIXING);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
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

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Negative and non-finite weights count as zero.  Returns `None` when
    /// every weight is zero or the slice is empty.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        // Scaled to a maximum of 1 so the running total cannot overflow.
        let max = weights.iter().copied().map(clean).fold(0.0, f64::max);
        if max <= 0.0 {
            return None;
        }
        let index = WeightedIndex::<f64>::new(weights.iter().map(|&w| clean(w) / max)).ok()?;
        Some(index.sample(&mut self.0))
    }
}
