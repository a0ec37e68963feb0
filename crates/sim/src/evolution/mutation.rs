//! Mutation-drift birth rule.
//!
//! Every individual is equally likely to reproduce regardless of type. The
//! offspring inherits the parent's type, except that with probability `M` it
//! mutates to the other type. The dying slot is drawn uniformly and
//! independently of the reproducer.
//!
//! With `M = 0` this is neutral drift and the chain can only leave the
//! interior through absorption. With `M > 0` mutation can reintroduce a type
//! that was lost, so runs are normally bounded with a step cap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::PreconditionViolation;
use crate::evolution::transition::{sample_death, TransitionOutcome, TransitionRule};
use crate::simulation::Population;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationDrift {
    /// Probability that an offspring flips type
    mutation_rate: f64,
}

impl MutationDrift {
    /// Create a drift model.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMutationRate` unless `0.0 <= mutation_rate <= 1.0`.
    pub fn new(mutation_rate: f64) -> Result<Self, PreconditionViolation> {
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(PreconditionViolation::InvalidMutationRate(mutation_rate));
        }
        Ok(Self { mutation_rate })
    }

    /// Caller guarantees the rate was validated.
    pub(crate) fn new_unchecked(mutation_rate: f64) -> Self {
        Self { mutation_rate }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

impl TransitionRule for MutationDrift {
    fn sample<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> TransitionOutcome {
        let birth_index = rng.random_range(0..population.size());
        let parent_type = population.individuals()[birth_index];

        let birth_type = if self.mutation_rate > 0.0 && rng.random_bool(self.mutation_rate) {
            parent_type.flipped()
        } else {
            parent_type
        };

        let (death_index, death_type) = sample_death(population, rng);

        TransitionOutcome {
            birth_index,
            birth_type,
            death_index,
            death_type,
        }
    }
}
