//! Fitness-proportional birth rule and fixation analytics.
//!
//! This is the classical Moran process. Mutants (`A`) carry relative fitness
//! `r`, residents (`B`) carry fitness 1. One reproducer is drawn with
//! probability proportional to fitness, so with `i` mutants in a population of
//! `N`:
//!
//! ```text
//! P(birth of A) = r·i / (r·i + N - i)
//! P(birth of B) = (N - i) / (r·i + N - i)
//! ```
//!
//! The dying slot is drawn uniformly and independently, so the reproducer can
//! also be the one that dies. There is no mutation term: states `i = 0` and
//! `i = N` are absorbing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::IndividualType;
use crate::errors::PreconditionViolation;
use crate::evolution::transition::{sample_death, TransitionOutcome, TransitionRule};
use crate::simulation::Population;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessProportional {
    /// Relative fitness of `A` against `B`
    fitness: f64,
}

impl FitnessProportional {
    /// Create a fitness-proportional model.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFitness` if `fitness` is not positive and finite.
    pub fn new(fitness: f64) -> Result<Self, PreconditionViolation> {
        if !(fitness.is_finite() && fitness > 0.0) {
            return Err(PreconditionViolation::InvalidFitness(fitness));
        }
        Ok(Self { fitness })
    }

    pub(crate) fn new_unchecked(fitness: f64) -> Self {
        Self { fitness }
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Weight of one individual in the birth draw.
    #[inline]
    pub fn weight(&self, t: IndividualType) -> f64 {
        match t {
            IndividualType::A => self.fitness,
            IndividualType::B => 1.0,
        }
    }

    /// Probability that the next reproducer is an `A`.
    pub fn birth_probability_a(&self, population: &Population) -> f64 {
        let a = self.fitness * population.count_a() as f64;
        a / (a + population.count_b() as f64)
    }

    /// Draw a reproducer index with probability proportional to weight.
    fn sample_birth<R: Rng + ?Sized>(&self, population: &Population, rng: &mut R) -> usize {
        let total = self.fitness * population.count_a() as f64 + population.count_b() as f64;
        let target = rng.random_range(0.0..total);

        // Cumulative scan over slots
        let mut acc = 0.0;
        for (index, t) in population.individuals().iter().enumerate() {
            acc += self.weight(*t);
            if acc > target {
                return index;
            }
        }
        population.size() - 1
    }
}

impl TransitionRule for FitnessProportional {
    fn sample<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> TransitionOutcome {
        let birth_index = self.sample_birth(population, rng);
        let birth_type = population.individuals()[birth_index];
        let (death_index, death_type) = sample_death(population, rng);

        TransitionOutcome {
            birth_index,
            birth_type,
            death_index,
            death_type,
        }
    }
}

/// Probability that `initial_mutants` mutants of relative fitness `fitness`
/// eventually take over a population of `population_size`.
///
/// `(1 - r^-i) / (1 - r^-N)`, reducing to `i / N` under neutrality.
pub fn fixation_probability(population_size: usize, initial_mutants: usize, fitness: f64) -> f64 {
    let n = population_size as f64;
    let i = initial_mutants as f64;
    if (fitness - 1.0).abs() < 1e-12 {
        return i / n;
    }
    let inv = 1.0 / fitness;
    (1.0 - inv.powf(i)) / (1.0 - inv.powf(n))
}
