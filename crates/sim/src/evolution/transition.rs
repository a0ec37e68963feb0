//! One birth/death step of the Moran process.
//!
//! Every policy produces a [`TransitionOutcome`]: a birth index and the type of
//! the offspring, and a death index with the type that dies there. Applying
//! the outcome overwrites the death slot with the offspring type. The birth and
//! death indices are drawn independently, so they may coincide; such a step
//! still counts as an event.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::IndividualType;
use crate::errors::PreconditionViolation;
use crate::evolution::{FitnessProportional, MutationDrift};
use crate::simulation::Population;

/// Record of a single birth/death step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// Slot of the reproducing individual
    pub birth_index: usize,
    /// Type of the offspring (after any mutation)
    pub birth_type: IndividualType,
    /// Slot that is overwritten
    pub death_index: usize,
    /// Type held at `death_index` before replacement
    pub death_type: IndividualType,
}

impl TransitionOutcome {
    /// Overwrite the death slot with the offspring type.
    pub fn apply(&self, population: &mut Population) {
        population.replace(self.death_index, self.birth_type);
    }
}

/// Compact event encoding: `<birthIdx><birthType>:<deathIdx><deathType>`.
impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.birth_index, self.birth_type, self.death_index, self.death_type
        )
    }
}

/// A rule that samples one birth/death step from the current population.
pub trait TransitionRule {
    /// Sample a step without modifying the population.
    fn sample<R: Rng + ?Sized>(&self, population: &Population, rng: &mut R) -> TransitionOutcome;

    /// Sample a step and apply it in place.
    fn step<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        rng: &mut R,
    ) -> TransitionOutcome {
        let outcome = self.sample(population, rng);
        outcome.apply(population);
        outcome
    }
}

/// Draw the dying slot uniformly over all `N` slots.
pub(crate) fn sample_death<R: Rng + ?Sized>(
    population: &Population,
    rng: &mut R,
) -> (usize, IndividualType) {
    let index = rng.random_range(0..population.size());
    let death_type = population.individuals()[index];
    (index, death_type)
}

/// The two interchangeable birth rules.
///
/// The drift model explores mutation-driven reintroduction of either type; the
/// fitness-proportional model is the classical Moran process with pure
/// selection and no mutation. Both emit one [`TransitionOutcome`] per step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Uniform reproducer; offspring flips type with probability `mutation_rate`.
    MutationDrift { mutation_rate: f64 },
    /// Reproducer weighted by fitness (`fitness` for A, 1 for B); no mutation.
    FitnessProportional { fitness: f64 },
}

impl SelectionPolicy {
    /// Validated mutation-drift policy.
    pub fn mutation_drift(mutation_rate: f64) -> Result<Self, PreconditionViolation> {
        MutationDrift::new(mutation_rate).map(Into::into)
    }

    /// Validated fitness-proportional policy.
    pub fn fitness_proportional(fitness: f64) -> Result<Self, PreconditionViolation> {
        FitnessProportional::new(fitness).map(Into::into)
    }

    /// Re-check parameters (for values that arrived through deserialization).
    pub fn validate(&self) -> Result<(), PreconditionViolation> {
        match *self {
            Self::MutationDrift { mutation_rate } => MutationDrift::new(mutation_rate).map(drop),
            Self::FitnessProportional { fitness } => FitnessProportional::new(fitness).map(drop),
        }
    }

    /// Kind of policy without its parameter.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::MutationDrift { .. } => PolicyKind::MutationDrift,
            Self::FitnessProportional { .. } => PolicyKind::FitnessProportional,
        }
    }

    /// The policy's single parameter (M or r).
    pub fn parameter(&self) -> f64 {
        match *self {
            Self::MutationDrift { mutation_rate } => mutation_rate,
            Self::FitnessProportional { fitness } => fitness,
        }
    }
}

impl From<MutationDrift> for SelectionPolicy {
    fn from(model: MutationDrift) -> Self {
        Self::MutationDrift {
            mutation_rate: model.mutation_rate(),
        }
    }
}

impl From<FitnessProportional> for SelectionPolicy {
    fn from(model: FitnessProportional) -> Self {
        Self::FitnessProportional {
            fitness: model.fitness(),
        }
    }
}

impl TransitionRule for SelectionPolicy {
    fn sample<R: Rng + ?Sized>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> TransitionOutcome {
        match *self {
            Self::MutationDrift { mutation_rate } => {
                MutationDrift::new_unchecked(mutation_rate).sample(population, rng)
            }
            Self::FitnessProportional { fitness } => {
                FitnessProportional::new_unchecked(fitness).sample(population, rng)
            }
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MutationDrift { mutation_rate } => {
                write!(f, "mutation-drift (M = {mutation_rate})")
            }
            Self::FitnessProportional { fitness } => {
                write!(f, "fitness-proportional (r = {fitness})")
            }
        }
    }
}

/// Policy selector used where the parameter is sampled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    MutationDrift,
    FitnessProportional,
}

impl PolicyKind {
    /// Build a validated policy with the given parameter.
    pub fn with_parameter(self, parameter: f64) -> Result<SelectionPolicy, PreconditionViolation> {
        match self {
            Self::MutationDrift => SelectionPolicy::mutation_drift(parameter),
            Self::FitnessProportional => SelectionPolicy::fitness_proportional(parameter),
        }
    }

    /// Name of the parameter this policy takes.
    pub fn parameter_name(&self) -> &'static str {
        match self {
            Self::MutationDrift => "mutation rate",
            Self::FitnessProportional => "relative fitness",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MutationDrift => write!(f, "mutation-drift"),
            Self::FitnessProportional => write!(f, "fitness-proportional"),
        }
    }
}

impl std::str::FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mutation-drift" | "drift" => Ok(Self::MutationDrift),
            "fitness-proportional" | "moran" => Ok(Self::FitnessProportional),
            _ => Err(format!(
                "Unknown selection policy: {s}. Available: mutation-drift, fitness-proportional"
            )),
        }
    }
}
