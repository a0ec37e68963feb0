//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! validation of every precondition before the first step.

pub use crate::errors::BuilderError;
use crate::evolution::SelectionPolicy;
use crate::simulation::{Simulation, SimulationConfig};

/// Builder for constructing Simulation instances with a fluent API.
///
/// # Examples
///
/// ```
/// use moran_sim::simulation::SimulationBuilder;
///
/// // Classical Moran process
/// let sim = SimulationBuilder::new()
///     .population_size(20)
///     .initial_mutants(3)
///     .fitness_proportional(1.2)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// // Drift with mutation, bounded by a step cap
/// let sim = SimulationBuilder::new()
///     .population_size(4)
///     .initial_mutants(2)
///     .mutation_drift(0.01)
///     .max_steps(10_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    // Required parameters
    population_size: Option<usize>,
    initial_mutants: Option<usize>,
    policy: Option<PolicyChoice>,

    max_steps: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum PolicyChoice {
    MutationDrift(f64),
    FitnessProportional(f64),
    Policy(SelectionPolicy),
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the population size N (required).
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set the number of `A` individuals at generation 0 (required).
    pub fn initial_mutants(mut self, count: usize) -> Self {
        self.initial_mutants = Some(count);
        self
    }

    /// Use the mutation-drift policy with mutation rate M.
    pub fn mutation_drift(mut self, mutation_rate: f64) -> Self {
        self.policy = Some(PolicyChoice::MutationDrift(mutation_rate));
        self
    }

    /// Use the fitness-proportional policy with relative fitness r.
    pub fn fitness_proportional(mut self, fitness: f64) -> Self {
        self.policy = Some(PolicyChoice::FitnessProportional(fitness));
        self
    }

    pub fn policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = Some(PolicyChoice::Policy(policy));
        self
    }

    pub fn max_steps(mut self, cap: usize) -> Self {
        self.max_steps = Some(cap);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and produce the configuration without building the engine.
    pub fn build_config(&self) -> Result<SimulationConfig, BuilderError> {
        let population_size = self
            .population_size
            .ok_or(BuilderError::MissingRequired("population_size"))?;
        let initial_mutants = self
            .initial_mutants
            .ok_or(BuilderError::MissingRequired("initial_mutants"))?;
        let policy = match self.policy.ok_or(BuilderError::MissingRequired("policy"))? {
            PolicyChoice::MutationDrift(rate) => SelectionPolicy::mutation_drift(rate)?,
            PolicyChoice::FitnessProportional(r) => SelectionPolicy::fitness_proportional(r)?,
            PolicyChoice::Policy(policy) => policy,
        };

        Ok(SimulationConfig::new(
            population_size,
            initial_mutants,
            policy,
            self.max_steps,
            self.seed,
        )?)
    }

    pub fn build(self) -> Result<Simulation, BuilderError> {
        Ok(Simulation::new(self.build_config()?)?)
    }
}
