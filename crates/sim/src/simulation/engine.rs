//! Simulation engine for the Moran process.
//!
//! A [`Simulation`] owns its population, policy, recorder, and RNG. Each tick
//! samples one birth/death step, applies it, records it, and re-evaluates
//! termination until the population fixes or the step cap is reached.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use crate::base::IndividualType;
use crate::errors::PreconditionViolation;
use crate::evolution::{SelectionPolicy, TransitionOutcome, TransitionRule};
use crate::simulation::{Population, SimulationConfig};
use crate::storage::{EventRecorder, History};

/// Terminal classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationResult {
    /// Every slot holds `A`
    FixedA,
    /// Every slot holds `B`
    FixedB,
    /// Step cap reached while both types remain
    Timeout,
}

impl SimulationResult {
    pub const ALL: [SimulationResult; 3] = [Self::FixedA, Self::FixedB, Self::Timeout];

    /// Tally line for this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedA => "A dominated",
            Self::FixedB => "B dominated",
            Self::Timeout => "TIMEOUT: No fixation reached",
        }
    }

    pub fn is_fixation(&self) -> bool {
        !matches!(self, Self::Timeout)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|result| result.as_str() == s)
            .ok_or_else(|| format!("Unknown simulation result: {s}"))
    }
}

/// Where the chain currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminal(SimulationResult),
}

/// A completed run.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub config: SimulationConfig,
    pub result: SimulationResult,
    pub history: History,
}

impl SimulationRun {
    /// Number of steps taken.
    pub fn steps(&self) -> usize {
        self.history.len()
    }
}

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    /// Current population
    population: Population,
    /// Birth rule
    policy: SelectionPolicy,
    /// Step history since generation 0
    recorder: EventRecorder,
    /// Configuration the run was built from
    config: SimulationConfig,
    /// Random number generator (using Xoshiro256++ for better performance)
    rng: Xoshiro256PlusPlus,
}

impl Simulation {
    /// Create a simulation, seeding its RNG from `config.seed` or from entropy.
    pub fn new(config: SimulationConfig) -> Result<Self, PreconditionViolation> {
        let rng = if let Some(seed) = config.seed {
            Xoshiro256PlusPlus::seed_from_u64(seed)
        } else {
            Xoshiro256PlusPlus::from_seed(rand::rng().random())
        };
        Self::with_rng(config, rng)
    }

    /// Create a simulation driven by an explicit RNG stream.
    pub fn with_rng(
        config: SimulationConfig,
        rng: Xoshiro256PlusPlus,
    ) -> Result<Self, PreconditionViolation> {
        config.validate()?;
        let population = Population::new(config.population_size, config.initial_mutants)?;
        let recorder = EventRecorder::new(&population);

        Ok(Self {
            population,
            policy: config.policy,
            recorder,
            config,
            rng,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Steps taken so far.
    pub fn steps(&self) -> usize {
        self.recorder.history().len()
    }

    pub fn history(&self) -> &History {
        self.recorder.history()
    }

    /// Classify the current state. Fixation is checked before the step cap,
    /// so a run that fixes on its last allowed step is not a timeout.
    pub fn state(&self) -> RunState {
        match self.population.fixed_type() {
            Some(IndividualType::A) => RunState::Terminal(SimulationResult::FixedA),
            Some(IndividualType::B) => RunState::Terminal(SimulationResult::FixedB),
            None if self.config.max_steps.is_some_and(|cap| self.steps() >= cap) => {
                RunState::Terminal(SimulationResult::Timeout)
            }
            None => RunState::Running,
        }
    }

    /// Advance one step. Returns `None` once the run is terminal.
    pub fn step(&mut self) -> Option<TransitionOutcome> {
        if self.state() != RunState::Running {
            return None;
        }
        let outcome = self.policy.step(&mut self.population, &mut self.rng);
        self.recorder.record(outcome, &self.population);
        Some(outcome)
    }

    /// Run until a terminal state and hand back the history.
    pub fn run(mut self) -> SimulationRun {
        let result = loop {
            match self.state() {
                RunState::Terminal(result) => break result,
                RunState::Running => {
                    self.step();
                }
            }
        };

        debug!(
            population_size = self.config.population_size,
            initial_mutants = self.config.initial_mutants,
            policy = %self.policy,
            steps = self.steps(),
            %result,
            "Run finished"
        );

        SimulationRun {
            config: self.config,
            result,
            history: self.recorder.finish(),
        }
    }
}
