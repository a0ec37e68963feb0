//! Simulation parameters and configuration.
//!
//! [`SimulationConfig`] fixes the parameters of one run. [`BatchConfig`]
//! describes a whole orchestrated batch, where population size, initial
//! mutant count, and the policy parameter may be drawn per run from
//! configured ranges. Both serialize to JSON so a batch can be reproduced
//! from a file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::distr::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::PreconditionViolation;
use crate::evolution::{fixation_probability, PolicyKind, SelectionPolicy};
use crate::simulation::population::validate_initial_state;
use crate::storage::{CollisionPolicy, HistoryFormat, RecordingConfig};

/// Parameters of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of individuals N
    pub population_size: usize,
    /// Number of `A` individuals at generation 0
    pub initial_mutants: usize,
    /// Birth rule
    pub policy: SelectionPolicy,
    /// Step cap; reaching it while both types remain is a timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    /// Optional RNG seed for reproducibility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Create a validated configuration.
    pub fn new(
        population_size: usize,
        initial_mutants: usize,
        policy: SelectionPolicy,
        max_steps: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Self, PreconditionViolation> {
        let config = Self {
            population_size,
            initial_mutants,
            policy,
            max_steps,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every precondition of a run.
    pub fn validate(&self) -> Result<(), PreconditionViolation> {
        validate_initial_state(self.population_size, self.initial_mutants)?;
        self.policy.validate()?;
        if self.max_steps == Some(0) {
            return Err(PreconditionViolation::ZeroStepCap);
        }
        Ok(())
    }
}

/// Inclusive range `[min, max]` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd + fmt::Display> ParamRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// A range holding one value.
    pub fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Reject inverted (or NaN) bounds.
    pub fn validate(&self, name: &'static str) -> Result<(), PreconditionViolation> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(self.invalid(name))
        }
    }

    fn invalid(&self, name: &'static str) -> PreconditionViolation {
        PreconditionViolation::InvalidRange {
            name,
            min: self.min.to_string(),
            max: self.max.to_string(),
        }
    }
}

impl<T: Copy + PartialOrd + SampleUniform> ParamRange<T> {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.random_range(self.min..=self.max)
    }
}

impl<T: fmt::Display + PartialEq> fmt::Display for ParamRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "[{}, {}]", self.min, self.max)
        }
    }
}

/// Parses `"<value>"` or `"<min>..<max>"`.
impl<T> FromStr for ParamRange<T>
where
    T: FromStr + Copy,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<T>()
                .map_err(|e| format!("Invalid range bound '{part}': {e}"))
        };
        match s.split_once("..") {
            Some((min, max)) => Ok(Self {
                min: parse(min)?,
                max: parse(max)?,
            }),
            None => {
                let value = parse(s)?;
                Ok(Self {
                    min: value,
                    max: value,
                })
            }
        }
    }
}

/// Configuration of an orchestrated batch of independent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of runs K
    pub runs: usize,
    /// Population size N, drawn per run
    pub population_size: ParamRange<usize>,
    /// Initial mutant count, drawn per run; `None` draws uniformly from
    /// `[1, N - 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_mutants: Option<ParamRange<usize>>,
    /// Birth rule
    pub policy: PolicyKind,
    /// Mutation rate M or relative fitness r, drawn per run
    pub parameter: ParamRange<f64>,
    /// Step cap applied to every run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
    /// Master seed from which per-run seeds are derived
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// History persistence
    pub recording: RecordingConfig,
    /// Shared tally store
    pub tally_path: PathBuf,
    /// Keep existing tally lines instead of truncating
    #[serde(default)]
    pub append_tally: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 500,
            population_size: ParamRange::fixed(20),
            initial_mutants: Some(ParamRange::fixed(3)),
            policy: PolicyKind::FitnessProportional,
            parameter: ParamRange::fixed(1.2),
            max_steps: Some(100_000),
            seed: None,
            recording: RecordingConfig::in_dir(
                "moran_process_output",
                HistoryFormat::EventCsvWithCounts,
                CollisionPolicy::AutoIncrement,
            ),
            tally_path: PathBuf::from("results.txt"),
            append_tally: false,
        }
    }
}

impl BatchConfig {
    /// Check that every value the batch can draw is a valid run.
    pub fn validate(&self) -> Result<(), PreconditionViolation> {
        if self.runs == 0 {
            return Err(PreconditionViolation::NoRuns);
        }

        self.population_size.validate("population size")?;
        if self.population_size.min < 2 {
            return Err(PreconditionViolation::PopulationTooSmall(self.population_size.min));
        }

        if let Some(mutants) = &self.initial_mutants {
            mutants.validate("initial mutants")?;
            // Every drawn count must fit every drawn population size
            if mutants.min == 0 || mutants.max >= self.population_size.min {
                return Err(mutants.invalid("initial mutants"));
            }
        }

        self.parameter.validate(self.policy.parameter_name())?;
        self.policy.with_parameter(self.parameter.min)?;
        self.policy.with_parameter(self.parameter.max)?;

        if self.max_steps == Some(0) {
            return Err(PreconditionViolation::ZeroStepCap);
        }
        Ok(())
    }

    /// Draw the parameters of one run.
    pub fn sample_run<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SimulationConfig, PreconditionViolation> {
        let population_size = self.population_size.sample(rng);
        let initial_mutants = match &self.initial_mutants {
            Some(range) => range.sample(rng),
            None => rng.random_range(1..population_size),
        };
        let policy = self.policy.with_parameter(self.parameter.sample(rng))?;
        SimulationConfig::new(population_size, initial_mutants, policy, self.max_steps, None)
    }

    /// Classical fixation probability of `A` when every run shares the same
    /// N, initial count, and fitness under the fitness-proportional policy.
    pub fn theoretical_fixation(&self) -> Option<f64> {
        let mutants = self.initial_mutants.filter(ParamRange::is_fixed)?;
        if self.policy != PolicyKind::FitnessProportional
            || !self.population_size.is_fixed()
            || !self.parameter.is_fixed()
        {
            return None;
        }
        Some(fixation_probability(
            self.population_size.min,
            mutants.min,
            self.parameter.min,
        ))
    }
}
