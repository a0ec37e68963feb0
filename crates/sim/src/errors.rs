use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Parameter values that make a simulation or batch impossible to start.
///
/// Raised before any step is taken. These are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionViolation {
    /// Population must hold at least two individuals.
    #[error("Population size must be at least 2 (got {0})")]
    PopulationTooSmall(usize),

    /// Initial mutant count must lie strictly between 0 and N.
    #[error("Initial mutant count {initial} must be strictly between 0 and {population_size}")]
    InvalidInitialMutants {
        initial: usize,
        population_size: usize,
    },

    /// Mutation probability outside [0, 1].
    #[error("Invalid mutation rate: {0} (must be between 0.0 and 1.0)")]
    InvalidMutationRate(f64),

    /// Relative fitness must be positive and finite.
    #[error("Invalid relative fitness: {0} (must be positive and finite)")]
    InvalidFitness(f64),

    /// A step cap of zero would time out before the first step.
    #[error("Step cap must be at least 1")]
    ZeroStepCap,

    /// Range bounds are inverted or admit no valid value.
    #[error("Invalid range for {name}: [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: String,
        max: String,
    },

    /// A batch must contain at least one run.
    #[error("Batch must contain at least one run")]
    NoRuns,
}

/// Errors that can occur during simulation building.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuilderError {
    /// A required parameter is missing
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),
    /// A supplied parameter violates a precondition
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
}

/// Failures writing or reading history artifacts.
///
/// Fatal only to the persistence step of the run that hit it.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures appending to or reading the shared tally store.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Tally store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Tally store lock poisoned")]
    Poisoned,
}

/// Errors that abort a batch before any run is launched.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    #[error(transparent)]
    Tally(#[from] TallyError),
}
