//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use moran_sim::prelude::*;
//!
//! let run = SimulationBuilder::new()
//!     .population_size(20)
//!     .initial_mutants(3)
//!     .fitness_proportional(1.2)
//!     .seed(7)
//!     .build()
//!     .unwrap()
//!     .run();
//! assert!(run.result.is_fixation());
//! ```

pub use crate::base::IndividualType;
pub use crate::errors;
pub use crate::evolution::{PolicyKind, SelectionPolicy, TransitionOutcome, TransitionRule};
pub use crate::simulation::{
    BatchConfig, BatchRunner, ParamRange, Population, Simulation, SimulationBuilder,
    SimulationConfig, SimulationResult,
};
pub use crate::storage::{CollisionPolicy, DirectorySink, HistoryFormat, HistorySink};
