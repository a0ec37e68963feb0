//! Simulation engine, population state, and batch orchestration.
//!
//! - `Population`: the N typed slots of one run.
//! - `Simulation`: drives one run to fixation or the step cap.
//! - `SimulationBuilder`: fluent builder with validation.
//! - `BatchRunner`: runs many independent simulations in parallel and tallies
//!   their outcomes.

pub mod batch;
pub mod builder;
pub mod engine;
pub mod parameters;
pub mod population;

pub use batch::{BatchReport, BatchRunner, FailureStage, RunFailure, RunSummary};
pub use builder::SimulationBuilder;
pub use engine::{RunState, Simulation, SimulationResult, SimulationRun};
pub use parameters::{BatchConfig, ParamRange, SimulationConfig};
pub use population::{Counts, Population};
