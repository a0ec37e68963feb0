//! # Moran Process Simulator
//!
//! The `moran-sim` crate simulates the two-type Moran birth-death process.
//! It includes modules for the population state, the transition policies
//! (mutation-drift and fitness-proportional), the run engine, history
//! recording and persistence, and concurrent batch orchestration with a
//! shared outcome tally.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;
pub mod storage;

pub use base::IndividualType;
