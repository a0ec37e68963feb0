//! Birth/death transition rules.
//!
//! - **Mutation-drift**: uniform reproducer, offspring flips type with
//!   probability `M`
//! - **Fitness-proportional**: reproducer weighted by relative fitness `r`,
//!   no mutation
//!
//! Both are exposed through [`SelectionPolicy`] as a configuration choice.

pub mod mutation;
pub mod selection;
pub mod transition;

pub use mutation::MutationDrift;
pub use selection::{fixation_probability, FitnessProportional};
pub use transition::{PolicyKind, SelectionPolicy, TransitionOutcome, TransitionRule};
