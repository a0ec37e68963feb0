//! Base types for population representation.

mod individual;

pub use individual::IndividualType;
