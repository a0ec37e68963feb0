//! Population state for a two-type Moran process.
//!
//! A `Population` is a fixed-size, ordered set of slots, each holding an
//! [`IndividualType`]. Slots keep their index for the whole run and the
//! population is never resized. The mutant count is cached so that
//! `count_a`/`count_b` are O(1) after every `replace`.

use crate::base::IndividualType;
use crate::errors::PreconditionViolation;

/// Snapshot of the two type counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub a: usize,
    pub b: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.a + self.b
    }
}

/// A population of `N` individuals of type `A` or `B`.
#[derive(Debug, Clone)]
pub struct Population {
    /// The individuals, indexed by slot
    individuals: Vec<IndividualType>,
    /// Cached number of `A` individuals
    count_a: usize,
}

impl Population {
    /// Create a population of `size` slots with `initial_mutants` of them set
    /// to `A` and the rest to `B`.
    ///
    /// Mutants occupy the lowest indices. Placement has no effect on the
    /// dynamics because every sampling step is index-agnostic.
    pub fn new(size: usize, initial_mutants: usize) -> Result<Self, PreconditionViolation> {
        validate_initial_state(size, initial_mutants)?;

        let mut individuals = vec![IndividualType::B; size];
        for slot in individuals.iter_mut().take(initial_mutants) {
            *slot = IndividualType::A;
        }

        Ok(Self {
            individuals,
            count_a: initial_mutants,
        })
    }

    /// Get the number of slots.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Number of mutants (`A`).
    pub fn count_a(&self) -> usize {
        self.count_a
    }

    /// Number of residents (`B`).
    pub fn count_b(&self) -> usize {
        self.individuals.len() - self.count_a
    }

    pub fn counts(&self) -> Counts {
        Counts {
            a: self.count_a(),
            b: self.count_b(),
        }
    }

    /// Get all individuals as a slice.
    pub fn individuals(&self) -> &[IndividualType] {
        &self.individuals
    }

    /// Get the type at a slot.
    pub fn get(&self, index: usize) -> Option<IndividualType> {
        self.individuals.get(index).copied()
    }

    /// Overwrite one slot, returning the type it held before.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Transition policies only produce
    /// indices in `[0, N)`.
    pub fn replace(&mut self, index: usize, new_type: IndividualType) -> IndividualType {
        let old = std::mem::replace(&mut self.individuals[index], new_type);
        match (old, new_type) {
            (IndividualType::B, IndividualType::A) => self.count_a += 1,
            (IndividualType::A, IndividualType::B) => self.count_a -= 1,
            _ => {}
        }
        old
    }

    /// The type holding every slot, if the population has fixed.
    pub fn fixed_type(&self) -> Option<IndividualType> {
        if self.count_a == self.individuals.len() {
            Some(IndividualType::A)
        } else if self.count_a == 0 {
            Some(IndividualType::B)
        } else {
            None
        }
    }
}

/// Check `0 < initial_mutants < size` and `size >= 2`.
pub fn validate_initial_state(
    size: usize,
    initial_mutants: usize,
) -> Result<(), PreconditionViolation> {
    if size < 2 {
        return Err(PreconditionViolation::PopulationTooSmall(size));
    }
    if initial_mutants == 0 || initial_mutants >= size {
        return Err(PreconditionViolation::InvalidInitialMutants {
            initial: initial_mutants,
            population_size: size,
        });
    }
    Ok(())
}
