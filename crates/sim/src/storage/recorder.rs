//! Per-run event recording.
//!
//! The recorder captures the initial counts and one [`StepRecord`] per step.
//! Both encodings (snapshot rows and compact events) are derived from the same
//! record, so the choice of encoding can be made at persistence time.

use crate::evolution::TransitionOutcome;
use crate::simulation::{Counts, Population};

/// One recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    /// Step number, starting at 1
    pub generation: usize,
    /// The birth/death event
    pub outcome: TransitionOutcome,
    /// Counts after the step was applied
    pub counts: Counts,
}

/// Ordered, append-only record of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    initial: Counts,
    steps: Vec<StepRecord>,
}

impl History {
    /// Counts before any step.
    pub fn initial(&self) -> Counts {
        self.initial
    }

    /// Counts after the last step (or initial counts for an empty history).
    pub fn final_counts(&self) -> Counts {
        self.steps.last().map_or(self.initial, |s| s.counts)
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Number of steps taken.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `(generation, counts)` starting with generation 0 (the initial state).
    pub fn snapshots(&self) -> impl Iterator<Item = (usize, Counts)> + '_ {
        std::iter::once((0, self.initial))
            .chain(self.steps.iter().map(|s| (s.generation, s.counts)))
    }

    /// Events in the order they happened.
    pub fn events(&self) -> impl Iterator<Item = &TransitionOutcome> + '_ {
        self.steps.iter().map(|s| &s.outcome)
    }
}

/// Accumulates a [`History`] while a run is in progress.
#[derive(Debug, Clone)]
pub struct EventRecorder {
    history: History,
}

impl EventRecorder {
    /// Start recording from the population's current state.
    pub fn new(population: &Population) -> Self {
        Self {
            history: History {
                initial: population.counts(),
                steps: Vec::new(),
            },
        }
    }

    /// Like `new`, reserving room for `capacity` steps.
    pub fn with_capacity(population: &Population, capacity: usize) -> Self {
        let mut recorder = Self::new(population);
        recorder.history.steps.reserve(capacity);
        recorder
    }

    /// Append one step; `population` must already reflect the outcome.
    pub fn record(&mut self, outcome: TransitionOutcome, population: &Population) {
        let generation = self.history.steps.len() + 1;
        self.history.steps.push(StepRecord {
            generation,
            outcome,
            counts: population.counts(),
        });
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn finish(self) -> History {
        self.history
    }
}
