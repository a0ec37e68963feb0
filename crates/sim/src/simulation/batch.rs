//! Concurrent orchestration of independent runs.
//!
//! A [`BatchRunner`] launches K runs on the rayon pool. Each run owns its
//! population, history, and RNG stream; per-run seeds are drawn from a master
//! RNG before the parallel section. The only shared mutable state is the
//! [`TallyStore`], whose appends are serialized by its own mutex. Persistence
//! and tally failures are recorded against the failing run and never stop its
//! siblings. Once every run has joined, the store is scanned to produce the
//! final [`Tally`].

use std::fmt;
use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::errors::BatchError;
use crate::evolution::SelectionPolicy;
use crate::simulation::{BatchConfig, Simulation, SimulationResult};
use crate::storage::{HistorySink, Tally, TallyStore};

/// Outcome of one run in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// 1-based run number, also the base of the history name
    pub run_number: usize,
    pub population_size: usize,
    pub initial_mutants: usize,
    pub policy: SelectionPolicy,
    /// Seed that reproduces this run on its own
    pub seed: u64,
    pub steps: usize,
    pub result: SimulationResult,
    /// Name the history was stored under, if it was persisted
    pub artifact: Option<String>,
}

/// Stage at which a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Setup,
    Persist,
    Tally,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Persist => "persist",
            Self::Tally => "tally",
        };
        f.write_str(s)
    }
}

/// A reported, non-fatal per-run failure.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    pub run_number: usize,
    pub stage: FailureStage,
    pub message: String,
}

/// Everything a batch produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Completed runs in run-number order
    pub runs: Vec<RunSummary>,
    pub failures: Vec<RunFailure>,
    /// Counts scanned from the tally store after the join
    pub tally: Tally,
    pub tally_path: PathBuf,
}

impl BatchReport {
    /// Fraction of tallied runs with outcome `result`.
    pub fn fraction(&self, result: SimulationResult) -> f64 {
        self.tally.fraction(result)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

type RunObserver = Box<dyn Fn(&RunSummary) + Send + Sync>;

/// Runs a batch described by a [`BatchConfig`].
pub struct BatchRunner {
    config: BatchConfig,
    sink: Option<Box<dyn HistorySink>>,
    observer: Option<RunObserver>,
}

impl fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl BatchRunner {
    /// Validate `config` and prepare the sink it describes.
    pub fn new(config: BatchConfig) -> Result<Self, BatchError> {
        config.validate()?;
        let sink = config
            .recording
            .sink()
            .map(|sink| Box::new(sink) as Box<dyn HistorySink>);
        Ok(Self {
            config,
            sink,
            observer: None,
        })
    }

    /// Replace the history sink.
    pub fn with_sink(mut self, sink: impl HistorySink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Skip history persistence.
    pub fn without_sink(mut self) -> Self {
        self.sink = None;
        self
    }

    /// Call `observer` from the worker thread after each completed run.
    pub fn on_run_complete(
        mut self,
        observer: impl Fn(&RunSummary) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Open the configured tally store, then [`run_with_store`](Self::run_with_store).
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        let config = &self.config;
        let store = if config.append_tally {
            TallyStore::open_append(&config.tally_path)?
        } else {
            TallyStore::create(&config.tally_path)?
        };
        self.run_with_store(&store)
    }

    /// Launch every run, wait for all of them, then scan `store`.
    pub fn run_with_store(&self, store: &TallyStore) -> Result<BatchReport, BatchError> {
        let config = &self.config;
        let mut master = if let Some(seed) = config.seed {
            Xoshiro256PlusPlus::seed_from_u64(seed)
        } else {
            Xoshiro256PlusPlus::from_seed(rand::rng().random())
        };
        let seeds: Vec<u64> = (0..config.runs).map(|_| master.random()).collect();

        info!(
            runs = config.runs,
            policy = %config.policy,
            population_size = %config.population_size,
            parameter = %config.parameter,
            tally = %store.path().display(),
            "Starting batch"
        );

        let outcomes: Vec<(Option<RunSummary>, Vec<RunFailure>)> = seeds
            .par_iter()
            .enumerate()
            .map(|(k, &seed)| self.execute(k + 1, seed, store))
            .collect();

        let mut runs = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (summary, run_failures) in outcomes {
            runs.extend(summary);
            failures.extend(run_failures);
        }

        let tally = store.summarize()?;
        info!(
            completed = runs.len(),
            failures = failures.len(),
            fixed_a = tally.fixed_a,
            fixed_b = tally.fixed_b,
            timeout = tally.timeout,
            "Batch finished"
        );

        Ok(BatchReport {
            runs,
            failures,
            tally,
            tally_path: store.path().to_path_buf(),
        })
    }

    /// One run: draw parameters, simulate, persist, append to the tally.
    fn execute(
        &self,
        run_number: usize,
        seed: u64,
        store: &TallyStore,
    ) -> (Option<RunSummary>, Vec<RunFailure>) {
        let mut failures = Vec::new();

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let sim = self
            .config
            .sample_run(&mut rng)
            .and_then(|mut sim_config| {
                sim_config.seed = Some(seed);
                Simulation::with_rng(sim_config, rng)
            });
        let sim = match sim {
            Ok(sim) => sim,
            Err(e) => {
                report_failure(&mut failures, run_number, FailureStage::Setup, e.to_string());
                return (None, failures);
            }
        };

        let run = sim.run();

        let artifact = match &self.sink {
            Some(sink) => match sink.persist(run_number, &run.history) {
                Ok(name) => Some(name),
                Err(e) => {
                    report_failure(&mut failures, run_number, FailureStage::Persist, e.to_string());
                    None
                }
            },
            None => None,
        };

        if let Err(e) = store.append(run.result) {
            report_failure(&mut failures, run_number, FailureStage::Tally, e.to_string());
        }

        let summary = RunSummary {
            run_number,
            population_size: run.config.population_size,
            initial_mutants: run.config.initial_mutants,
            policy: run.config.policy,
            seed,
            steps: run.steps(),
            result: run.result,
            artifact,
        };
        if let Some(observer) = &self.observer {
            observer(&summary);
        }
        (Some(summary), failures)
    }
}

fn report_failure(
    failures: &mut Vec<RunFailure>,
    run_number: usize,
    stage: FailureStage,
    message: String,
) {
    warn!(run = run_number, %stage, "{message}");
    failures.push(RunFailure {
        run_number,
        stage,
        message,
    });
}
