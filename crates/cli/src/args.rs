use clap::Args;
use std::path::PathBuf;

use moran_sim::evolution::PolicyKind;
use moran_sim::simulation::ParamRange;
use moran_sim::storage::{CollisionPolicy, HistoryFormat};

use crate::defaults;

/// Where run histories go.
#[derive(Args, Debug, Clone)]
pub struct RecordingArgs {
    /// Directory for per-run history files
    #[arg(short, long, default_value = defaults::OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// History row format (snapshot-text, snapshot-csv, event-csv-with-counts, event-csv-bare)
    #[arg(short, long, default_value = "event-csv-with-counts")]
    pub format: HistoryFormat,

    /// What to do when a history file name is taken (auto-increment, overwrite)
    #[arg(long, default_value = "auto-increment")]
    pub collision: CollisionPolicy,

    /// Do not write history files
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Population size N
    #[arg(short = 'n', long, default_value_t = defaults::POPULATION_SIZE)]
    pub population_size: usize,

    /// Initial number of mutants (type A)
    #[arg(short = 'i', long, default_value_t = defaults::INITIAL_MUTANTS)]
    pub initial_mutants: usize,

    /// Selection policy (mutation-drift, fitness-proportional)
    #[arg(short, long, default_value = "fitness-proportional")]
    pub policy: PolicyKind,

    /// Mutation rate M or relative fitness r
    ///
    /// Defaults to 0.01 for mutation-drift and 1.2 for fitness-proportional.
    #[arg(short = 'r', long)]
    pub parameter: Option<f64>,

    /// Step cap; a run still mixed after this many steps is a timeout
    #[arg(long, default_value_t = defaults::MAX_STEPS)]
    pub max_steps: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run number used to name the history file ("Generation <n>")
    #[arg(long, default_value_t = 1)]
    pub run_number: usize,

    #[command(flatten)]
    pub recording: RecordingArgs,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Load the whole batch from a JSON config (see `moran init`); other flags are ignored
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of runs K
    #[arg(short = 'k', long, default_value_t = defaults::RUNS)]
    pub runs: usize,

    /// Population size, a value or a range like 10..50
    #[arg(short = 'n', long, default_value = "20")]
    pub population_size: ParamRange<usize>,

    /// Initial mutants, a value or a range (default: uniform on 1..N-1)
    #[arg(short = 'i', long)]
    pub initial_mutants: Option<ParamRange<usize>>,

    /// Selection policy (mutation-drift, fitness-proportional)
    #[arg(short, long, default_value = "fitness-proportional")]
    pub policy: PolicyKind,

    /// Mutation rate M or relative fitness r, a value or a range like 1.0..1.5
    ///
    /// Defaults to 0.01 for mutation-drift and 1.2 for fitness-proportional.
    #[arg(short = 'r', long)]
    pub parameter: Option<ParamRange<f64>>,

    /// Step cap applied to every run
    #[arg(long, default_value_t = defaults::MAX_STEPS)]
    pub max_steps: usize,

    /// Master seed; per-run seeds are derived from it
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tally file, one outcome line per run
    #[arg(long, default_value = defaults::TALLY_FILE)]
    pub tally: PathBuf,

    /// Append to an existing tally file instead of truncating it
    #[arg(long)]
    pub append: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub recording: RecordingArgs,
}

/// Default policy parameter when none is given.
pub fn default_parameter(policy: PolicyKind) -> f64 {
    match policy {
        PolicyKind::MutationDrift => defaults::MUTATION_RATE,
        PolicyKind::FitnessProportional => defaults::FITNESS,
    }
}
