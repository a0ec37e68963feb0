//! Shared default values for command-line options.
//! These match `BatchConfig::default()` except for initial mutants: a
//! flag-built batch without `-i` draws each run's count uniformly from
//! `[1, N - 1]`, while the default config file fixes it at `INITIAL_MUTANTS`.

pub const CONFIG_FILE: &str = "moran_batch.json";
pub const OUTPUT_DIR: &str = "moran_process_output";
pub const TALLY_FILE: &str = "results.txt";
pub const CONCAT_FILE: &str = "all_generations.csv";

pub const POPULATION_SIZE: usize = 20;
pub const INITIAL_MUTANTS: usize = 3;
pub const RUNS: usize = 500;
pub const MAX_STEPS: usize = 100_000;

// Policy parameters
pub const MUTATION_RATE: f64 = 0.01;
pub const FITNESS: f64 = 1.2;
