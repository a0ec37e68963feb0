mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use args::{BatchArgs, RunArgs};
use commands::{batch, concat, init, run, summarize};
use moran_sim::storage::HistoryFormat;

/// Moran: a two-type birth-death fixation simulator
///
/// Simulates a finite population of mutants (A) and residents (B) under
/// mutation-drift or fitness-proportional reproduction, and tallies which type
/// takes over across many independent runs.
#[derive(Parser, Debug)]
#[command(name = "moran")]
#[command(
    author,
    version,
    about = "Simulates fixation in the Moran birth-death process",
    long_about = None
)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default batch configuration file.
    ///
    /// Edit it and pass it to `moran batch --config`.
    Init {
        /// Output config path
        #[arg(short, long, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run a single simulation and save its history.
    Run(Box<RunArgs>),

    /// Run many independent simulations in parallel and tally the outcomes.
    Batch(Box<BatchArgs>),

    /// Count the outcomes recorded in a tally file.
    Summarize {
        /// Tally file
        #[arg(default_value = defaults::TALLY_FILE)]
        tally: PathBuf,
    },

    /// Combine saved histories into one file tagged by source path.
    Concat {
        /// Directory holding the history files (searched recursively)
        #[arg(short, long, default_value = defaults::OUTPUT_DIR)]
        input: PathBuf,

        /// Combined output file (default: <input>/all_generations.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Row format of the histories
        #[arg(short, long, default_value = "event-csv-with-counts")]
        format: HistoryFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init { output, force } => {
            init::init_config(&output, force)?;
        }
        Commands::Run(args) => {
            run::run_simulation(&args)?;
        }
        Commands::Batch(args) => {
            batch::run_batch(&args)?;
        }
        Commands::Summarize { tally } => {
            summarize::summarize_tally(&tally)?;
        }
        Commands::Concat {
            input,
            output,
            format,
        } => {
            concat::concat_histories(&input, output.as_deref(), format)?;
        }
    }

    Ok(())
}
