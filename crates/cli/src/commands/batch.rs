use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use moran_sim::simulation::{BatchConfig, BatchRunner, ParamRange};
use moran_sim::storage::RecordingConfig;
use std::fs;
use std::path::Path;

use crate::args::{default_parameter, BatchArgs};
use crate::printing::{print_batch_parameters, print_batch_report, print_header};

pub fn run_batch(args: &BatchArgs) -> Result<()> {
    print_header("Running Batch");

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => config_from_args(args),
    };
    print_batch_parameters(&config);

    let total = config.runs as u64;
    let theoretical = config.theoretical_fixation();
    let mut runner = BatchRunner::new(config).context("Invalid batch configuration")?;

    let pb = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        let ticker = pb.clone();
        runner = runner.on_run_complete(move |_| ticker.inc(1));
        Some(pb)
    };

    println!("Running {total} simulations...");
    let report = runner.run().context("Batch failed")?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    print_batch_report(&report, theoretical);
    if let Some(dir) = &runner.config().recording.output_dir {
        println!(
            "\n💡 Use 'moran concat -i {}' to combine the histories",
            dir.display()
        );
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<BatchConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse batch configuration {}", path.display()))
}

fn config_from_args(args: &BatchArgs) -> BatchConfig {
    let rec = &args.recording;
    let recording = if rec.no_save {
        RecordingConfig::disabled()
    } else {
        RecordingConfig::in_dir(&rec.output_dir, rec.format, rec.collision)
    };

    BatchConfig {
        runs: args.runs,
        population_size: args.population_size,
        initial_mutants: args.initial_mutants,
        policy: args.policy,
        parameter: args
            .parameter
            .unwrap_or_else(|| ParamRange::fixed(default_parameter(args.policy))),
        max_steps: Some(args.max_steps),
        seed: args.seed,
        recording,
        tally_path: args.tally.clone(),
        append_tally: args.append,
    }
}
