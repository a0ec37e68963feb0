use std::path::Path;

use moran_sim::simulation::{
    BatchConfig, BatchReport, SimulationConfig, SimulationResult, SimulationRun,
};
use moran_sim::storage::{RecordingConfig, Tally};

pub fn print_header(title: &str) {
    println!("🧬 Moran - {title}");
    println!("============================================\n");
}

pub fn print_run_parameters(config: &SimulationConfig) {
    println!("📋 Run Configuration");
    println!("  • Population Size: {} [-n, --population-size]", config.population_size);
    println!("  • Initial Mutants: {} [-i, --initial-mutants]", config.initial_mutants);
    let kind = config.policy.kind();
    println!("  • Policy: {kind} [-p, --policy]");
    println!(
        "  • {}: {} [-r, --parameter]",
        capitalize(kind.parameter_name()),
        config.policy.parameter()
    );
    print_step_cap(config.max_steps);
    print_seed(config.seed);
    println!();
}

pub fn print_batch_parameters(config: &BatchConfig) {
    println!("📋 Batch Configuration");
    println!("  • Runs: {} [-k, --runs]", config.runs);
    println!("  • Population Size: {} [-n, --population-size]", config.population_size);
    match &config.initial_mutants {
        Some(range) => println!("  • Initial Mutants: {range} [-i, --initial-mutants]"),
        None => println!("  • Initial Mutants: uniform on [1, N-1] [-i, --initial-mutants]"),
    }
    println!("  • Policy: {} [-p, --policy]", config.policy);
    println!(
        "  • {}: {} [-r, --parameter]",
        capitalize(config.policy.parameter_name()),
        config.parameter
    );
    print_step_cap(config.max_steps);
    print_seed(config.seed);

    println!("\n💾 Output");
    print_recording(&config.recording);
    let mode = if config.append_tally { "append" } else { "truncate" };
    println!("  • Tally: {} ({mode})", config.tally_path.display());
    println!();
}

pub fn print_recording(recording: &RecordingConfig) {
    match &recording.output_dir {
        Some(dir) => {
            println!("  • Histories: {} [-o, --output-dir]", dir.display());
            println!("  • Format: {} [-f, --format]", recording.format);
            println!("  • Name Collisions: {} [--collision]", recording.collision);
        }
        None => println!("  • Histories: not saved [--no-save]"),
    }
}

pub fn print_run_result(run: &SimulationRun, artifact: Option<&Path>) {
    println!("✓ Simulation complete!");
    println!("  Result: {}", run.result);
    println!("  Steps: {}", run.steps());
    let last = run.history.final_counts();
    println!("  Final counts: A={} B={}", last.a, last.b);
    if let Some(path) = artifact {
        println!("  Saved to: {}", path.display());
    }
}

pub fn print_batch_report(report: &BatchReport, theoretical: Option<f64>) {
    println!("\n✓ Batch complete!");
    println!("  Completed runs: {}", report.runs.len());
    if !report.failures.is_empty() {
        println!("  ⚠️  Failed steps: {}", report.failures.len());
        for failure in &report.failures {
            println!(
                "    - Run {} ({}): {}",
                failure.run_number, failure.stage, failure.message
            );
        }
    }
    println!();
    print_tally(&report.tally, &report.tally_path);

    if let Some(p) = theoretical {
        println!(
            "\n📐 Theoretical A fixation probability: {p:.4} (empirical {:.4})",
            report.fraction(SimulationResult::FixedA)
        );
    }
}

pub fn print_tally(tally: &Tally, path: &Path) {
    println!("📊 Outcome Tally ({})", path.display());
    for result in SimulationResult::ALL {
        println!(
            "  • {:<30} {:>8} ({:.2}%)",
            result.as_str(),
            tally.count(result),
            tally.fraction(result) * 100.0
        );
    }
    println!("  • {:<30} {:>8}", "Total", tally.total());
    if tally.malformed > 0 {
        println!("  ⚠️  Unrecognized lines: {}", tally.malformed);
    }
}

fn print_step_cap(max_steps: Option<usize>) {
    match max_steps {
        Some(cap) => println!("  • Step Cap: {cap} [--max-steps]"),
        None => println!("  • Step Cap: none [--max-steps]"),
    }
}

fn print_seed(seed: Option<u64>) {
    if let Some(seed) = seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
