//! Integration tests for concurrent batches, persistence, and concatenation.

use std::collections::HashSet;
use std::fs;

use moran_sim::evolution::PolicyKind;
use moran_sim::simulation::{BatchConfig, BatchRunner, ParamRange, SimulationResult};
use moran_sim::storage::{
    concatenate_histories, CollisionPolicy, HistoryFormat, RecordingConfig, Tally,
};
use tempfile::tempdir;

fn drift_batch(runs: usize, tally_dir: &std::path::Path) -> BatchConfig {
    BatchConfig {
        runs,
        population_size: ParamRange::new(4, 30),
        initial_mutants: None,
        policy: PolicyKind::MutationDrift,
        parameter: ParamRange::new(0.0, 0.05),
        max_steps: Some(2_000),
        seed: Some(2024),
        recording: RecordingConfig::disabled(),
        tally_path: tally_dir.join("results.txt"),
        append_tally: false,
    }
}

#[test]
fn test_five_hundred_runs_append_five_hundred_lines() {
    let temp = tempdir().unwrap();
    let config = drift_batch(500, temp.path());
    let report = BatchRunner::new(config).unwrap().run().unwrap();

    let contents = fs::read_to_string(temp.path().join("results.txt")).unwrap();
    let valid: HashSet<&str> = SimulationResult::ALL.iter().map(|r| r.as_str()).collect();
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines.len(), 500);
    assert!(lines.iter().all(|line| valid.contains(line)));
    assert!(contents.ends_with('\n'));

    assert_eq!(report.tally.total(), 500);
    assert_eq!(report.tally.malformed, 0);
    assert_eq!(Tally::read(temp.path().join("results.txt")).unwrap(), report.tally);

    // Per-run tallies agree with the store
    let timeouts = report
        .runs
        .iter()
        .filter(|r| r.result == SimulationResult::Timeout)
        .count();
    assert_eq!(timeouts, report.tally.timeout);
}

#[test]
fn test_batch_persists_one_history_per_run() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("histories");
    let config = BatchConfig {
        recording: RecordingConfig::in_dir(
            &out,
            HistoryFormat::EventCsvWithCounts,
            CollisionPolicy::AutoIncrement,
        ),
        ..drift_batch(12, temp.path())
    };
    let report = BatchRunner::new(config).unwrap().run().unwrap();
    assert!(report.is_clean());

    for run in &report.runs {
        let name = run.artifact.as_deref().unwrap();
        assert_eq!(name, format!("Generation {}", run.run_number));

        let contents = fs::read_to_string(out.join(format!("{name}.csv"))).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("Generation,Event,A,B"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), run.steps);

        // Counts always sum to N
        for row in rows {
            let fields: Vec<&str> = row.split(',').collect();
            let a: usize = fields[2].parse().unwrap();
            let b: usize = fields[3].parse().unwrap();
            assert_eq!(a + b, run.population_size);
        }
    }
}

#[test]
fn test_repeated_batch_auto_increments_names() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("histories");
    let config = BatchConfig {
        recording: RecordingConfig::in_dir(
            &out,
            HistoryFormat::SnapshotCsv,
            CollisionPolicy::AutoIncrement,
        ),
        ..drift_batch(3, temp.path())
    };

    BatchRunner::new(config.clone()).unwrap().run().unwrap();
    let second = BatchRunner::new(config).unwrap().run().unwrap();

    let names: Vec<&str> = second.runs.iter().filter_map(|r| r.artifact.as_deref()).collect();
    assert_eq!(names, ["Generation 1_1", "Generation 2_1", "Generation 3_1"]);
    assert_eq!(fs::read_dir(&out).unwrap().count(), 6);
}

#[test]
fn test_unavailable_directory_fails_persistence_only() {
    let temp = tempdir().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let config = BatchConfig {
        recording: RecordingConfig::in_dir(
            blocker.join("out"),
            HistoryFormat::SnapshotText,
            CollisionPolicy::Overwrite,
        ),
        ..drift_batch(8, temp.path())
    };
    let report = BatchRunner::new(config).unwrap().run().unwrap();

    assert_eq!(report.runs.len(), 8);
    assert_eq!(report.failures.len(), 8);
    assert_eq!(report.tally.total(), 8);
    assert!(report.runs.iter().all(|r| r.artifact.is_none()));
}

#[test]
fn test_concatenated_batch_output() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("histories");
    let config = BatchConfig {
        recording: RecordingConfig::in_dir(
            &out,
            HistoryFormat::SnapshotCsv,
            CollisionPolicy::Overwrite,
        ),
        ..drift_batch(5, temp.path())
    };
    let report = BatchRunner::new(config).unwrap().run().unwrap();

    let combined = out.join("all_generations.csv");
    let stats = concatenate_histories(&out, &combined, HistoryFormat::SnapshotCsv).unwrap();
    assert_eq!(stats.files, 5);

    // Snapshot rows include generation 0
    let expected_rows: usize = report.runs.iter().map(|r| r.steps + 1).sum();
    assert_eq!(stats.rows, expected_rows);

    let contents = fs::read_to_string(&combined).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("source_file,Generation,A,B"));
    assert!(lines.all(|line| line.starts_with("Generation ")));
}
