use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_init_writes_default_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("batch.json");

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    let text = fs::read_to_string(&config).unwrap();
    assert!(text.contains("\"runs\": 500"));
    assert!(text.contains("\"policy\": \"fitness_proportional\""));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("batch.json");
    fs::write(&config, "{}").unwrap();

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(&config).unwrap(), "{}");
}

#[test]
fn test_run_saves_history() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("histories");

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("run")
        .args(["-n", "20", "-i", "3", "--policy", "fitness-proportional", "-r", "1.2"])
        .args(["--seed", "42", "--format", "snapshot-csv"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation complete!"))
        .stdout(predicate::str::contains("dominated"));

    let contents = fs::read_to_string(out.join("Generation 1.csv")).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("Generation,A,B"));
    assert_eq!(lines.next(), Some("0,3,17"));
}

#[test]
fn test_run_twice_auto_increments() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("histories");

    for _ in 0..2 {
        let mut cmd = Command::cargo_bin("moran").unwrap();
        cmd.arg("run")
            .args(["-n", "6", "-i", "2", "--policy", "mutation-drift", "-r", "0.1"])
            .args(["--max-steps", "500", "--run-number", "4"])
            .arg("--output-dir")
            .arg(&out)
            .assert()
            .success();
    }

    assert!(out.join("Generation 4.csv").exists());
    assert!(out.join("Generation 4_1.csv").exists());
}

#[test]
fn test_run_rejects_invalid_mutants() {
    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("run")
        .args(["-n", "5", "-i", "5", "--no-save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid simulation parameters"));
}

#[test]
fn test_run_rejects_unknown_policy() {
    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("run")
        .args(["--policy", "wright-fisher", "--no-save"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown selection policy"));
}

#[test]
fn test_batch_writes_tally() {
    let temp = tempdir().unwrap();
    let tally = temp.path().join("results.txt");

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.args(["-t", "2", "batch", "-k", "50", "-n", "10", "-i", "1..5"])
        .args(["--policy", "mutation-drift", "-r", "0.0..0.05", "--max-steps", "1000"])
        .args(["--seed", "7", "--no-save", "--no-progress"])
        .arg("--tally")
        .arg(&tally)
        .assert()
        .success()
        .stdout(predicate::str::contains("Batch complete!"))
        .stdout(predicate::str::contains("Completed runs: 50"));

    let contents = fs::read_to_string(&tally).unwrap();
    assert_eq!(contents.lines().count(), 50);
}

#[test]
fn test_batch_from_config_file() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let tally = temp.path().join("tally.txt");
    let config = temp.path().join("batch.json");
    let json = format!(
        r#"{{
  "runs": 8,
  "population_size": {{ "min": 8, "max": 8 }},
  "initial_mutants": {{ "min": 2, "max": 2 }},
  "policy": "fitness_proportional",
  "parameter": {{ "min": 1.5, "max": 1.5 }},
  "max_steps": 100000,
  "seed": 3,
  "recording": {{ "output_dir": {out:?}, "format": "snapshot-text", "collision": "overwrite" }},
  "tally_path": {tally:?}
}}"#,
        out = out.to_str().unwrap(),
        tally = tally.to_str().unwrap(),
    );
    fs::write(&config, json).unwrap();

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("batch")
        .arg("--config")
        .arg(&config)
        .arg("--no-progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Theoretical A fixation probability"));

    assert_eq!(fs::read_dir(&out).unwrap().count(), 8);
    assert_eq!(fs::read_to_string(&tally).unwrap().lines().count(), 8);
}

#[test]
fn test_summarize_counts_outcomes() {
    let temp = tempdir().unwrap();
    let tally = temp.path().join("results.txt");
    fs::write(
        &tally,
        "A dominated\nB dominated\nB dominated\nTIMEOUT: No fixation reached\nnoise\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("summarize")
        .arg(&tally)
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00%"))
        .stdout(predicate::str::contains("Unrecognized lines: 1"));
}

#[test]
fn test_concat_combines_histories() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("histories");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Generation 1.csv"), "A=1 B=2\nA=0 B=3\n").unwrap();
    fs::write(dir.join("Generation 2.csv"), "A=2 B=1\n").unwrap();

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.arg("concat")
        .arg("--input")
        .arg(&dir)
        .args(["--format", "snapshot-text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Combined 2 files (3 rows)"));

    let combined = fs::read_to_string(dir.join("all_generations.csv")).unwrap();
    assert_eq!(
        combined,
        "Generation 1.csv,A=1 B=2\nGeneration 1.csv,A=0 B=3\nGeneration 2.csv,A=2 B=1\n"
    );
}

#[test]
fn test_batch_without_mutants_draws_uniformly() {
    let temp = tempdir().unwrap();
    let tally = temp.path().join("results.txt");

    let mut cmd = Command::cargo_bin("moran").unwrap();
    cmd.args(["batch", "-k", "5", "-n", "8", "--seed", "1", "--no-save", "--no-progress"])
        .arg("--tally")
        .arg(&tally)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initial Mutants: uniform on [1, N-1]"));
}
