use anyhow::{Context, Result};
use moran_sim::simulation::BatchConfig;
use std::fs;
use std::path::Path;

use crate::printing::{print_batch_parameters, print_header};

/// Write a default batch configuration that `moran batch --config` accepts.
pub fn init_config(output: &Path, force: bool) -> Result<()> {
    print_header("Initializing Batch Configuration");

    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            output.display()
        );
    }

    let config = BatchConfig::default();
    print_batch_parameters(&config);

    let json = serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    fs::write(output, json + "\n")
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✓ Configuration written to {}", output.display());
    println!("\n💡 Edit it, then run 'moran batch --config {}'", output.display());
    Ok(())
}
