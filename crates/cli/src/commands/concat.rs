use anyhow::{Context, Result};
use moran_sim::storage::{concatenate_histories, HistoryFormat};
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::printing::print_header;

pub fn concat_histories(input: &Path, output: Option<&Path>, format: HistoryFormat) -> Result<()> {
    print_header("Combining Histories");

    let output: PathBuf = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.join(defaults::CONCAT_FILE));

    let stats = concatenate_histories(input, &output, format)
        .with_context(|| format!("Failed to combine histories from {}", input.display()))?;

    println!("✓ Combined {} files ({} rows)", stats.files, stats.rows);
    println!("  Saved to: {}", output.display());
    Ok(())
}
