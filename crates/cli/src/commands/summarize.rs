use anyhow::{Context, Result};
use moran_sim::storage::Tally;
use std::path::Path;

use crate::printing::{print_header, print_tally};

pub fn summarize_tally(path: &Path) -> Result<()> {
    print_header("Tally Summary");
    let tally = Tally::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    print_tally(&tally, path);
    Ok(())
}
