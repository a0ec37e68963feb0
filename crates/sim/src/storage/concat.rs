//! Aggregate concatenation of per-run histories.
//!
//! Combines every history artifact under a directory into one file whose rows
//! carry a leading `source_file` column with the originating file's path
//! relative to the input directory. This
//! is the hand-off format for downstream inference tooling.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::errors::StorageError;
use crate::storage::sink::HISTORY_EXTENSION;
use crate::storage::HistoryFormat;

/// Name of the leading column in the combined artifact.
pub const SOURCE_COLUMN: &str = "source_file";

/// Summary of a concatenation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatStats {
    pub files: usize,
    pub rows: usize,
}

/// Concatenate every `.csv` history under `input_dir` (recursively) into
/// `output`, overwriting it.
///
/// `format` tells whether each file starts with a header. When it does, the
/// combined file gets a single `source_file,<header>` line and each file's
/// own header is dropped. Files are visited in sorted path order; `output`
/// itself is skipped if it lives inside `input_dir`. Empty files contribute
/// nothing.
pub fn concatenate_histories(
    input_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    format: HistoryFormat,
) -> Result<ConcatStats, StorageError> {
    let input_dir = input_dir.as_ref();
    let output = output.as_ref();

    let mut files = collect_history_files(input_dir)?;
    files.sort();
    if let Ok(existing_output) = fs::canonicalize(output) {
        files.retain(|path| fs::canonicalize(path).ok().as_ref() != Some(&existing_output));
    }

    let out_file = File::create(output).map_err(|source| StorageError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(out_file);
    let write_err = |source| StorageError::Write {
        path: output.to_path_buf(),
        source,
    };

    let has_header = format.header().is_some();
    let mut header_written = false;
    let mut stats = ConcatStats::default();

    for path in &files {
        let file = File::open(path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;
        let source_name = source_name(input_dir, path);

        let mut lines = BufReader::new(file).lines();
        if has_header {
            let header = match lines.next() {
                Some(line) => line.map_err(|source| StorageError::Read {
                    path: path.clone(),
                    source,
                })?,
                None => continue,
            };
            if !header_written {
                writeln!(writer, "{SOURCE_COLUMN},{header}").map_err(write_err)?;
                header_written = true;
            }
        }

        for line in lines {
            let line = line.map_err(|source| StorageError::Read {
                path: path.clone(),
                source,
            })?;
            if line.is_empty() {
                continue;
            }
            writeln!(writer, "{source_name},{line}").map_err(write_err)?;
            stats.rows += 1;
        }
        stats.files += 1;
    }

    writer.flush().map_err(write_err)?;
    Ok(stats)
}

/// `path` relative to `input_dir`, joined with `/`.
fn source_name(input_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn collect_history_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|source| StorageError::Read {
            path: current.clone(),
            source,
        })?;
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == HISTORY_EXTENSION) {
                found.push(path);
            }
        }
    }

    Ok(found)
}
