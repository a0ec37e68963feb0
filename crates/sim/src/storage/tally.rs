//! Shared append-only tally of run outcomes.
//!
//! Every completed run appends exactly one line naming its
//! [`SimulationResult`]. Appends are serialized by a mutex held only for the
//! duration of a single write, so lines never interleave and none are lost.
//! The tally is derived afterwards by scanning the store.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::TallyError;
use crate::simulation::SimulationResult;

type TallyWriter = Box<dyn Write + Send>;

/// Append-only text store with one outcome line per run.
pub struct TallyStore {
    path: PathBuf,
    writer: Mutex<TallyWriter>,
}

impl fmt::Debug for TallyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TallyStore").field("path", &self.path).finish()
    }
}

impl TallyStore {
    /// Create the store, truncating any previous contents.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TallyError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| TallyError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self::from_writer(path, file))
    }

    /// Open the store for appending, keeping previous lines.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, TallyError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|source| TallyError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self::from_writer(path, file))
    }

    /// Append through `writer`; `path` is where [`summarize`](Self::summarize)
    /// reads the lines back.
    pub fn from_writer(path: impl Into<PathBuf>, writer: impl Write + Send + 'static) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one outcome line.
    pub fn append(&self, result: SimulationResult) -> Result<(), TallyError> {
        let line = format!("{result}\n");
        let mut writer = self.writer.lock().map_err(|_| TallyError::Poisoned)?;
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|source| TallyError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Scan the store and count outcomes.
    pub fn summarize(&self) -> Result<Tally, TallyError> {
        Tally::read(&self.path)
    }
}

/// Outcome counts derived from a tally store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub fixed_a: usize,
    pub fixed_b: usize,
    pub timeout: usize,
    /// Lines that are not a recognized outcome
    pub malformed: usize,
}

impl Tally {
    /// Read and count every line of the store at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TallyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TallyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file)).map_err(|source| TallyError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Count outcomes from any line-oriented reader. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut tally = Self::default();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<SimulationResult>() {
                Ok(result) => tally.record(result),
                Err(_) => tally.malformed += 1,
            }
        }
        Ok(tally)
    }

    pub fn record(&mut self, result: SimulationResult) {
        match result {
            SimulationResult::FixedA => self.fixed_a += 1,
            SimulationResult::FixedB => self.fixed_b += 1,
            SimulationResult::Timeout => self.timeout += 1,
        }
    }

    pub fn count(&self, result: SimulationResult) -> usize {
        match result {
            SimulationResult::FixedA => self.fixed_a,
            SimulationResult::FixedB => self.fixed_b,
            SimulationResult::Timeout => self.timeout,
        }
    }

    /// Number of valid outcome lines.
    pub fn total(&self) -> usize {
        self.fixed_a + self.fixed_b + self.timeout
    }

    /// Fraction of valid lines with outcome `result` (0 for an empty tally).
    pub fn fraction(&self, result: SimulationResult) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(result) as f64 / total as f64,
        }
    }
}
