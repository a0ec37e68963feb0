//! Durable persistence of run histories.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::errors::StorageError;
use crate::storage::naming::{base_name, next_available_name};
use crate::storage::{CollisionPolicy, History, HistoryFormat};

/// File extension for every history artifact.
pub const HISTORY_EXTENSION: &str = "csv";

/// Destination for completed run histories.
///
/// Implementations must be shareable across worker threads. A failure affects
/// only the run being persisted.
pub trait HistorySink: Send + Sync {
    /// Persist `history` under the identifier derived from `run_number`.
    ///
    /// Returns the identifier the artifact was stored under.
    fn persist(&self, run_number: usize, history: &History) -> Result<String, StorageError>;
}

/// Writes each history to `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    format: HistoryFormat,
    collision: CollisionPolicy,
}

impl DirectorySink {
    /// Create a sink writing into `dir`.
    ///
    /// The directory is created on first use, so an unavailable destination
    /// surfaces as an error from [`HistorySink::persist`] for each run rather
    /// than here.
    pub fn new(
        dir: impl Into<PathBuf>,
        format: HistoryFormat,
        collision: CollisionPolicy,
    ) -> Self {
        Self {
            dir: dir.into(),
            format,
            collision,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> HistoryFormat {
        self.format
    }

    /// Path of the artifact stored under `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{HISTORY_EXTENSION}"))
    }

    /// Stems of the history artifacts currently in the directory.
    fn existing_names(&self) -> Result<HashSet<String>, StorageError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StorageError::Unavailable {
            path: self.dir.clone(),
            source,
        })?;

        Ok(entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == HISTORY_EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect())
    }

    /// Claim a fresh artifact name and open it for writing.
    ///
    /// Files are created with create-new semantics, so a name taken by a
    /// concurrent writer between listing and creating is skipped.
    fn create_unique(&self, base: &str) -> Result<(String, File), StorageError> {
        let mut existing = self.existing_names()?;
        loop {
            let name = next_available_name(&existing, base);
            let path = self.path_for(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((name, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    existing.insert(name);
                }
                Err(source) => return Err(StorageError::Write { path, source }),
            }
        }
    }

    /// Write `history` to the claimed file at `path`. A failed write removes
    /// the file, leaving the name free.
    fn write_or_discard(
        &self,
        path: PathBuf,
        file: impl Write,
        history: &History,
    ) -> Result<(), StorageError> {
        let mut writer = BufWriter::new(file);
        let written = self
            .format
            .write_history(history, &mut writer)
            .and_then(|()| writer.flush());
        drop(writer);

        written.map_err(|source| {
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), "Failed to remove partial history: {e}");
            }
            StorageError::Write { path, source }
        })
    }
}

impl HistorySink for DirectorySink {
    fn persist(&self, run_number: usize, history: &History) -> Result<String, StorageError> {
        ensure_dir(&self.dir)?;

        let base = base_name(run_number);
        let (name, file) = match self.collision {
            CollisionPolicy::AutoIncrement => self.create_unique(&base)?,
            CollisionPolicy::Overwrite => {
                let path = self.path_for(&base);
                let file =
                    File::create(&path).map_err(|source| StorageError::Write { path, source })?;
                (base, file)
            }
        };

        self.write_or_discard(self.path_for(&name), file, history)?;
        Ok(name)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::Unavailable {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Population;
    use crate::storage::EventRecorder;
    use tempfile::tempdir;

    fn empty_history() -> History {
        let pop = Population::new(5, 2).unwrap();
        EventRecorder::new(&pop).finish()
    }

    #[test]
    fn test_sink_creates_directory_on_persist() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested").join("histories");
        let sink = DirectorySink::new(
            &dir,
            HistoryFormat::SnapshotCsv,
            CollisionPolicy::AutoIncrement,
        );
        assert!(!dir.exists());

        sink.persist(1, &empty_history()).unwrap();
        assert!(dir.is_dir());
        assert_eq!(sink.dir(), dir.as_path());
        assert_eq!(
            fs::read_to_string(dir.join("Generation 1.csv")).unwrap(),
            "Generation,A,B\n0,2,3\n"
        );
    }

    #[test]
    fn test_auto_increment_keeps_both_artifacts() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(
            temp.path(),
            HistoryFormat::SnapshotText,
            CollisionPolicy::AutoIncrement,
        );

        let first = sink.persist(1, &empty_history()).unwrap();
        let second = sink.persist(1, &empty_history()).unwrap();
        let third = sink.persist(1, &empty_history()).unwrap();

        assert_eq!(first, "Generation 1");
        assert_eq!(second, "Generation 1_1");
        assert_eq!(third, "Generation 1_2");
        assert!(temp.path().join("Generation 1.csv").exists());
        assert!(temp.path().join("Generation 1_1.csv").exists());
    }

    #[test]
    fn test_overwrite_replaces_artifact() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(
            temp.path(),
            HistoryFormat::SnapshotText,
            CollisionPolicy::Overwrite,
        );

        fs::write(temp.path().join("Generation 3.csv"), "stale contents\n").unwrap();
        let name = sink.persist(3, &empty_history()).unwrap();

        assert_eq!(name, "Generation 3");
        let contents = fs::read_to_string(temp.path().join("Generation 3.csv")).unwrap();
        assert_eq!(contents, "A=2 B=3\n");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_releases_claimed_name() {
        let temp = tempdir().unwrap();
        let sink = DirectorySink::new(
            temp.path(),
            HistoryFormat::SnapshotCsv,
            CollisionPolicy::AutoIncrement,
        );

        let (name, file) = sink.create_unique("Generation 1").unwrap();
        drop(file);
        let path = sink.path_for(&name);
        assert!(path.exists());

        let result = sink.write_or_discard(path.clone(), BrokenWriter, &empty_history());
        assert!(matches!(result, Err(StorageError::Write { .. })));
        assert!(!path.exists());

        // The name is free again for the next run
        assert_eq!(sink.persist(1, &empty_history()).unwrap(), "Generation 1");
    }

    #[test]
    fn test_unavailable_directory_is_reported() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();

        let sink = DirectorySink::new(
            blocker.join("histories"),
            HistoryFormat::SnapshotCsv,
            CollisionPolicy::AutoIncrement,
        );
        let result = sink.persist(1, &empty_history());
        assert!(matches!(result, Err(StorageError::Unavailable { .. })));
    }
}
